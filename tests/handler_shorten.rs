mod common;

use serde_json::{Value, json};
use shortlink::domain::entities::{NewMapping, ShortId};
use shortlink::domain::repositories::Registry;
use std::sync::Arc;

#[tokio::test]
async fn test_shorten_bare_domain() {
    let server = common::test_server(common::create_test_state(common::memory_registry()));

    let response = server
        .post("/api/shorten")
        .json(&json!({ "long_url": "example.com" }))
        .await;

    response.assert_status_ok();

    let json = response.json::<Value>();
    let short_id = json["shortId"].as_str().unwrap();
    assert_eq!(short_id.len(), 7);
    assert!(short_id.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_eq!(
        json["shortUrl"],
        format!("{}/{}", common::BASE_URL, short_id)
    );
    assert_eq!(json["longUrl"], "https://example.com/");
}

#[tokio::test]
async fn test_shorten_accepts_camel_case_field() {
    let server = common::test_server(common::create_test_state(common::memory_registry()));

    let response = server
        .post("/api/shorten")
        .json(&json!({ "longUrl": "HTTP://Example.COM:80/a?b=1#frag" }))
        .await;

    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>()["longUrl"],
        "http://example.com/a?b=1#frag"
    );
}

#[tokio::test]
async fn test_shorten_is_idempotent() {
    let registry = common::memory_registry();
    let server = common::test_server(common::create_test_state(registry.clone()));

    let first = server
        .post("/api/shorten")
        .json(&json!({ "long_url": "https://example.com/page" }))
        .await
        .json::<Value>();

    // Same canonical form, different spelling
    let second = server
        .post("/api/shorten")
        .json(&json!({ "long_url": "EXAMPLE.com/page" }))
        .await
        .json::<Value>();

    assert_eq!(first["shortId"], second["shortId"]);
    assert_eq!(registry.len(), 1);
}

#[tokio::test]
async fn test_shorten_rejects_unsupported_scheme() {
    let server = common::test_server(common::create_test_state(common::memory_registry()));

    for long_url in ["ftp://x.com", "javascript:alert(1)", "", "   "] {
        let response = server
            .post("/api/shorten")
            .json(&json!({ "long_url": long_url }))
            .await;

        response.assert_status_bad_request();

        let json = response.json::<Value>();
        assert_eq!(json["error"]["code"], "validation_error");
        assert_eq!(json["error"]["message"], "Invalid URL");
    }
}

#[tokio::test]
async fn test_shorten_missing_field() {
    let server = common::test_server(common::create_test_state(common::memory_registry()));

    let response = server.post("/api/shorten").json(&json!({})).await;

    response.assert_status_bad_request();
    assert_eq!(response.json::<Value>()["error"]["message"], "Invalid URL");
}

#[tokio::test]
async fn test_shorten_malformed_body() {
    let server = common::test_server(common::create_test_state(common::memory_registry()));

    let response = server.post("/api/shorten").text("long_url=example.com").await;

    response.assert_status_bad_request();

    let json = response.json::<Value>();
    assert_eq!(json["error"]["code"], "validation_error");
    assert_eq!(json["error"]["message"], "Invalid request body");
}

#[tokio::test]
async fn test_shorten_wrong_method() {
    let server = common::test_server(common::create_test_state(common::memory_registry()));

    let response = server.get("/api/shorten").await;

    assert_eq!(response.status_code(), 405);
}

#[tokio::test]
async fn test_shorten_retries_past_taken_id() {
    let registry = common::memory_registry();
    registry
        .insert(NewMapping {
            short_id: ShortId::parse("taken00").unwrap(),
            long_url: "https://other.example/".into(),
        })
        .await
        .unwrap();

    let generator = Arc::new(common::ScriptedGenerator::new(&["taken00", "fresh01"]));
    let server = common::test_server(common::create_state_with_generator(
        registry.clone(),
        generator.clone(),
    ));

    let response = server
        .post("/api/shorten")
        .json(&json!({ "long_url": "https://example.com" }))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["shortId"], "fresh01");
    assert_eq!(generator.calls(), 2);
    assert_eq!(registry.len(), 2);
}

#[tokio::test]
async fn test_shorten_allocation_exhausted() {
    let registry = common::memory_registry();
    registry
        .insert(NewMapping {
            short_id: ShortId::parse("taken00").unwrap(),
            long_url: "https://other.example/".into(),
        })
        .await
        .unwrap();

    let generator = Arc::new(common::ScriptedGenerator::new(&["taken00"]));
    let server = common::test_server(common::create_state_with_generator(
        registry.clone(),
        generator.clone(),
    ));

    let response = server
        .post("/api/shorten")
        .json(&json!({ "long_url": "https://example.com" }))
        .await;

    assert_eq!(response.status_code(), 500);
    assert_eq!(
        response.json::<Value>()["error"]["code"],
        "allocation_exhausted"
    );
    assert_eq!(generator.calls(), 10);
    assert_eq!(registry.len(), 1);
}
