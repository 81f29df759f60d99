//! HTTP request/response tracing middleware.

use tower_http::LatencyUnit;
use tower_http::trace::{
    DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer,
};
use tracing::Level;

/// Creates a tracing middleware for HTTP requests.
///
/// # Logging Behavior
///
/// **On Request:**
/// - Creates a span at `INFO` level with:
///   - HTTP method
///   - URI path
///   - HTTP version
///
/// **On Response:**
/// - Logs at `INFO` level with:
///   - Status code
///   - Latency in milliseconds
///
/// **On Failure (5xx):**
/// - Logs at `ERROR` level with the classification and latency
///
/// # Example Logs
///
/// ```text
/// DEBUG request{method=POST uri=/api/shorten version=HTTP/1.1}: started processing request
/// INFO request{method=GET uri=/aZ3kQ9x version=HTTP/1.1}: finished processing request latency=2 ms status=302
/// ```
///
/// Handlers add their own events (cache hits, collisions, registry errors)
/// inside this span, so every log line carries the method and path.
pub fn layer()
-> TraceLayer<tower_http::classify::SharedClassifier<tower_http::classify::ServerErrorsAsFailures>>
{
    TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        )
        .on_failure(
            DefaultOnFailure::new()
                .level(Level::ERROR)
                .latency_unit(LatencyUnit::Millis),
        )
}
