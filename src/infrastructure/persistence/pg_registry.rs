//! PostgreSQL implementation of the registry.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Mapping, NewMapping, ShortId};
use crate::domain::repositories::{Registry, RegistryError, RegistryResult};
use crate::utils::db_error::is_unique_violation_on_short_id;

#[derive(sqlx::FromRow)]
struct MappingRow {
    short_id: String,
    long_url: String,
    created_at: DateTime<Utc>,
}

impl From<MappingRow> for Mapping {
    fn from(row: MappingRow) -> Self {
        Mapping::new(ShortId::from_stored(row.short_id), row.long_url, row.created_at)
    }
}

// Unique violations are classified in `insert`, where the candidate id is known.
impl From<sqlx::Error> for RegistryError {
    fn from(e: sqlx::Error) -> Self {
        RegistryError::Backend(e.to_string())
    }
}

/// PostgreSQL registry backed by the `short_urls` table.
///
/// The primary key on `short_id` is the uniqueness constraint the allocation
/// loop relies on.
pub struct PgRegistry {
    pool: Arc<PgPool>,
}

impl PgRegistry {
    /// Creates a new registry over a connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Applies the embedded migrations.
    ///
    /// # Errors
    ///
    /// Returns the migrator error if any migration fails.
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(self.pool.as_ref()).await
    }

    /// Counts stored mappings.
    pub async fn count(&self) -> RegistryResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM short_urls")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}

#[async_trait]
impl Registry for PgRegistry {
    async fn find_by_long_url(&self, long_url: &str) -> RegistryResult<Option<Mapping>> {
        let row = sqlx::query_as::<_, MappingRow>(
            r#"
            SELECT short_id, long_url, created_at
            FROM short_urls
            WHERE long_url = $1
            ORDER BY created_at, short_id
            LIMIT 1
            "#,
        )
        .bind(long_url)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Mapping::from))
    }

    async fn find_by_short_id(&self, short_id: &ShortId) -> RegistryResult<Option<Mapping>> {
        let row = sqlx::query_as::<_, MappingRow>(
            r#"
            SELECT short_id, long_url, created_at
            FROM short_urls
            WHERE short_id = $1
            "#,
        )
        .bind(short_id.as_str())
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Mapping::from))
    }

    async fn insert(&self, new_mapping: NewMapping) -> RegistryResult<Mapping> {
        let result = sqlx::query_as::<_, MappingRow>(
            r#"
            INSERT INTO short_urls (short_id, long_url)
            VALUES ($1, $2)
            RETURNING short_id, long_url, created_at
            "#,
        )
        .bind(new_mapping.short_id.as_str())
        .bind(&new_mapping.long_url)
        .fetch_one(self.pool.as_ref())
        .await;

        match result {
            Ok(row) => Ok(row.into()),
            Err(e) if is_unique_violation_on_short_id(&e) => Err(
                RegistryError::UniquenessViolation(new_mapping.short_id.into_inner()),
            ),
            Err(e) => Err(e.into()),
        }
    }

    async fn ping(&self) -> RegistryResult<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(())
    }
}
