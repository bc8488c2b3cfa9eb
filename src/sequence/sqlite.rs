// src/sequence/sqlite.rs
//! SQLite-backed counter store

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::error;

use super::error::StoreError;
use super::store::CounterStore;

/// Upsert and increment in one statement; SQLite serializes writers, so two
/// callers can never observe the same pre-increment value.
const FIND_AND_INCREMENT_SQL: &str = "INSERT INTO counters (key, sequence_value) VALUES (?, 1) \
     ON CONFLICT(key) DO UPDATE SET sequence_value = sequence_value + 1 \
     RETURNING sequence_value";

#[derive(Debug, Clone)]
pub struct SqliteCounterStore {
    db: SqlitePool,
}

impl SqliteCounterStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CounterStore for SqliteCounterStore {
    async fn find_and_increment(&self, key: &str) -> Result<i64, StoreError> {
        sqlx::query_scalar::<_, i64>(FIND_AND_INCREMENT_SQL)
            .bind(key)
            .fetch_one(&self.db)
            .await
            .map_err(|e| {
                error!(error = %e, key = %key, "Counter increment failed");
                StoreError::Database(e)
            })
    }

    async fn current_value(&self, key: &str) -> Result<Option<i64>, StoreError> {
        let value = sqlx::query_scalar::<_, i64>("SELECT sequence_value FROM counters WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.db)
            .await?;

        Ok(value)
    }
}
