//! Counter store contract

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::error::StoreError;

/// Row of the `counters` table: the last value issued for `key`
#[derive(FromRow, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CounterRecord {
    pub key: String,
    pub sequence_value: i64,
}

/// Persistent key -> counter store
///
/// Implementations must make `find_and_increment` a single atomic operation
/// against the backing store. A read followed by a write is not acceptable:
/// the store is the only serialization point, and several service instances
/// may share it.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Create the record with value 0 if absent, add 1, return the new value
    async fn find_and_increment(&self, key: &str) -> Result<i64, StoreError>;

    /// Last issued value for `key`, `None` if the key was never allocated
    async fn current_value(&self, key: &str) -> Result<Option<i64>, StoreError>;
}
