//! In-memory counter store, used as a fake in tests

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

use super::error::StoreError;
use super::store::{CounterRecord, CounterStore};

/// Map-backed store. The mutex stands in for the database's own
/// serialization of writers and is held only for the increment itself.
#[derive(Debug)]
pub struct MemoryCounterStore {
    counters: Mutex<HashMap<String, i64>>,
    available: AtomicBool,
}

impl Default for MemoryCounterStore {
    fn default() -> Self {
        Self {
            counters: Mutex::new(HashMap::new()),
            available: AtomicBool::new(true),
        }
    }
}

impl MemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate the store going offline (`false`) or coming back (`true`)
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Snapshot of every record, sorted by key
    pub async fn records(&self) -> Vec<CounterRecord> {
        let counters = self.counters.lock().await;
        let mut records: Vec<CounterRecord> = counters
            .iter()
            .map(|(key, value)| CounterRecord {
                key: key.clone(),
                sequence_value: *value,
            })
            .collect();
        records.sort_by(|a, b| a.key.cmp(&b.key));
        records
    }

    /// Force the stored value for `key`
    #[cfg(test)]
    pub async fn set_value(&self, key: &str, value: i64) {
        self.counters.lock().await.insert(key.to_string(), value);
    }

    fn ensure_available(&self) -> Result<(), StoreError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Offline)
        }
    }
}

#[async_trait]
impl CounterStore for MemoryCounterStore {
    async fn find_and_increment(&self, key: &str) -> Result<i64, StoreError> {
        self.ensure_available()?;

        let mut counters = self.counters.lock().await;
        let value = counters.entry(key.to_string()).or_insert(0);
        *value = value
            .checked_add(1)
            .ok_or_else(|| StoreError::Exhausted(key.to_string()))?;
        Ok(*value)
    }

    async fn current_value(&self, key: &str) -> Result<Option<i64>, StoreError> {
        self.ensure_available()?;

        Ok(self.counters.lock().await.get(key).copied())
    }
}
