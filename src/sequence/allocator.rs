// src/sequence/allocator.rs
//! Sequence Allocator
//!
//! Hands out the next integer of a named sequence. Every call is one atomic
//! find-and-increment against the counter store; no value is cached in
//! process, so any number of service instances can share one store.
//!
//! Values are consumed even when the caller's later insert fails ("burned"
//! values). Gap-free numbering across failed inserts is not provided.

use std::fmt;
use std::sync::Arc;
use tracing::{debug, error};

use super::error::SequenceError;
use super::store::CounterStore;

/// Sequence key for mess ids
pub const MESS_ID_KEY: &str = "messId";

/// Sequence key for user ids
pub const USER_ID_KEY: &str = "userId";

const MAX_KEY_LEN: usize = 64;

#[derive(Clone)]
pub struct SequenceAllocator {
    store: Arc<dyn CounterStore>,
}

impl fmt::Debug for SequenceAllocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SequenceAllocator").finish_non_exhaustive()
    }
}

impl SequenceAllocator {
    pub fn new(store: Arc<dyn CounterStore>) -> Self {
        Self { store }
    }

    /// Allocate the next value for `key`
    ///
    /// Returns 1 for a key never seen before. For the same key, concurrent
    /// callers always receive distinct, contiguous values.
    ///
    /// # Errors
    /// * `InvalidKey` - empty or malformed key, the store is not touched
    /// * `StoreUnavailable` - the store failed; no retry is attempted
    pub async fn next_sequence(&self, key: &str) -> Result<i64, SequenceError> {
        validate_key(key)?;

        let value = self.store.find_and_increment(key).await.map_err(|e| {
            error!(error = %e, key = %key, "Sequence allocation failed");
            SequenceError::StoreUnavailable(e)
        })?;

        debug!(key = %key, value = value, "Allocated sequence value");
        Ok(value)
    }

    /// Last value issued for `key`, 0 if none has been issued yet
    pub async fn current_value(&self, key: &str) -> Result<i64, SequenceError> {
        validate_key(key)?;

        let value = self.store.current_value(key).await?;
        Ok(value.unwrap_or(0))
    }
}

/// Keys are 1-64 bytes of ASCII alphanumerics or `_ - . :`
pub fn validate_key(key: &str) -> Result<(), SequenceError> {
    if key.is_empty() {
        return Err(SequenceError::InvalidKey(
            "sequence key cannot be empty".to_string(),
        ));
    }

    if key.len() > MAX_KEY_LEN {
        return Err(SequenceError::InvalidKey(format!(
            "sequence key exceeds maximum length of {} characters",
            MAX_KEY_LEN
        )));
    }

    if let Some(c) = key
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | ':')))
    {
        return Err(SequenceError::InvalidKey(format!(
            "sequence key contains invalid character {:?}",
            c
        )));
    }

    Ok(())
}
