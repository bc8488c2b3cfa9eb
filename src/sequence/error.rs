//! Sequence allocation errors

/// Failure raised by a `CounterStore` adapter
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Counter store is offline")]
    Offline,

    #[error("Sequence {0} is exhausted")]
    Exhausted(String),
}

/// Errors returned by `SequenceAllocator`
#[derive(Debug, thiserror::Error)]
pub enum SequenceError {
    /// Rejected before any store access, nothing was persisted
    #[error("Invalid sequence key: {0}")]
    InvalidKey(String),

    /// The store could not be reached or failed the increment.
    /// The allocator never retries; that decision belongs to the caller.
    #[error("Counter store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),
}
