//! # Sequence Module
//!
//! Per-key sequential number allocation backed by a persistent counter store.
//! Used to hand out short human-readable ids (e.g. `messId`, `userId`) instead
//! of opaque database ids.
//!
//! - `SequenceAllocator` validates keys and delegates to the store
//! - `CounterStore` is the store-adapter seam (atomic find-and-increment)
//! - `SqliteCounterStore` is the production adapter, `MemoryCounterStore` the test fake

pub mod allocator;
pub mod error;
pub mod memory;
pub mod sqlite;
pub mod store;


pub use allocator::{SequenceAllocator, MESS_ID_KEY, USER_ID_KEY};
pub use error::{SequenceError, StoreError};
pub use memory::MemoryCounterStore;
pub use sqlite::SqliteCounterStore;
pub use store::{CounterRecord, CounterStore};
