//! Persistence for hierarchical document index snapshots.
//!
//! [`IndexStore`] is the storage contract; [`RedisStore`] is the production
//! backend and [`MemoryStore`] is an in-process stand-in for tests and local
//! development. Every document is addressed by a caller-chosen `doc_id` and
//! stores two JSON payloads: the node snapshot and free-form metadata.

mod error;
mod memory_store;
mod redis_store;
mod traits;

pub use error::{Result, StoreError};
pub use memory_store::MemoryStore;
pub use redis_store::RedisStore;
pub use traits::{DocumentSummary, IndexStore, StoredIndex};
