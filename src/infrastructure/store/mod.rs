//! Key-value store backends.
//!
//! The quota guard and the shortener both talk to a [`KeyValueStore`];
//! the two concerns live in logically separate keyspaces realized as
//! distinct key prefixes over the same backend.

pub mod memory_store;
pub mod redis_store;
pub mod service;

pub use memory_store::MemoryStore;
pub use redis_store::RedisStore;
pub use service::{KeyValueStore, StoreError, StoreResult};
