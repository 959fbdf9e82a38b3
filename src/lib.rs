//! TTL LRU Cache - an in-memory key-value cache
//!
//! Combines lazy TTL expiration, bounded LRU eviction and durable snapshots
//! written through an injected blob store.

pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod persistence;
pub mod shell;
pub mod tasks;

pub use cache::{CacheEngine, CacheEntry, CacheEvent, Clock, EventKind, EventSink};
pub use config::{CacheConfig, Config};
pub use error::{CacheError, Result};
pub use persistence::{BlobStore, FileStore, MemoryStore};
pub use tasks::spawn_refresh_task;
