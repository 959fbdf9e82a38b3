//! Cache Module
//!
//! Provides in-memory caching with TTL expiration, LRU eviction and
//! snapshot persistence.

mod clock;
mod engine;
mod entry;
mod events;
mod stats;
mod table;


// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::CacheEngine;
pub use entry::CacheEntry;
pub use events::{CacheEvent, EventKind, EventLog, EventSink, NullSink, TracingSink};
pub use stats::CacheStats;
pub use table::OrderedTable;

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Maximum allowed value size in bytes
pub const MAX_VALUE_SIZE: usize = 1024 * 1024; // 1 MB
