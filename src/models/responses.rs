//! Response DTOs for the cache shell
//!
//! Each command prints exactly one of these as a JSON line.

use serde::Serialize;

use crate::cache::{CacheEntry, CacheStats};

/// Reply to `get`
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    /// The requested key
    pub key: String,
    /// The stored value, `null` on a miss
    pub value: Option<String>,
    pub found: bool,
}

impl GetResponse {
    pub fn new(key: impl Into<String>, value: Option<String>) -> Self {
        Self {
            key: key.into(),
            found: value.is_some(),
            value,
        }
    }
}

/// Reply to `set`
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    /// Success message
    pub message: String,
    /// The key that was set
    pub key: String,
}

impl SetResponse {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' set successfully", key),
            key,
        }
    }
}

/// Reply to `del`
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub key: String,
    /// Whether a live entry was removed
    pub deleted: bool,
}

impl DeleteResponse {
    pub fn new(key: impl Into<String>, deleted: bool) -> Self {
        Self {
            key: key.into(),
            deleted,
        }
    }
}

/// Reply to `has` and `ttl`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyStatusResponse {
    pub key: String,
    pub live: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl_remaining_ms: Option<u64>,
}

/// Reply to `size` and `clear`
#[derive(Debug, Clone, Serialize)]
pub struct SizeResponse {
    pub size: usize,
}

/// One row of the `list` reply
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryView {
    pub key: String,
    pub value: String,
    pub expires_at: u64,
    pub ttl_remaining_ms: u64,
}

/// Reply to `list`: live entries, most recently used first
#[derive(Debug, Clone, Serialize)]
pub struct ListResponse {
    pub entries: Vec<EntryView>,
}

impl ListResponse {
    pub fn new(snapshot: Vec<(String, CacheEntry)>, now: u64) -> Self {
        let entries = snapshot
            .into_iter()
            .map(|(key, entry)| EntryView {
                ttl_remaining_ms: entry.ttl_remaining_ms(now),
                expires_at: entry.expires_at,
                value: entry.value,
                key,
            })
            .collect();
        Self { entries }
    }
}

/// Reply to `stats`
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub expirations: u64,
    pub evictions: u64,
    pub saves: u64,
    pub save_failures: u64,
    /// Current number of resident entries
    pub total_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            expirations: stats.expirations,
            evictions: stats.evictions,
            saves: stats.saves,
            save_failures: stats.save_failures,
            total_entries: stats.total_entries,
        }
    }
}

/// Reply to `help`
#[derive(Debug, Clone, Serialize)]
pub struct HelpResponse {
    pub commands: Vec<&'static str>,
}

/// Error reply for rejected input
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
