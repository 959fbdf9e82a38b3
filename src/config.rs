//! Configuration Module
//!
//! Holds the engine's `CacheConfig` and the host `Config` loaded from
//! environment variables.

use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{CacheError, Result};

// == Cache Config ==
/// Recognized engine options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheConfig {
    /// Maximum number of resident entries (expired-but-unswept entries count)
    pub max_size: usize,
    /// TTL in milliseconds applied when `set` omits one
    #[serde(rename = "defaultTTL")]
    pub default_ttl_ms: u64,
    /// Identifier under which the whole cache state is persisted
    pub storage_key: String,
}

impl CacheConfig {
    /// Creates a config from its three options.
    pub fn new(max_size: usize, default_ttl_ms: u64, storage_key: impl Into<String>) -> Self {
        Self {
            max_size,
            default_ttl_ms,
            storage_key: storage_key.into(),
        }
    }

    /// Rejects a zero `max_size` or an empty `storage_key`.
    pub fn validate(&self) -> Result<()> {
        if self.max_size == 0 {
            return Err(CacheError::InvalidConfig(
                "maxSize must be at least 1".to_string(),
            ));
        }
        if self.storage_key.is_empty() {
            return Err(CacheError::InvalidConfig(
                "storageKey cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_size: 1000,
            default_ttl_ms: 300_000,
            storage_key: "ttl-lru-cache".to_string(),
        }
    }
}

// == Host Config ==
/// Host process configuration.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Engine options
    pub cache: CacheConfig,
    /// Directory holding persisted snapshots
    pub storage_dir: PathBuf,
    /// Display refresh poll interval in milliseconds
    pub refresh_interval_ms: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_MAX_SIZE` - Maximum resident entries (default: 1000)
    /// - `CACHE_DEFAULT_TTL_MS` - Default TTL in milliseconds (default: 300000)
    /// - `CACHE_STORAGE_KEY` - Snapshot storage key (default: ttl-lru-cache)
    /// - `CACHE_STORAGE_DIR` - Snapshot directory (default: ./cache-data)
    /// - `CACHE_REFRESH_INTERVAL_MS` - Display refresh interval (default: 500)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cache: CacheConfig {
                max_size: parse_env("CACHE_MAX_SIZE").unwrap_or(defaults.cache.max_size),
                default_ttl_ms: parse_env("CACHE_DEFAULT_TTL_MS")
                    .unwrap_or(defaults.cache.default_ttl_ms),
                storage_key: env::var("CACHE_STORAGE_KEY")
                    .ok()
                    .filter(|v| !v.is_empty())
                    .unwrap_or(defaults.cache.storage_key),
            },
            storage_dir: env::var("CACHE_STORAGE_DIR")
                .ok()
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.storage_dir),
            refresh_interval_ms: parse_env("CACHE_REFRESH_INTERVAL_MS")
                .unwrap_or(defaults.refresh_interval_ms),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache: CacheConfig::default(),
            storage_dir: PathBuf::from("./cache-data"),
            refresh_interval_ms: 500,
        }
    }
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
