//! Cache Entry Module
//!
//! Defines the structure for individual cache entries and the liveness rule.

use serde::{Deserialize, Serialize};

// == Cache Entry ==
/// Represents a single cache entry with its absolute expiration time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    /// The stored value
    pub value: String,
    /// Expiration timestamp (Unix milliseconds)
    pub expires_at: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry that expires `ttl_ms` after `now`.
    ///
    /// A TTL of zero yields an entry that is already expired.
    pub fn new(value: String, now: u64, ttl_ms: u64) -> Self {
        Self {
            value,
            expires_at: now.saturating_add(ttl_ms),
        }
    }

    // == Is Live ==
    /// An entry is live iff `now < expires_at`.
    ///
    /// Boundary condition: once `now` reaches `expires_at` the entry is
    /// logically absent, even if still resident until swept.
    pub fn is_live(&self, now: u64) -> bool {
        now < self.expires_at
    }

    // == Is Expired ==
    pub fn is_expired(&self, now: u64) -> bool {
        !self.is_live(now)
    }

    // == Time To Live ==
    /// Returns remaining TTL in milliseconds, `0` once expired.
    pub fn ttl_remaining_ms(&self, now: u64) -> u64 {
        self.expires_at.saturating_sub(now)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_creation() {
        let entry = CacheEntry::new("test_value".to_string(), 1_000, 500);

        assert_eq!(entry.value, "test_value");
        assert_eq!(entry.expires_at, 1_500);
        assert!(entry.is_live(1_000));
    }

    #[test]
    fn test_entry_expiration() {
        let entry = CacheEntry::new("test_value".to_string(), 1_000, 1_000);

        assert!(entry.is_live(1_999));
        assert!(entry.is_expired(2_000));
        assert!(entry.is_expired(3_000));
    }

    #[test]
    fn test_zero_ttl_is_immediately_expired() {
        let entry = CacheEntry::new("v".to_string(), 42, 0);
        assert!(entry.is_expired(42));
    }

    #[test]
    fn test_ttl_saturates_instead_of_overflowing() {
        let entry = CacheEntry::new("v".to_string(), u64::MAX - 1, 10);
        assert_eq!(entry.expires_at, u64::MAX);
    }

    #[test]
    fn test_ttl_remaining_ms() {
        let entry = CacheEntry::new("test_value".to_string(), 0, 10_000);

        assert_eq!(entry.ttl_remaining_ms(0), 10_000);
        assert_eq!(entry.ttl_remaining_ms(9_000), 1_000);
        assert_eq!(entry.ttl_remaining_ms(12_000), 0);
    }

    #[test]
    fn test_entry_wire_format() {
        let entry = CacheEntry::new("hello".to_string(), 100, 50);
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(json, r#"{"value":"hello","expiresAt":150}"#);
    }
}
