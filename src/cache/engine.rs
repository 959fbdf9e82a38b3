//! Cache Engine Module
//!
//! Main cache engine combining the ordered key table with lazy TTL expiration,
//! snapshot persistence and event emission.
//!
//! Every public operation reads the clock once, then runs to completion:
//! sweep, mutate, persist, emit. A host sharing an engine across tasks must
//! hold one lock around each call.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::cache::{
    CacheEntry, CacheEvent, CacheStats, Clock, EventKind, EventSink, NullSink, OrderedTable,
    SystemClock, MAX_KEY_LENGTH, MAX_VALUE_SIZE,
};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};
use crate::persistence::{BlobStore, LoadOutcome, MemoryStore, Snapshot, SnapshotAdapter};

// == Cache Engine ==
/// In-memory cache with TTL expiration, LRU eviction and durable snapshots.
pub struct CacheEngine {
    /// Resident entries in recency order
    table: OrderedTable,
    /// Active configuration
    config: CacheConfig,
    /// Snapshot save/load boundary
    persistence: SnapshotAdapter,
    /// Single time source for every operation
    clock: Arc<dyn Clock>,
    /// Observability output
    events: Box<dyn EventSink>,
    /// Running counters
    stats: CacheStats,
}

impl CacheEngine {
    // == Constructor ==
    /// Creates an engine and loads the snapshot stored under
    /// `config.storage_key`.
    ///
    /// A missing or unreadable snapshot is not an error: the engine starts
    /// empty and reports what happened through `events`. Only an invalid
    /// `config` is rejected.
    pub fn new(
        config: CacheConfig,
        store: impl BlobStore + 'static,
        clock: Arc<dyn Clock>,
        events: impl EventSink + 'static,
    ) -> Result<Self> {
        config.validate()?;

        let mut engine = Self {
            table: OrderedTable::new(),
            config,
            persistence: SnapshotAdapter::new(store),
            clock,
            events: Box::new(events),
            stats: CacheStats::new(),
        };
        engine.load();
        Ok(engine)
    }

    /// Creates an engine over a fresh `MemoryStore`, using wall-clock time
    /// and discarding events.
    pub fn in_memory(config: CacheConfig) -> Result<Self> {
        Self::new(
            config,
            MemoryStore::new(),
            Arc::new(SystemClock::new()),
            NullSink,
        )
    }

    // == Get ==
    /// Retrieves a live value by key, marking it most recently used.
    ///
    /// An expired entry found here is removed and reported as `expired`;
    /// the call is then a miss. Misses leave recency untouched.
    pub fn get(&mut self, key: &str) -> Result<Option<String>> {
        validate_key(key)?;
        let now = self.clock.now_ms();

        match self.table.get(key).map(|entry| entry.is_live(now)) {
            None => {
                self.stats.record_miss();
                self.emit(
                    CacheEvent::new(EventKind::Miss, now, format!("Miss: '{}' not found", key))
                        .with_key(key),
                );
                Ok(None)
            }
            Some(false) => {
                self.expire(key, now);
                self.stats.record_miss();
                Ok(None)
            }
            Some(true) => {
                self.table.touch(key);
                let value = self.table.get(key).map(|entry| entry.value.clone());
                self.stats.record_hit();
                self.emit(
                    CacheEvent::new(EventKind::Hit, now, format!("Hit: '{}'", key)).with_key(key),
                );
                Ok(value)
            }
        }
    }

    // == Set ==
    /// Stores a key-value pair, expiring `ttl_ms` from now.
    ///
    /// `None` uses the configured default TTL; `Some(0)` stores an entry that
    /// is already expired. Expired entries are swept first, then a new key
    /// evicts the LRU entry if the cache is full. The snapshot is persisted
    /// afterwards; a failed write is reported as an event and never undoes
    /// the in-memory change.
    pub fn set(&mut self, key: &str, value: impl Into<String>, ttl_ms: Option<u64>) -> Result<()> {
        validate_key(key)?;
        let value = value.into();
        if value.len() > MAX_VALUE_SIZE {
            return Err(CacheError::InvalidValue(format!(
                "Value exceeds maximum size of {} bytes",
                MAX_VALUE_SIZE
            )));
        }

        let now = self.clock.now_ms();
        self.sweep_at(now);

        let ttl_ms = ttl_ms.unwrap_or(self.config.default_ttl_ms);
        let message = format!("Set '{}' ({} bytes, ttl {} ms)", key, value.len(), ttl_ms);
        let entry = CacheEntry::new(value, now, ttl_ms);

        let evicted = self
            .table
            .insert_bounded(key.to_string(), entry, self.config.max_size);
        for (evicted_key, _) in evicted {
            self.stats.record_eviction();
            self.emit(
                CacheEvent::new(
                    EventKind::Evicted,
                    now,
                    format!("Evicted '{}' (least recently used)", evicted_key),
                )
                .with_key(evicted_key),
            );
        }

        self.emit(CacheEvent::new(EventKind::Set, now, message).with_key(key));
        self.persist(now);
        Ok(())
    }

    // == Delete ==
    /// Removes an entry by key, returning whether a live entry was removed.
    ///
    /// An expired entry is still cleared out but reported as `expired` and
    /// counts as nothing deleted. The snapshot is only written when something
    /// was physically removed.
    pub fn delete(&mut self, key: &str) -> Result<bool> {
        validate_key(key)?;
        let now = self.clock.now_ms();

        let live = match self.table.get(key).map(|entry| entry.is_live(now)) {
            None => {
                self.emit(
                    CacheEvent::new(
                        EventKind::Delete,
                        now,
                        format!("Delete: '{}' not present", key),
                    )
                    .with_key(key),
                );
                return Ok(false);
            }
            Some(false) => {
                self.expire(key, now);
                false
            }
            Some(true) => {
                self.table.remove(key);
                self.emit(
                    CacheEvent::new(EventKind::Delete, now, format!("Deleted '{}'", key))
                        .with_key(key),
                );
                true
            }
        };

        self.persist(now);
        Ok(live)
    }

    // == Clear ==
    /// Empties the cache and persists the empty snapshot.
    pub fn clear(&mut self) {
        let now = self.clock.now_ms();
        let removed = self.table.len();
        self.table.clear();

        self.emit(CacheEvent::new(
            EventKind::Clear,
            now,
            format!("Cleared {} entries", removed),
        ));
        self.persist(now);
    }

    // == Size ==
    /// Returns the number of live entries, sweeping expired ones first.
    pub fn size(&mut self) -> usize {
        let now = self.clock.now_ms();
        self.sweep_at(now);
        self.table.len()
    }

    // == Has ==
    /// Reports whether `key` is live without marking it used.
    ///
    /// An expired entry found here is removed, as with `get`. Invalid keys
    /// are never present.
    pub fn has(&mut self, key: &str) -> bool {
        self.ttl_remaining(key).is_some()
    }

    // == TTL Remaining ==
    /// Remaining lifetime of a live key in milliseconds, without marking it
    /// used.
    pub fn ttl_remaining(&mut self, key: &str) -> Option<u64> {
        if validate_key(key).is_err() {
            return None;
        }
        let now = self.clock.now_ms();

        match self.table.get(key).map(|entry| entry.ttl_remaining_ms(now)) {
            None => None,
            Some(0) => {
                self.expire(key, now);
                None
            }
            Some(remaining) => Some(remaining),
        }
    }

    // == Snapshot ==
    /// Returns the live entries, MRU first, sweeping expired ones first.
    pub fn snapshot(&mut self) -> Snapshot {
        let now = self.clock.now_ms();
        self.sweep_at(now);
        self.table.snapshot()
    }

    /// Same as [`CacheEngine::snapshot`].
    pub fn get_all(&mut self) -> Snapshot {
        self.snapshot()
    }

    // == Sweep ==
    /// Removes every expired entry, returning how many were removed.
    pub fn sweep(&mut self) -> usize {
        let now = self.clock.now_ms();
        self.sweep_at(now)
    }

    // == Configuration ==
    /// Returns the active configuration.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Replaces the configuration.
    ///
    /// A lowered `max_size` is enforced by the next `set`, which evicts one
    /// LRU entry at a time until the bound holds. A new `storage_key` only
    /// affects later saves; nothing is reloaded.
    pub fn reconfigure(&mut self, config: CacheConfig) -> Result<()> {
        config.validate()?;
        info!(
            "Cache reconfigured: max_size={}, default_ttl_ms={}, storage_key={}",
            config.max_size, config.default_ttl_ms, config.storage_key
        );
        self.config = config;
        Ok(())
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.table.len());
        stats
    }

    /// Number of resident entries, including expired ones not yet swept.
    pub fn resident_count(&self) -> usize {
        self.table.len()
    }

    /// Current reading of the engine's clock.
    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    // == Internals ==
    fn emit(&mut self, event: CacheEvent) {
        self.events.emit(event);
    }

    /// Removes one expired key and reports it.
    fn expire(&mut self, key: &str, now: u64) {
        if self.table.remove(key).is_some() {
            self.stats.record_expiration();
            self.emit(
                CacheEvent::new(EventKind::Expired, now, format!("Expired '{}'", key))
                    .with_key(key),
            );
        }
    }

    fn sweep_at(&mut self, now: u64) -> usize {
        let removed = self.table.remove_where(|_, entry| entry.is_expired(now));
        for key in &removed {
            self.stats.record_expiration();
            self.emit(
                CacheEvent::new(EventKind::Expired, now, format!("Expired '{}'", key))
                    .with_key(key.as_str()),
            );
        }
        if !removed.is_empty() {
            debug!("TTL sweep: removed {} expired entries", removed.len());
        }
        removed.len()
    }

    fn persist(&mut self, now: u64) {
        let snapshot = self.table.snapshot();
        let storage_key = self.config.storage_key.clone();

        match self.persistence.save(&storage_key, &snapshot) {
            Ok(()) => {
                self.stats.record_save(true);
                self.emit(CacheEvent::new(
                    EventKind::Saved,
                    now,
                    format!("Saved {} entries under '{}'", snapshot.len(), storage_key),
                ));
            }
            Err(e) => {
                warn!("Failed to persist snapshot '{}': {}", storage_key, e);
                self.stats.record_save(false);
                self.emit(CacheEvent::new(
                    EventKind::ParseError,
                    now,
                    format!("Failed to save snapshot '{}': {}", storage_key, e),
                ));
            }
        }
    }

    fn load(&mut self) {
        let now = self.clock.now_ms();
        let storage_key = self.config.storage_key.clone();

        let snapshot = match self.persistence.load(&storage_key) {
            LoadOutcome::Absent => {
                info!("No snapshot stored under '{}', starting empty", storage_key);
                self.emit(CacheEvent::new(
                    EventKind::Loaded,
                    now,
                    format!("Loaded 0 entries (nothing stored under '{}')", storage_key),
                ));
                return;
            }
            LoadOutcome::Malformed(e) => {
                warn!("Discarding snapshot '{}': {}", storage_key, e);
                self.emit(CacheEvent::new(
                    EventKind::ParseError,
                    now,
                    format!("Could not load snapshot '{}': {}", storage_key, e),
                ));
                return;
            }
            LoadOutcome::Loaded(snapshot) => snapshot,
        };

        let mut seen = HashSet::new();
        let mut live = Vec::new();
        let mut expired = 0usize;
        let mut dropped = 0usize;

        for (key, entry) in snapshot {
            if validate_key(&key).is_err() || !seen.insert(key.clone()) {
                dropped += 1;
            } else if entry.is_expired(now) {
                expired += 1;
            } else {
                live.push((key, entry));
            }
        }

        if live.len() > self.config.max_size {
            dropped += live.len() - self.config.max_size;
            live.truncate(self.config.max_size);
        }

        // Persisted order is MRU first; insert from the LRU end to rebuild it.
        let loaded = live.len();
        for (key, entry) in live.into_iter().rev() {
            self.table.insert(key, entry);
        }

        let mut message = format!(
            "Loaded {} entries from '{}' ({} expired discarded",
            loaded, storage_key, expired
        );
        if dropped > 0 {
            message.push_str(&format!(", {} dropped", dropped));
        }
        message.push(')');

        info!("{}", message);
        self.emit(CacheEvent::new(EventKind::Loaded, now, message));
    }
}

impl std::fmt::Debug for CacheEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheEngine")
            .field("config", &self.config)
            .field("resident", &self.table.len())
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

// == Key Validation ==
fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(CacheError::InvalidKey("Key cannot be empty".to_string()));
    }
    if key.len() > MAX_KEY_LENGTH {
        return Err(CacheError::InvalidKey(format!(
            "Key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        )));
    }
    Ok(())
}
