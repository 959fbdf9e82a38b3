//! Integration Tests for the Cache Engine
//!
//! Drives the public API end to end with a manual clock, checking the
//! observable behavior scenarios and persistence through real stores.

use std::sync::Arc;

use tempfile::TempDir;
use ttl_lru_cache::cache::{CacheEngine, EventKind, EventLog, ManualClock};
use ttl_lru_cache::persistence::{BlobStore, FileStore, MemoryStore};
use ttl_lru_cache::{CacheConfig, CacheError};

// == Helper Functions ==

const START: u64 = 1_700_000_000_000;
const STORAGE_KEY: &str = "scenario-cache";

fn config(max_size: usize) -> CacheConfig {
    CacheConfig::new(max_size, 60_000, STORAGE_KEY)
}

fn build<S: BlobStore + 'static>(
    max_size: usize,
    store: S,
    clock: &ManualClock,
) -> (CacheEngine, EventLog) {
    let log = EventLog::new(500);
    let engine = CacheEngine::new(config(max_size), store, Arc::new(clock.clone()), log.clone())
        .expect("valid config");
    (engine, log)
}

fn keys(engine: &mut CacheEngine) -> Vec<String> {
    engine.snapshot().into_iter().map(|(k, _)| k).collect()
}

// == Behavior Scenarios ==

#[test]
fn test_set_then_get_returns_value() {
    let clock = ManualClock::new(START);
    let (mut engine, _log) = build(10, MemoryStore::new(), &clock);

    engine.set("a", "1", None).unwrap();

    assert_eq!(engine.get("a").unwrap().as_deref(), Some("1"));
}

#[test]
fn test_overwrite_returns_latest_and_keeps_size() {
    let clock = ManualClock::new(START);
    let (mut engine, _log) = build(10, MemoryStore::new(), &clock);

    engine.set("a", "1", None).unwrap();
    engine.set("a", "2", None).unwrap();

    assert_eq!(engine.get("a").unwrap().as_deref(), Some("2"));
    assert_eq!(engine.size(), 1);
}

#[test]
fn test_recently_read_entry_survives_eviction() {
    let clock = ManualClock::new(START);
    let (mut engine, log) = build(3, MemoryStore::new(), &clock);

    engine.set("A", "a", None).unwrap();
    engine.set("B", "b", None).unwrap();
    engine.set("C", "c", None).unwrap();
    engine.get("A").unwrap();
    engine.set("D", "d", None).unwrap();

    let mut remaining = keys(&mut engine);
    remaining.sort();
    assert_eq!(remaining, vec!["A", "C", "D"]);

    let evicted: Vec<_> = log
        .events()
        .into_iter()
        .filter(|e| e.kind == EventKind::Evicted)
        .collect();
    assert_eq!(evicted.len(), 1);
    assert_eq!(evicted[0].key.as_deref(), Some("B"));
}

#[test]
fn test_expired_entry_is_absent_and_not_counted() {
    let clock = ManualClock::new(START);
    let (mut engine, _log) = build(10, MemoryStore::new(), &clock);

    engine.set("a", "1", Some(1_000)).unwrap();
    clock.advance(2_000);

    assert_eq!(engine.get("a").unwrap(), None);
    assert_eq!(engine.size(), 0);
}

#[test]
fn test_set_cleans_up_expired_entries() {
    let clock = ManualClock::new(START);
    let (mut engine, _log) = build(10, MemoryStore::new(), &clock);

    engine.set("a", "1", Some(1_000)).unwrap();
    clock.advance(2_000);
    engine.set("b", "2", None).unwrap();

    assert_eq!(engine.resident_count(), 1);
    assert!(!keys(&mut engine).contains(&"a".to_string()));
}

#[test]
fn test_corrupt_snapshot_starts_empty() {
    let clock = ManualClock::new(START);
    let mut store = MemoryStore::new();
    store.write(STORAGE_KEY, "not valid json").unwrap();

    let (mut engine, log) = build(10, store, &clock);

    assert_eq!(engine.size(), 0);
    let events = log.events();
    assert_eq!(events[0].kind, EventKind::ParseError);
    assert!(events[0].message.contains(STORAGE_KEY));
}

// == Invariants ==

#[test]
fn test_clear_and_delete_are_idempotent() {
    let clock = ManualClock::new(START);
    let (mut engine, _log) = build(10, MemoryStore::new(), &clock);
    engine.set("a", "1", None).unwrap();

    engine.clear();
    assert_eq!(engine.size(), 0);
    engine.clear();
    assert_eq!(engine.size(), 0);

    assert!(!engine.delete("missing").unwrap());
    assert!(!engine.delete("missing").unwrap());
    assert_eq!(engine.size(), 0);
}

#[test]
fn test_empty_key_is_rejected() {
    let clock = ManualClock::new(START);
    let (mut engine, _log) = build(10, MemoryStore::new(), &clock);

    assert!(matches!(
        engine.set("", "x", None),
        Err(CacheError::InvalidKey(_))
    ));
    assert_eq!(engine.size(), 0);
}

#[test]
fn test_every_event_names_a_kind_and_timestamp() {
    let clock = ManualClock::new(START);
    let (mut engine, log) = build(1, MemoryStore::new(), &clock);

    engine.set("a", "1", Some(10)).unwrap();
    engine.get("a").unwrap();
    clock.advance(10);
    engine.get("a").unwrap();
    engine.get("a").unwrap();
    engine.set("b", "2", None).unwrap();
    engine.set("c", "3", None).unwrap();
    engine.delete("c").unwrap();
    engine.clear();

    assert_eq!(
        log.kinds(),
        vec![
            EventKind::Loaded,
            EventKind::Set,
            EventKind::Saved,
            EventKind::Hit,
            EventKind::Expired,
            EventKind::Miss,
            EventKind::Set,
            EventKind::Saved,
            EventKind::Evicted,
            EventKind::Set,
            EventKind::Saved,
            EventKind::Delete,
            EventKind::Saved,
            EventKind::Clear,
            EventKind::Saved,
        ]
    );
    assert!(log.events().iter().all(|e| e.timestamp_ms >= START));
}

// == File-backed Persistence ==

#[test]
fn test_file_store_round_trip() {
    let dir = TempDir::new().unwrap();
    let clock = ManualClock::new(START);

    {
        let (mut engine, _log) = build(10, FileStore::new(dir.path()).unwrap(), &clock);
        engine.set("a", "1", None).unwrap();
        engine.set("b", "2", Some(500)).unwrap();
        engine.set("c", "3", None).unwrap();
        engine.get("a").unwrap();
        engine.delete("c").unwrap();
    }

    clock.advance(1_000);
    let (mut engine, log) = build(10, FileStore::new(dir.path()).unwrap(), &clock);

    assert_eq!(keys(&mut engine), vec!["a"]);
    assert_eq!(engine.get("a").unwrap().as_deref(), Some("1"));
    let loaded = &log.events()[0];
    assert_eq!(loaded.kind, EventKind::Loaded);
    assert!(loaded.message.contains("Loaded 1 entries"));
    assert!(loaded.message.contains("1 expired discarded"));
}

#[test]
fn test_file_store_corrupt_file() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join(format!("{}.json", STORAGE_KEY)), "{{{{").unwrap();
    let clock = ManualClock::new(START);

    let (mut engine, log) = build(10, FileStore::new(dir.path()).unwrap(), &clock);

    assert_eq!(engine.size(), 0);
    assert_eq!(log.kinds()[0], EventKind::ParseError);

    engine.set("fresh", "1", None).unwrap();
    let raw = std::fs::read_to_string(dir.path().join(format!("{}.json", STORAGE_KEY))).unwrap();
    assert!(raw.contains("fresh"));
}

#[test]
fn test_unusable_storage_key_keeps_cache_working() {
    let dir = TempDir::new().unwrap();
    let clock = ManualClock::new(START);
    let log = EventLog::default();
    let mut engine = CacheEngine::new(
        CacheConfig::new(10, 60_000, "../outside"),
        FileStore::new(dir.path()).unwrap(),
        Arc::new(clock),
        log.clone(),
    )
    .unwrap();

    engine.set("a", "1", None).unwrap();

    assert_eq!(engine.get("a").unwrap().as_deref(), Some("1"));
    assert!(log
        .kinds()
        .iter()
        .filter(|k| **k == EventKind::ParseError)
        .count()
        >= 2);
}
