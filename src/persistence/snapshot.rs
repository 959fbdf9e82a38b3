//! Snapshot codec and persistence adapter
//!
//! A snapshot is the ordered `(key, entry)` list of the whole cache, MRU
//! first, stored as a JSON array of `[key, {"value", "expiresAt"}]` pairs.

use crate::cache::CacheEntry;
use crate::error::PersistenceError;
use crate::persistence::BlobStore;

/// Full cache state, MRU first.
pub type Snapshot = Vec<(String, CacheEntry)>;

/// Serialize a snapshot to its JSON wire form.
pub fn encode(snapshot: &[(String, CacheEntry)]) -> Result<String, PersistenceError> {
    Ok(serde_json::to_string(snapshot)?)
}

/// Parse a snapshot from its JSON wire form.
pub fn decode(raw: &str) -> Result<Snapshot, PersistenceError> {
    Ok(serde_json::from_str(raw)?)
}

// == Load Outcome ==
/// Result of reading the snapshot stored under a storage key.
#[derive(Debug)]
pub enum LoadOutcome {
    /// Nothing was ever saved under the key
    Absent,
    /// Something was stored but could not be read back
    Malformed(PersistenceError),
    Loaded(Snapshot),
}

// == Snapshot Adapter ==
/// Saves and loads snapshots through an injected `BlobStore`.
///
/// The adapter is a passive collaborator; it holds no cache state of its own.
pub struct SnapshotAdapter {
    store: Box<dyn BlobStore>,
}

impl SnapshotAdapter {
    pub fn new(store: impl BlobStore + 'static) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    /// Overwrite the snapshot stored under `storage_key`.
    pub fn save(
        &mut self,
        storage_key: &str,
        snapshot: &[(String, CacheEntry)],
    ) -> Result<(), PersistenceError> {
        let blob = encode(snapshot)?;
        self.store.write(storage_key, &blob)?;
        Ok(())
    }

    /// Read the snapshot stored under `storage_key`.
    ///
    /// A backend read failure is reported as `Malformed`: either way the
    /// caller cannot trust what is stored.
    pub fn load(&self, storage_key: &str) -> LoadOutcome {
        match self.store.read(storage_key) {
            Ok(None) => LoadOutcome::Absent,
            Ok(Some(raw)) => match decode(&raw) {
                Ok(snapshot) => LoadOutcome::Loaded(snapshot),
                Err(e) => LoadOutcome::Malformed(e),
            },
            Err(e) => LoadOutcome::Malformed(e.into()),
        }
    }
}

impl std::fmt::Debug for SnapshotAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotAdapter").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    fn sample() -> Snapshot {
        vec![
            ("b".to_string(), CacheEntry::new("2".to_string(), 0, 200)),
            ("a".to_string(), CacheEntry::new("1".to_string(), 0, 100)),
        ]
    }

    #[test]
    fn test_encode_wire_format() {
        let json = encode(&sample()).unwrap();
        assert_eq!(
            json,
            r#"[["b",{"value":"2","expiresAt":200}],["a",{"value":"1","expiresAt":100}]]"#
        );
    }

    #[test]
    fn test_decode_preserves_order() {
        let raw = r#"[["x",{"value":"1","expiresAt":5}],["y",{"value":"2","expiresAt":6}]]"#;
        let snapshot = decode(raw).unwrap();

        let keys: Vec<_> = snapshot.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["x", "y"]);
        assert_eq!(snapshot[1].1.expires_at, 6);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            decode("not valid json"),
            Err(PersistenceError::Malformed(_))
        ));
        assert!(decode(r#"{"a": 1}"#).is_err());
    }

    #[test]
    fn test_adapter_save_and_load() {
        let store = MemoryStore::new();
        let mut adapter = SnapshotAdapter::new(store.clone());

        adapter.save("cache", &sample()).unwrap();

        match adapter.load("cache") {
            LoadOutcome::Loaded(snapshot) => assert_eq!(snapshot, sample()),
            other => panic!("expected snapshot, got {:?}", other),
        }
    }

    #[test]
    fn test_adapter_load_absent() {
        let adapter = SnapshotAdapter::new(MemoryStore::new());
        assert!(matches!(adapter.load("cache"), LoadOutcome::Absent));
    }

    #[test]
    fn test_adapter_load_malformed() {
        let mut store = MemoryStore::new();
        store.write("cache", "not valid json").unwrap();
        let adapter = SnapshotAdapter::new(store);

        assert!(matches!(
            adapter.load("cache"),
            LoadOutcome::Malformed(PersistenceError::Malformed(_))
        ));
    }
}
