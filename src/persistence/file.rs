//! Local disk blob store

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::StoreError;
use crate::persistence::BlobStore;

/// Blob store writing one file per storage key.
///
/// Layout: `<base_path>/<storage_key>.json`. Writes go to a temp file that
/// is renamed over the target, so readers never see a partial snapshot.
#[derive(Debug, Clone)]
pub struct FileStore {
    base_path: PathBuf,
}

impl FileStore {
    /// Create a file store rooted at `base_path`, creating the directory.
    pub fn new(base_path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let base_path = base_path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path)?;

        info!("Initialized file store at {:?}", base_path);

        Ok(Self { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Get the file path for a storage key
    fn blob_path(&self, key: &str) -> Result<PathBuf, StoreError> {
        if key.is_empty()
            || key == "."
            || key == ".."
            || key.contains(['/', '\\', '\0'])
        {
            return Err(StoreError::InvalidKey(format!(
                "Storage key cannot be used as a file name: {:?}",
                key
            )));
        }
        Ok(self.base_path.join(format!("{}.json", key)))
    }
}

impl BlobStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.blob_path(key)?;
        match fs::read_to_string(&path) {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, key: &str, blob: &str) -> Result<(), StoreError> {
        let path = self.blob_path(key)?;
        let temp_path = path.with_extension("json.tmp");

        if let Err(e) = write_synced(&temp_path, blob).and_then(|()| fs::rename(&temp_path, &path)) {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }

        debug!("Wrote {} bytes to {:?}", blob.len(), path);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<bool, StoreError> {
        let path = self.blob_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

fn write_synced(path: &Path, blob: &str) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(blob.as_bytes())?;
    file.sync_all()
}
