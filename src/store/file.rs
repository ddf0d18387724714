//! Directory-backed storage.

use std::{
    fs,
    io::{self, ErrorKind, Write as _},
    path::{Path, PathBuf},
};

use tempfile::Builder;
use tracing::{debug, warn};

use super::{KeyValueStore, StorageListener, StoreError};

/// Stores each key as `<key>.json` inside a data directory.
///
/// Values are written to a uniquely named sibling file and renamed into
/// place, so a reader sees either the previous document or the new one and
/// concurrent writers never share a staging file. Writes made by
/// other processes are not reported through [`KeyValueStore::watch`].
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    /// Open a data directory, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::CreateDir`] when the directory cannot be created.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();

        fs::create_dir_all(&root).map_err(|source| StoreError::CreateDir {
            path: root.clone(),
            source,
        })?;

        Ok(Self { root })
    }

    /// Data directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get_item(&self, key: &str) -> Option<String> {
        let path = self.path_for(key);

        match fs::read_to_string(&path) {
            Ok(raw) => Some(raw),
            Err(error) if error.kind() == ErrorKind::NotFound => None,
            Err(error) => {
                warn!(key, path = %path.display(), %error, "unreadable document treated as absent");
                None
            }
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);

        let write_error = |source: io::Error| StoreError::Write {
            key: key.to_string(),
            path: path.clone(),
            source,
        };

        let mut staging = Builder::new()
            .prefix(&format!(".{key}."))
            .suffix(".tmp")
            .tempfile_in(&self.root)
            .map_err(write_error)?;

        staging.write_all(value.as_bytes()).map_err(write_error)?;
        staging.persist(&path).map_err(|error| write_error(error.error))?;

        Ok(())
    }

    fn watch(&self, _listener: StorageListener) {
        debug!(root = %self.root.display(), "file storage raises no cross-process events");
    }
}
