//! Local Persistent Store
//!
//! The storefront keeps its state in two JSON documents held by a key-value
//! medium: the cart under [`CART_KEY`] and the requested gear under
//! [`REQUESTS_KEY`]. The medium is injected through [`KeyValueStore`] so the
//! same managers run against an in-memory storage shared by several contexts
//! or a data directory on disk.
//!
//! Writes are last-write-wins. Nothing versions the documents, so two
//! contexts that loaded the same state and then both save will silently drop
//! one of the writes.

use std::{io, ops::ControlFlow, path::PathBuf, sync::Arc};

use mockall::automock;
use thiserror::Error;

mod documents;
mod file;
mod memory;

pub use documents::{CART_KEY, Documents, REQUESTS_KEY};
pub use file::JsonFileStore;
pub use memory::{ContextId, MemoryStore, SharedStorage};

/// Errors raised by a storage medium.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The data directory could not be created.
    #[error("failed to create data directory {path}")]
    CreateDir {
        /// Directory that could not be created.
        path: PathBuf,

        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// A document could not be written.
    #[error("failed to write {key} to {path}")]
    Write {
        /// Storage key being written.
        key: String,

        /// File backing the key.
        path: PathBuf,

        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// A document could not be encoded as JSON.
    #[error("failed to encode {key}")]
    Encode {
        /// Storage key being written.
        key: String,

        /// Underlying encoding failure.
        #[source]
        source: serde_json::Error,
    },

    /// The medium refused the write for another reason.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Raised in a context when another context wrote to the shared storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
    /// Key that was written.
    pub key: String,

    /// Context that performed the write.
    pub origin: ContextId,
}

/// Callback invoked for storage events raised by other contexts.
///
/// Returning [`ControlFlow::Break`] deregisters the listener.
pub type StorageListener = Arc<dyn Fn(&StorageEvent) -> ControlFlow<()> + Send + Sync>;

/// Key-value storage medium holding raw JSON strings.
#[automock]
pub trait KeyValueStore: Send + Sync {
    /// Returns the raw value stored under `key`, if any.
    ///
    /// Reads never fail: an unreadable entry is reported as absent.
    fn get_item(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the medium cannot persist the value.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Registers a listener for writes performed by other contexts.
    ///
    /// The listener stays registered until it returns
    /// [`ControlFlow::Break`]. Media without a notion of other contexts
    /// accept the listener and never call it.
    fn watch(&self, listener: StorageListener);
}
