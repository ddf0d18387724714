//! In-memory storage shared between contexts.
//!
//! A [`SharedStorage`] plays the part of the browser's storage area: every
//! [`MemoryStore`] opened from it is a separate context (a tab) reading and
//! writing the same items. A write raises a [`StorageEvent`] in every other
//! context, never in the writer's own.

use std::{
    fmt,
    ops::ControlFlow,
    sync::{
        Arc, Mutex, PoisonError,
        atomic::{AtomicU64, Ordering},
    },
};

use rustc_hash::FxHashMap;

use super::{KeyValueStore, StorageEvent, StorageListener, StoreError};

/// Identifies one context opened on a [`SharedStorage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContextId(u64);

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "context-{}", self.0)
    }
}

#[derive(Default)]
struct Shared {
    items: Mutex<FxHashMap<String, String>>,
    listeners: Mutex<Vec<(ContextId, StorageListener)>>,
    next_context: AtomicU64,
}

/// Storage area that several contexts can open.
#[derive(Clone, Default)]
pub struct SharedStorage {
    shared: Arc<Shared>,
}

impl SharedStorage {
    /// Create an empty storage area.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of listeners registered across every context.
    ///
    /// A listener that asked to stop is dropped the next time it would have
    /// been called.
    pub fn listener_count(&self) -> usize {
        self.shared
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Open a new context on this storage area.
    pub fn open_context(&self) -> MemoryStore {
        let context = ContextId(self.shared.next_context.fetch_add(1, Ordering::Relaxed));

        MemoryStore {
            context,
            shared: Arc::clone(&self.shared),
        }
    }
}

impl fmt::Debug for SharedStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let items = self
            .shared
            .items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len();

        f.debug_struct("SharedStorage")
            .field("items", &items)
            .finish_non_exhaustive()
    }
}

/// One context's handle on a [`SharedStorage`].
#[derive(Clone)]
pub struct MemoryStore {
    context: ContextId,
    shared: Arc<Shared>,
}

impl MemoryStore {
    /// Open the only context of a fresh, private storage area.
    pub fn new() -> Self {
        SharedStorage::new().open_context()
    }

    /// Context this handle writes as.
    pub fn context(&self) -> ContextId {
        self.context
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryStore")
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.shared
            .items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.shared
            .items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());

        // Listeners run outside the lock so they can read the storage back.
        let listeners: Vec<StorageListener> = self
            .shared
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|(context, _)| *context != self.context)
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        let event = StorageEvent {
            key: key.to_string(),
            origin: self.context,
        };

        let finished: Vec<StorageListener> = listeners
            .into_iter()
            .filter(|listener| listener(&event).is_break())
            .collect();

        if !finished.is_empty() {
            self.shared
                .listeners
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .retain(|(_, listener)| {
                    !finished.iter().any(|done| Arc::ptr_eq(done, listener))
                });
        }

        Ok(())
    }

    fn watch(&self, listener: StorageListener) {
        self.shared
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((self.context, listener));
    }
}
