//! Typed JSON documents over a key-value medium.

use std::{fmt, sync::Arc};

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::{debug, warn};

use super::{KeyValueStore, StoreError};

/// Storage key of the cart document.
pub const CART_KEY: &str = "golfShopCart";

/// Storage key of the requested-items document.
pub const REQUESTS_KEY: &str = "golfShopRequests";

/// Loads and saves JSON arrays of records under fixed keys.
#[derive(Clone)]
pub struct Documents {
    store: Arc<dyn KeyValueStore>,
}

impl Documents {
    /// Wrap a storage medium.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Underlying storage medium.
    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    /// Load the records stored under `key`.
    ///
    /// An absent key yields an empty collection, and so does a value that is
    /// not a JSON array: a corrupted entry must never take a view down.
    /// Records that do not decode as `T` are skipped one by one, so the rest
    /// of the array survives.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        let Some(raw) = self.store.get_item(key) else {
            debug!(key, "document absent");
            return Vec::new();
        };

        let values: Vec<Value> = match serde_json::from_str(&raw) {
            Ok(values) => values,
            Err(error) => {
                warn!(key, %error, "discarding malformed document");
                return Vec::new();
            }
        };

        values
            .into_iter()
            .enumerate()
            .filter_map(|(index, value)| match serde_json::from_value(value) {
                Ok(record) => Some(record),
                Err(error) => {
                    warn!(key, index, %error, "discarding malformed record");
                    None
                }
            })
            .collect()
    }

    /// Replace the records stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the records cannot be encoded or the
    /// medium rejects the write.
    pub fn save<T: Serialize>(&self, key: &str, records: &[T]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(records).map_err(|source| StoreError::Encode {
            key: key.to_string(),
            source,
        })?;

        self.store.set_item(key, &raw)?;

        debug!(key, records = records.len(), "document saved");

        Ok(())
    }
}

impl fmt::Debug for Documents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Documents").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;
    use serde::Deserialize;
    use testresult::TestResult;

    use crate::store::{MemoryStore, MockKeyValueStore};

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Record {
        id: u32,
    }

    fn documents_with(raw: Option<&str>) -> Documents {
        let raw = raw.map(str::to_string);
        let mut store = MockKeyValueStore::new();

        store
            .expect_get_item()
            .with(eq(CART_KEY))
            .returning(move |_| raw.clone());

        Documents::new(Arc::new(store))
    }

    #[test]
    fn load_absent_key_is_empty() {
        let documents = documents_with(None);

        assert!(documents.load::<Record>(CART_KEY).is_empty());
    }

    #[test]
    fn load_malformed_json_is_empty() {
        let documents = documents_with(Some("{not json"));

        assert!(documents.load::<Record>(CART_KEY).is_empty());
    }

    #[test]
    fn load_wrong_shape_is_empty() {
        let documents = documents_with(Some(r#"{"id": 1}"#));

        assert!(documents.load::<Record>(CART_KEY).is_empty());
    }

    #[test]
    fn load_decodes_array() {
        let documents = documents_with(Some(r#"[{"id": 1}, {"id": 2}]"#));

        assert_eq!(
            documents.load::<Record>(CART_KEY),
            vec![Record { id: 1 }, Record { id: 2 }]
        );
    }

    #[test]
    fn load_skips_only_undecodable_records() {
        let documents =
            documents_with(Some(r#"[{"id": 1}, {"id": "two"}, {"name": "x"}, {"id": 4}]"#));

        assert_eq!(
            documents.load::<Record>(CART_KEY),
            vec![Record { id: 1 }, Record { id: 4 }]
        );
    }

    #[test]
    fn save_then_load_returns_records() -> TestResult {
        let documents = Documents::new(Arc::new(MemoryStore::new()));

        documents.save(REQUESTS_KEY, &[Record { id: 7 }])?;

        assert_eq!(documents.load::<Record>(REQUESTS_KEY), vec![Record { id: 7 }]);
        assert!(documents.load::<Record>(CART_KEY).is_empty());

        Ok(())
    }

    #[test]
    fn save_propagates_medium_failure() {
        let mut store = MockKeyValueStore::new();

        store
            .expect_set_item()
            .returning(|_, _| Err(StoreError::Unavailable("quota exceeded".to_string())));

        let documents = Documents::new(Arc::new(store));
        let result = documents.save(CART_KEY, &[Record { id: 1 }]);

        assert!(
            matches!(result, Err(StoreError::Unavailable(ref reason)) if reason == "quota exceeded"),
            "expected Unavailable, got {result:?}"
        );
    }
}
