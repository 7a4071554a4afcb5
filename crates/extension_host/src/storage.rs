//! Extension storage-area contracts shared by browser adapters, the persisted
//! store wrapper, and tests.

use std::{cell::RefCell, future::Future, pin::Pin, rc::Rc};

use serde_json::{Map, Value};

/// JSON object mapping storage keys to their stored values.
pub type JsonMap = Map<String, Value>;

/// Object-safe boxed future used by [`StorageArea`] async methods.
pub type StorageFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Durable key/value area shared by every context of the extension.
///
/// Semantics follow the WebExtensions `storage.local` area: reads of absent
/// keys resolve with those keys simply missing from the mapping (never an
/// error), and writes resolve once the host acknowledges them.
pub trait StorageArea {
    /// Loads the stored values for `keys`.
    ///
    /// Keys with no stored value are absent from the returned mapping; a read
    /// where nothing is stored resolves with an empty mapping.
    ///
    /// # Errors
    ///
    /// Returns an error only when the host itself reports a read failure.
    fn get<'a>(&'a self, keys: &'a [&'a str]) -> StorageFuture<'a, Result<JsonMap, String>>;

    /// Stores every entry of `items`, overwriting existing values per key.
    ///
    /// # Errors
    ///
    /// Returns an error only when the host itself reports a write failure.
    fn set<'a>(&'a self, items: JsonMap) -> StorageFuture<'a, Result<(), String>>;

    /// Removes the stored values for `keys`; absent keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error only when the host itself reports a failure.
    fn remove<'a>(&'a self, keys: &'a [&'a str]) -> StorageFuture<'a, Result<(), String>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Inert storage area for hosts without a storage namespace and for baseline tests.
pub struct NoopStorageArea;

impl StorageArea for NoopStorageArea {
    fn get<'a>(&'a self, _keys: &'a [&'a str]) -> StorageFuture<'a, Result<JsonMap, String>> {
        Box::pin(async { Ok(JsonMap::new()) })
    }

    fn set<'a>(&'a self, _items: JsonMap) -> StorageFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }

    fn remove<'a>(&'a self, _keys: &'a [&'a str]) -> StorageFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }
}

#[derive(Debug, Clone)]
/// In-memory storage area with the same observable semantics as a real host area.
pub struct MemoryStorageArea {
    entries: Rc<RefCell<JsonMap>>,
}

impl Default for MemoryStorageArea {
    fn default() -> Self {
        Self {
            entries: Rc::new(RefCell::new(JsonMap::new())),
        }
    }
}

impl MemoryStorageArea {
    /// Creates an empty in-memory area.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts one entry synchronously; useful for seeding test fixtures.
    pub fn insert(&self, key: impl Into<String>, value: Value) {
        self.entries.borrow_mut().insert(key.into(), value);
    }

    /// Returns a copy of everything currently stored.
    pub fn snapshot(&self) -> JsonMap {
        self.entries.borrow().clone()
    }
}

impl StorageArea for MemoryStorageArea {
    fn get<'a>(&'a self, keys: &'a [&'a str]) -> StorageFuture<'a, Result<JsonMap, String>> {
        Box::pin(async move {
            let entries = self.entries.borrow();
            let mut found = JsonMap::new();
            for key in keys {
                if let Some(value) = entries.get(*key) {
                    found.insert((*key).to_string(), value.clone());
                }
            }
            Ok(found)
        })
    }

    fn set<'a>(&'a self, items: JsonMap) -> StorageFuture<'a, Result<(), String>> {
        Box::pin(async move {
            let mut entries = self.entries.borrow_mut();
            for (key, value) in items {
                entries.insert(key, value);
            }
            Ok(())
        })
    }

    fn remove<'a>(&'a self, keys: &'a [&'a str]) -> StorageFuture<'a, Result<(), String>> {
        Box::pin(async move {
            let mut entries = self.entries.borrow_mut();
            for key in keys {
                entries.remove(*key);
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn memory_get_of_missing_keys_resolves_empty_mapping() {
        let area = MemoryStorageArea::new();
        let found = block_on(area.get(&["absent", "also-absent"])).expect("get");
        assert!(found.is_empty());
    }

    #[test]
    fn memory_set_then_get_round_trips() {
        let area = MemoryStorageArea::new();
        let mut items = JsonMap::new();
        items.insert("a".to_string(), json!(1));
        block_on(area.set(items)).expect("set");

        let found = block_on(area.get(&["a"])).expect("get");
        assert_eq!(found.get("a"), Some(&json!(1)));
    }

    #[test]
    fn memory_get_returns_only_present_keys() {
        let area = MemoryStorageArea::new();
        area.insert("present", json!({"n": 3}));

        let found = block_on(area.get(&["present", "missing"])).expect("get");
        assert_eq!(found.len(), 1);
        assert_eq!(found.get("present"), Some(&json!({"n": 3})));
        assert!(!found.contains_key("missing"));
    }

    #[test]
    fn memory_remove_deletes_entries_and_ignores_absent_keys() {
        let area = MemoryStorageArea::new();
        area.insert("keep", json!(true));
        area.insert("drop", json!(false));

        block_on(area.remove(&["drop", "never-stored"])).expect("remove");

        let snapshot = area.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert!(snapshot.contains_key("keep"));
    }

    #[test]
    fn memory_set_overwrites_existing_values() {
        let area = MemoryStorageArea::new();
        area.insert("k", json!("old"));

        let mut items = JsonMap::new();
        items.insert("k".to_string(), json!("new"));
        block_on(area.set(items)).expect("set");

        assert_eq!(area.snapshot().get("k"), Some(&json!("new")));
    }

    #[test]
    fn noop_area_resolves_inert_defaults() {
        let area = NoopStorageArea;
        let found = block_on(area.get(&["anything"])).expect("get");
        assert!(found.is_empty());

        let mut items = JsonMap::new();
        items.insert("anything".to_string(), json!(1));
        block_on(area.set(items)).expect("set");
        block_on(area.remove(&["anything"])).expect("remove");

        let found = block_on(area.get(&["anything"])).expect("get");
        assert!(found.is_empty());
    }
}
