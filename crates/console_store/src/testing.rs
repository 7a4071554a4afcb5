//! Scriptable storage double shared by the wrapper and queue test suites.

use std::{
    cell::{Cell, RefCell},
    collections::VecDeque,
    rc::Rc,
};

use extension_host::{JsonMap, StorageArea, StorageFuture};
use futures::channel::oneshot;
use serde_json::Value;

/// In-memory storage area whose reads and writes can be gated on a channel
/// or scripted to fail, so tests control exactly when host I/O completes.
#[derive(Clone)]
pub(crate) struct ScriptedStorage {
    inner: Rc<ScriptedStorageInner>,
}

struct ScriptedStorageInner {
    entries: RefCell<JsonMap>,
    get_gates: RefCell<VecDeque<oneshot::Receiver<()>>>,
    set_gates: RefCell<VecDeque<oneshot::Receiver<()>>>,
    get_failures: RefCell<VecDeque<String>>,
    set_failures: RefCell<VecDeque<String>>,
    set_calls: Cell<usize>,
}

impl ScriptedStorage {
    pub(crate) fn new() -> Self {
        Self {
            inner: Rc::new(ScriptedStorageInner {
                entries: RefCell::new(JsonMap::new()),
                get_gates: RefCell::new(VecDeque::new()),
                set_gates: RefCell::new(VecDeque::new()),
                get_failures: RefCell::new(VecDeque::new()),
                set_failures: RefCell::new(VecDeque::new()),
                set_calls: Cell::new(0),
            }),
        }
    }

    pub(crate) fn seed(&self, key: impl Into<String>, value: Value) {
        self.inner.entries.borrow_mut().insert(key.into(), value);
    }

    pub(crate) fn stored(&self, key: &str) -> Option<Value> {
        self.inner.entries.borrow().get(key).cloned()
    }

    pub(crate) fn set_calls(&self) -> usize {
        self.inner.set_calls.get()
    }

    /// Holds the next `get` until the returned sender fires.
    pub(crate) fn gate_next_get(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.inner.get_gates.borrow_mut().push_back(rx);
        tx
    }

    /// Holds the next `set` until the returned sender fires.
    pub(crate) fn gate_next_set(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.inner.set_gates.borrow_mut().push_back(rx);
        tx
    }

    pub(crate) fn fail_next_get(&self, message: &str) {
        self.inner
            .get_failures
            .borrow_mut()
            .push_back(message.to_string());
    }

    pub(crate) fn fail_next_set(&self, message: &str) {
        self.inner
            .set_failures
            .borrow_mut()
            .push_back(message.to_string());
    }
}

impl StorageArea for ScriptedStorage {
    fn get<'a>(&'a self, keys: &'a [&'a str]) -> StorageFuture<'a, Result<JsonMap, String>> {
        Box::pin(async move {
            let gate = self.inner.get_gates.borrow_mut().pop_front();
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            if let Some(message) = self.inner.get_failures.borrow_mut().pop_front() {
                return Err(message);
            }
            let entries = self.inner.entries.borrow();
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
            self.inner.set_calls.set(self.inner.set_calls.get() + 1);
            let gate = self.inner.set_gates.borrow_mut().pop_front();
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            if let Some(message) = self.inner.set_failures.borrow_mut().pop_front() {
                return Err(message);
            }
            let mut entries = self.inner.entries.borrow_mut();
            for (key, value) in items {
                entries.insert(key, value);
            }
            Ok(())
        })
    }

    fn remove<'a>(&'a self, keys: &'a [&'a str]) -> StorageFuture<'a, Result<(), String>> {
        Box::pin(async move {
            let mut entries = self.inner.entries.borrow_mut();
            for key in keys {
                entries.remove(*key);
            }
            Ok(())
        })
    }
}
