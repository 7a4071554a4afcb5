//! Durable projection wrapper for in-memory state containers.
//!
//! [`PersistedStore`] decorates a plain state value so a configurable subset
//! of its fields survives process restarts: defaults are built synchronously,
//! one storage read is issued at open and merged into live state when it
//! resolves, and every mutation re-derives the projection and hands it to a
//! slot-keyed [`WriteQueue`] without blocking the caller. The in-memory state
//! is always authoritative for the running process; durability is best-effort
//! and write failures are logged, never thrown back into the mutation call.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

mod write_queue;

#[cfg(test)]
mod testing;

use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use extension_host::{StorageArea, TaskSpawner};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

pub use write_queue::WriteQueue;

/// Pure function deriving the durable projection from the live state.
pub type Projector<S> = Rc<dyn Fn(&S) -> Result<Value, String>>;

/// Pure function combining a loaded projection with the live state.
pub type Merger<S> = Rc<dyn Fn(&Value, &S) -> Result<S, String>>;

/// Default merge policy: a shallow overlay where every field present in the
/// loaded projection wins over the live value of that field, and fields
/// absent from the projection keep their live values.
///
/// # Errors
///
/// Returns an error when the loaded value is not an object, or when the
/// overlaid object no longer deserializes into `S`.
pub fn shallow_merge<S>(loaded: &Value, current: &S) -> Result<S, String>
where
    S: Serialize + DeserializeOwned,
{
    let loaded = loaded
        .as_object()
        .ok_or_else(|| "persisted projection is not an object".to_string())?;
    let mut base = match serde_json::to_value(current).map_err(|e| e.to_string())? {
        Value::Object(map) => map,
        _ => return Err("state does not serialize to an object".to_string()),
    };
    for (key, value) in loaded {
        base.insert(key.clone(), value.clone());
    }
    serde_json::from_value(Value::Object(base)).map_err(|e| e.to_string())
}

/// Storage slot and durability policy for one persisted container.
///
/// The slot is exclusively owned by its container; two containers sharing a
/// slot overwrite each other wholesale on every write.
pub struct PersistOptions<S> {
    slot: String,
    projector: Projector<S>,
    merger: Merger<S>,
}

impl<S> Clone for PersistOptions<S> {
    fn clone(&self) -> Self {
        Self {
            slot: self.slot.clone(),
            projector: Rc::clone(&self.projector),
            merger: Rc::clone(&self.merger),
        }
    }
}

impl<S> PersistOptions<S> {
    /// Creates options with an explicit projector and merger.
    pub fn new(
        slot: impl Into<String>,
        projector: impl Fn(&S) -> Result<Value, String> + 'static,
        merger: impl Fn(&Value, &S) -> Result<S, String> + 'static,
    ) -> Self {
        Self {
            slot: slot.into(),
            projector: Rc::new(projector),
            merger: Rc::new(merger),
        }
    }

    /// Replaces the projector, keeping slot and merger.
    pub fn with_projector(
        mut self,
        projector: impl Fn(&S) -> Result<Value, String> + 'static,
    ) -> Self {
        self.projector = Rc::new(projector);
        self
    }

    /// Replaces the merger, keeping slot and projector.
    ///
    /// The default [`shallow_merge`] lets a loaded projection win over
    /// in-session mutations of projected fields; containers that want
    /// mutations-since-open to win supply their own policy here.
    pub fn with_merger(
        mut self,
        merger: impl Fn(&Value, &S) -> Result<S, String> + 'static,
    ) -> Self {
        self.merger = Rc::new(merger);
        self
    }

    /// Storage slot owned by this container.
    pub fn slot(&self) -> &str {
        &self.slot
    }
}

impl<S> PersistOptions<S>
where
    S: Serialize + DeserializeOwned,
{
    /// Options persisting the whole state under `slot`: identity projector
    /// and [`shallow_merge`] merge policy.
    pub fn whole_state(slot: impl Into<String>) -> Self {
        Self::new(
            slot,
            |state: &S| serde_json::to_value(state).map_err(|e| e.to_string()),
            |loaded: &Value, current: &S| shallow_merge(loaded, current),
        )
    }
}

/// Load lifecycle of a persisted container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    /// Defaults are live and usable; the initial read has not resolved yet.
    LoadPending,
    /// The initial read found no data (or failed); live state is final.
    DefaultsReady,
    /// The initial read found data and merged it into live state.
    LoadedAndMerged,
}

/// Durable wrapper around one in-memory state container.
///
/// Mutations apply synchronously in call order and are accepted in every
/// load phase. The single load-and-merge always runs against the state at
/// the moment the read resolves, so mutations made while the read was in
/// flight are never merged away by a stale snapshot.
pub struct PersistedStore<S> {
    state: RefCell<S>,
    phase: Cell<LoadPhase>,
    mutated_while_loading: Cell<bool>,
    options: PersistOptions<S>,
    queue: WriteQueue,
    storage: Rc<dyn StorageArea>,
}

impl<S: 'static> PersistedStore<S> {
    /// Builds the container's defaults synchronously and issues the single
    /// initial `storage.get` for its slot.
    ///
    /// The returned store is immediately usable; [`LoadPhase::LoadPending`]
    /// only reports that the read has not resolved yet.
    pub fn open(
        storage: Rc<dyn StorageArea>,
        spawner: Rc<dyn TaskSpawner>,
        state_factory: impl FnOnce() -> S,
        options: PersistOptions<S>,
    ) -> Rc<Self> {
        let store = Rc::new(Self {
            state: RefCell::new(state_factory()),
            phase: Cell::new(LoadPhase::LoadPending),
            mutated_while_loading: Cell::new(false),
            queue: WriteQueue::new(Rc::clone(&storage), Rc::clone(&spawner)),
            options,
            storage,
        });
        store.begin_load(&spawner);
        store
    }

    /// Applies `mutate` synchronously, then enqueues the new projection for
    /// fire-and-forget persistence.
    ///
    /// Persistence failures are logged by the queue and never propagate
    /// here; the in-memory change is never rolled back.
    pub fn update(&self, mutate: impl FnOnce(&mut S)) {
        mutate(&mut self.state.borrow_mut());
        if self.phase.get() == LoadPhase::LoadPending {
            self.mutated_while_loading.set(true);
        }
        self.enqueue_projection();
    }

    /// Runs `read` against the live state.
    pub fn with<R>(&self, read: impl FnOnce(&S) -> R) -> R {
        read(&self.state.borrow())
    }

    /// Returns a clone of the live state.
    pub fn snapshot(&self) -> S
    where
        S: Clone,
    {
        self.state.borrow().clone()
    }

    /// Current load phase.
    pub fn phase(&self) -> LoadPhase {
        self.phase.get()
    }

    /// Storage slot owned by this container.
    pub fn slot(&self) -> &str {
        self.options.slot()
    }

    /// Returns whether no persistence write is pending or in flight.
    pub fn persistence_idle(&self) -> bool {
        self.queue.is_idle()
    }

    fn begin_load(self: &Rc<Self>, spawner: &Rc<dyn TaskSpawner>) {
        let store = Rc::clone(self);
        spawner.spawn_local(Box::pin(async move {
            let keys = [store.options.slot()];
            match store.storage.get(&keys).await {
                Ok(mut found) => match found.remove(store.options.slot()) {
                    Some(value) => store.merge_loaded(&value),
                    None => store.phase.set(LoadPhase::DefaultsReady),
                },
                Err(err) => {
                    log::warn!("initial load of `{}` failed: {err}", store.options.slot());
                    store.phase.set(LoadPhase::DefaultsReady);
                }
            }
        }));
    }

    fn merge_loaded(&self, loaded: &Value) {
        let merged = {
            let current = self.state.borrow();
            (self.options.merger)(loaded, &current)
        };
        match merged {
            Ok(next) => {
                // One atomic swap; observers never see an intermediate state.
                *self.state.borrow_mut() = next;
                self.phase.set(LoadPhase::LoadedAndMerged);
                if self.mutated_while_loading.get() {
                    // Mutations raced the load; re-persist so the slot
                    // converges to the merged state.
                    self.enqueue_projection();
                }
            }
            Err(err) => {
                log::warn!("merging persisted `{}` failed: {err}", self.options.slot());
                self.phase.set(LoadPhase::DefaultsReady);
            }
        }
    }

    fn enqueue_projection(&self) {
        let projection = {
            let state = self.state.borrow();
            (self.options.projector)(&state)
        };
        match projection {
            Ok(value) => self.queue.enqueue(self.options.slot(), value),
            Err(err) => {
                log::warn!("projecting `{}` for persistence failed: {err}", self.options.slot());
            }
        }
    }
}

/// Loads and deserializes the value stored under `slot`.
///
/// Resolves `Ok(None)` when nothing is stored there.
///
/// # Errors
///
/// Returns an error when the host reports a read failure or the stored value
/// does not deserialize into `T`.
pub async fn load_slot<T: DeserializeOwned>(
    storage: &dyn StorageArea,
    slot: &str,
) -> Result<Option<T>, String> {
    let mut found = storage.get(&[slot]).await?;
    match found.remove(slot) {
        Some(value) => serde_json::from_value(value).map(Some).map_err(|e| e.to_string()),
        None => Ok(None),
    }
}

/// Serializes and stores `value` under `slot`, awaiting host confirmation.
///
/// # Errors
///
/// Returns an error when serialization fails or the host reports a write
/// failure.
pub async fn save_slot<T: Serialize>(
    storage: &dyn StorageArea,
    slot: &str,
    value: &T,
) -> Result<(), String> {
    let value = serde_json::to_value(value).map_err(|e| e.to_string())?;
    let mut items = extension_host::JsonMap::new();
    items.insert(slot.to_string(), value);
    storage.set(items).await
}

/// Removes the value stored under `slot`.
///
/// # Errors
///
/// Returns an error when the host reports a failure.
pub async fn remove_slot(storage: &dyn StorageArea, slot: &str) -> Result<(), String> {
    storage.remove(&[slot]).await
}
