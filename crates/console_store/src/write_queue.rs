//! Slot-keyed write coalescing for fire-and-forget persistence.

use std::{
    cell::{Cell, RefCell},
    collections::BTreeMap,
    rc::Rc,
};

use extension_host::{JsonMap, StorageArea, TaskSpawner};
use serde_json::Value;

/// Serializes storage writes so the last value enqueued for a slot is the
/// last value to land, even when the host delays an earlier write.
///
/// Pending values are keyed by storage slot and coalesced: enqueueing a slot
/// that already has a pending value replaces it. One background task drains
/// the queue, issuing a single `set` at a time, so overlapping writes cannot
/// complete out of order. Write failures are logged and never surfaced to the
/// caller that enqueued the value.
#[derive(Clone)]
pub struct WriteQueue {
    inner: Rc<QueueInner>,
}

struct QueueInner {
    storage: Rc<dyn StorageArea>,
    spawner: Rc<dyn TaskSpawner>,
    pending: RefCell<BTreeMap<String, Value>>,
    draining: Cell<bool>,
}

impl WriteQueue {
    /// Creates a queue writing through `storage`, draining on `spawner`.
    pub fn new(storage: Rc<dyn StorageArea>, spawner: Rc<dyn TaskSpawner>) -> Self {
        Self {
            inner: Rc::new(QueueInner {
                storage,
                spawner,
                pending: RefCell::new(BTreeMap::new()),
                draining: Cell::new(false),
            }),
        }
    }

    /// Queues `value` as the latest pending write for `slot` and starts the
    /// drain task if one is not already running.
    pub fn enqueue(&self, slot: &str, value: Value) {
        self.inner.pending.borrow_mut().insert(slot.to_string(), value);
        self.ensure_drain();
    }

    /// Returns whether nothing is pending and no write is in flight.
    pub fn is_idle(&self) -> bool {
        !self.inner.draining.get() && self.inner.pending.borrow().is_empty()
    }

    fn take_next(&self) -> Option<(String, Value)> {
        self.inner.pending.borrow_mut().pop_first()
    }

    fn ensure_drain(&self) {
        if self.inner.draining.get() {
            return;
        }
        self.inner.draining.set(true);

        let queue = self.clone();
        self.inner.spawner.spawn_local(Box::pin(async move {
            while let Some((slot, value)) = queue.take_next() {
                let mut items = JsonMap::new();
                items.insert(slot.clone(), value);
                if let Err(err) = queue.inner.storage.set(items).await {
                    log::warn!("persisting `{slot}` failed: {err}");
                }
            }
            queue.inner.draining.set(false);
        }));
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::LocalPool;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use crate::testing::ScriptedStorage;

    use super::*;

    fn queue_over(storage: &ScriptedStorage, pool: &LocalPool) -> WriteQueue {
        WriteQueue::new(Rc::new(storage.clone()), Rc::new(pool.spawner()))
    }

    #[test]
    fn values_enqueued_before_the_drain_runs_are_coalesced() {
        let storage = ScriptedStorage::new();
        let mut pool = LocalPool::new();
        let queue = queue_over(&storage, &pool);

        queue.enqueue("slot", json!(1));
        queue.enqueue("slot", json!(2));
        queue.enqueue("slot", json!(3));
        pool.run_until_stalled();

        assert_eq!(storage.set_calls(), 1);
        assert_eq!(storage.stored("slot"), Some(json!(3)));
        assert!(queue.is_idle());
    }

    #[test]
    fn distinct_slots_each_get_their_own_write() {
        let storage = ScriptedStorage::new();
        let mut pool = LocalPool::new();
        let queue = queue_over(&storage, &pool);

        queue.enqueue("a", json!("left"));
        queue.enqueue("b", json!("right"));
        pool.run_until_stalled();

        assert_eq!(storage.set_calls(), 2);
        assert_eq!(storage.stored("a"), Some(json!("left")));
        assert_eq!(storage.stored("b"), Some(json!("right")));
    }

    #[test]
    fn a_delayed_write_cannot_overtake_a_later_value() {
        let storage = ScriptedStorage::new();
        let mut pool = LocalPool::new();
        let queue = queue_over(&storage, &pool);

        let release = storage.gate_next_set();
        queue.enqueue("slot", json!("first"));
        pool.run_until_stalled();
        assert_eq!(storage.set_calls(), 1, "first write is in flight");

        queue.enqueue("slot", json!("second"));
        queue.enqueue("slot", json!("third"));
        pool.run_until_stalled();
        assert_eq!(storage.set_calls(), 1, "later values wait behind the gate");

        let _ = release.send(());
        pool.run_until_stalled();

        assert_eq!(storage.set_calls(), 2);
        assert_eq!(storage.stored("slot"), Some(json!("third")));
        assert!(queue.is_idle());
    }

    #[test]
    fn a_failed_write_does_not_stall_the_queue() {
        let storage = ScriptedStorage::new();
        let mut pool = LocalPool::new();
        let queue = queue_over(&storage, &pool);

        storage.fail_next_set("quota exceeded");
        queue.enqueue("slot", json!("lost"));
        pool.run_until_stalled();
        assert_eq!(storage.stored("slot"), None);

        queue.enqueue("slot", json!("kept"));
        pool.run_until_stalled();
        assert_eq!(storage.stored("slot"), Some(json!("kept")));
        assert!(queue.is_idle());
    }
}
