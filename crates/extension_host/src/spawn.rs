//! Fire-and-forget task spawning behind an object-safe seam.
//!
//! Persistence and background checks must not block their callers, so they
//! hand futures to a [`TaskSpawner`] owned by the host bundle. Browser wiring
//! backs it with the wasm microtask spawner; native tests drive the same code
//! through [`futures::executor::LocalPool`].

use futures::future::LocalBoxFuture;
use futures::task::LocalSpawnExt;

/// Spawns futures onto the current single-threaded executor.
pub trait TaskSpawner {
    /// Schedules `future` to run to completion without awaiting it.
    fn spawn_local(&self, future: LocalBoxFuture<'static, ()>);
}

impl TaskSpawner for futures::executor::LocalSpawner {
    fn spawn_local(&self, future: LocalBoxFuture<'static, ()>) {
        // A shut-down pool has nothing left to run the task against.
        let _ = LocalSpawnExt::spawn_local(self, future);
    }
}
