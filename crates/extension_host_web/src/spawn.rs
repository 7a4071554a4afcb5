//! Fire-and-forget task spawning on the browser microtask queue.

use extension_host::TaskSpawner;
use futures::future::LocalBoxFuture;

#[derive(Debug, Clone, Copy, Default)]
/// Spawner backed by `wasm_bindgen_futures::spawn_local`.
pub struct WebTaskSpawner;

impl TaskSpawner for WebTaskSpawner {
    fn spawn_local(&self, future: LocalBoxFuture<'static, ()>) {
        #[cfg(target_arch = "wasm32")]
        {
            wasm_bindgen_futures::spawn_local(future);
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = future;
        }
    }
}
