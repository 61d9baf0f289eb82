//! Tokio Runtime Bridge
//!
//! The console loop and the HTTP client both run on one process-wide tokio
//! runtime. `main` enters it through [`block_on`]; list requests issued from
//! the console are detached onto it with [`spawn_named_in_tokio`] so several
//! can be in flight at once.
//!
//! ```text
//! main ──block_on──▶ console loop
//!                        │ command
//!                        ▼
//!              spawn_named_in_tokio(controller.run_search())
//!                        │
//!                        ▼
//!              StocksEvent ──▶ event printer thread
//! ```

use std::future::Future;
use std::sync::OnceLock;

use tokio::runtime::{Builder, Runtime};

/// Global tokio runtime instance
static TOKIO_RUNTIME: OnceLock<Runtime> = OnceLock::new();

/// Get or initialize the global tokio runtime
fn get_runtime() -> &'static Runtime {
    TOKIO_RUNTIME.get_or_init(|| {
        Builder::new_multi_thread()
            .enable_all()
            .thread_name("stock-browser-io")
            .build()
            .expect("Failed to create tokio runtime")
    })
}

/// Spawn a detached task with a name (for debugging)
pub fn spawn_named_in_tokio<F>(name: &'static str, future: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    tracing::debug!("Spawning tokio task: {}", name);
    get_runtime().spawn(async move {
        future.await;
        tracing::debug!("Tokio task completed: {}", name);
    });
}

/// Block on a future synchronously. Only `main` should need this.
pub fn block_on<F, T>(future: F) -> T
where
    F: Future<Output = T>,
{
    get_runtime().block_on(future)
}
