//! Task spawner adapters for the detached reconciler sweep

use std::sync::Mutex;
use tracing::warn;

use domain_ledger::{DetachedTask, ReconcileSpawner};

/// Fire-and-forget spawner backed by the Tokio runtime
///
/// The sweep runs concurrently with subsequent requests and is never
/// awaited by the caller; failures stay inside the task.
#[derive(Debug, Default)]
pub struct TokioSpawner;

impl TokioSpawner {
    /// Creates a spawner for the current Tokio runtime
    pub fn new() -> Self {
        Self
    }
}

impl ReconcileSpawner for TokioSpawner {
    fn spawn_detached(&self, task: DetachedTask) {
        tokio::spawn(task);
    }
}

/// Queueing spawner for embedders that own their scheduling
///
/// Tasks are held until [`QueuedSpawner::drain`] runs them to completion,
/// giving at-least-once execution at a point the embedder chooses. The
/// integration tests use this to run the sweep deterministically.
#[derive(Default)]
pub struct QueuedSpawner {
    tasks: Mutex<Vec<DetachedTask>>,
}

impl QueuedSpawner {
    /// Creates an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tasks waiting to run
    pub fn pending(&self) -> usize {
        self.tasks.lock().map(|tasks| tasks.len()).unwrap_or(0)
    }

    /// Runs every queued task to completion, in submission order
    ///
    /// Tasks queued while draining (e.g. a sweep scheduling another sweep)
    /// are picked up by the same call.
    pub async fn drain(&self) {
        loop {
            let batch = match self.tasks.lock() {
                Ok(mut tasks) => std::mem::take(&mut *tasks),
                Err(_) => {
                    warn!("task queue lock poisoned, dropping queued sweeps");
                    return;
                }
            };
            if batch.is_empty() {
                return;
            }
            for task in batch {
                task.await;
            }
        }
    }
}

impl ReconcileSpawner for QueuedSpawner {
    fn spawn_detached(&self, task: DetachedTask) {
        match self.tasks.lock() {
            Ok(mut tasks) => tasks.push(task),
            Err(_) => warn!("task queue lock poisoned, dropping sweep"),
        }
    }
}
