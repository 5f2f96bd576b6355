use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use parking_lot::Mutex;
use uuid::Uuid;

use crate::models::error::RelayError;

/// Cooperative cancellation signal shared between a worker and its owner.
///
/// `cancel` marks intent only; a loop mid-sleep or blocked in an external
/// invocation observes it at its next iteration boundary.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// A named worker owned by the supervisor registry.
struct WorkerHandle {
    id: Uuid,
    cancel: CancelToken,
    thread: thread::JoinHandle<()>,
}

impl WorkerHandle {
    fn is_live(&self) -> bool {
        !self.thread.is_finished()
    }
}

/// Registry of named concurrent workers: idempotent start, best-effort
/// stop, liveness query.
///
/// All registry mutation is serialized by one mutex, so concurrent
/// `start` calls for the same name race only on the already-live check
/// and the loser observes the winner's registration.
#[derive(Default)]
pub struct WorkerSupervisor {
    registry: Mutex<HashMap<String, WorkerHandle>>,
}

impl WorkerSupervisor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Launch `body` on a named thread and register it under `name`.
    ///
    /// If `name` is already live this is a no-op that reports
    /// [`RelayError::WorkerConflict`]; a finished handle under the same
    /// name is replaced.
    pub fn start<F>(&self, name: &str, body: F) -> Result<Uuid, RelayError>
    where
        F: FnOnce(CancelToken) + Send + 'static,
    {
        let mut registry = self.registry.lock();
        if let Some(existing) = registry.get(name) {
            if existing.is_live() {
                log::warn!("worker {name} is already running ({})", existing.id);
                return Err(RelayError::WorkerConflict(name.to_string()));
            }
        }

        let cancel = CancelToken::new();
        let worker_cancel = cancel.clone();
        let thread = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || body(worker_cancel))
            .expect("failed to spawn worker thread");

        let id = Uuid::new_v4();
        log::info!("started worker {name} ({id})");
        registry.insert(name.to_string(), WorkerHandle { id, cancel, thread });
        Ok(id)
    }

    /// Signal cancellation and drop the handle. Best-effort: the thread is
    /// not joined and may keep running until it next checks its token.
    pub fn stop(&self, name: &str) -> Result<(), RelayError> {
        let mut registry = self.registry.lock();
        match registry.remove(name) {
            Some(handle) => {
                handle.cancel.cancel();
                log::info!("stop requested for worker {name} ({})", handle.id);
                Ok(())
            }
            None => {
                log::warn!("stop requested for unknown worker {name}");
                Err(RelayError::WorkerNotFound(name.to_string()))
            }
        }
    }

    /// Snapshot of the registry: name → whether the thread is still running.
    pub fn status(&self) -> BTreeMap<String, bool> {
        self.registry
            .lock()
            .iter()
            .map(|(name, handle)| (name.clone(), handle.is_live()))
            .collect()
    }

    pub fn is_live(&self, name: &str) -> bool {
        self.registry
            .lock()
            .get(name)
            .map(WorkerHandle::is_live)
            .unwrap_or(false)
    }

    /// Cancel every registered worker and clear the registry.
    pub fn stop_all(&self) {
        let mut registry = self.registry.lock();
        for (name, handle) in registry.drain() {
            handle.cancel.cancel();
            log::info!("stop requested for worker {name} ({})", handle.id);
        }
    }
}
