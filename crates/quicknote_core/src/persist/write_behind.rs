//! Write-behind key-value store.
//!
//! # Responsibility
//! - Make `set` fire-and-forget: callers never wait on storage I/O.
//! - Drain queued values into an inner store on a dedicated worker thread.
//!
//! # Invariants
//! - At most one pending value per key; a newer `set` replaces it (last write
//!   wins).
//! - `get` observes pending and in-flight values before the inner store.
//! - Inner write failures are logged and dropped; they never reach callers.
//! - Dropping the store drains everything already queued.
//! - A dead worker (e.g. inner store panicked) turns later `set` calls into
//!   `Unavailable` errors and never blocks `flush`.

use crate::repo::kv_repo::{KvStore, RepoError, RepoResult};
use log::{debug, error, warn};
use std::collections::BTreeMap;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;

const WORKER_THREAD_NAME: &str = "quicknote-write-behind";

struct QueueState {
    pending: BTreeMap<String, String>,
    in_flight: BTreeMap<String, String>,
    shutdown: bool,
    worker_alive: bool,
}

impl QueueState {
    fn is_idle(&self) -> bool {
        self.pending.is_empty() && self.in_flight.is_empty()
    }

    fn latest(&self, key: &str) -> Option<String> {
        self.pending
            .get(key)
            .or_else(|| self.in_flight.get(key))
            .cloned()
    }
}

struct Shared<S> {
    inner: Mutex<S>,
    queue: Mutex<QueueState>,
    changed: Condvar,
}

impl<S> Shared<S> {
    fn lock_queue(&self) -> MutexGuard<'_, QueueState> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// `KvStore` wrapper whose writes complete asynchronously.
pub struct WriteBehindStore<S: KvStore + Send + 'static> {
    shared: Arc<Shared<S>>,
    worker: Option<JoinHandle<()>>,
}

impl<S: KvStore + Send + 'static> WriteBehindStore<S> {
    /// Spawns the worker thread that owns writes into `inner`.
    ///
    /// # Errors
    /// - `RepoError::Unavailable` when the worker thread cannot be spawned.
    pub fn spawn(inner: S) -> RepoResult<Self> {
        let shared = Arc::new(Shared {
            inner: Mutex::new(inner),
            queue: Mutex::new(QueueState {
                pending: BTreeMap::new(),
                in_flight: BTreeMap::new(),
                shutdown: false,
                worker_alive: true,
            }),
            changed: Condvar::new(),
        });

        let worker_shared = Arc::clone(&shared);
        let worker = std::thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || run_worker(&worker_shared))
            .map_err(|err| {
                error!(
                    "event=write_behind_spawn module=persist status=error error={err}"
                );
                RepoError::Unavailable("write-behind worker could not be spawned")
            })?;

        Ok(Self {
            shared,
            worker: Some(worker),
        })
    }

    /// Blocks until every queued value has been handed to the inner store,
    /// or until the worker has exited.
    pub fn flush(&self) {
        let mut queue = self.shared.lock_queue();
        while !queue.is_idle() && queue.worker_alive {
            queue = self
                .shared
                .changed
                .wait(queue)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Returns the number of keys with a value not yet written.
    pub fn pending_len(&self) -> usize {
        let queue = self.shared.lock_queue();
        queue.pending.len() + queue.in_flight.len()
    }
}

impl<S: KvStore + Send + 'static> KvStore for WriteBehindStore<S> {
    fn get(&self, key: &str) -> RepoResult<Option<String>> {
        if let Some(value) = self.shared.lock_queue().latest(key) {
            return Ok(Some(value));
        }
        let inner = self
            .shared
            .inner
            .lock()
            .map_err(|_| RepoError::Unavailable("write-behind inner store poisoned"))?;
        inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> RepoResult<()> {
        let mut queue = self.shared.lock_queue();
        if queue.shutdown {
            return Err(RepoError::Unavailable("write-behind store is shutting down"));
        }
        if !queue.worker_alive {
            return Err(RepoError::Unavailable("write-behind worker has exited"));
        }
        if queue
            .pending
            .insert(key.to_string(), value.to_string())
            .is_some()
        {
            debug!("event=write_behind_coalesce module=persist status=ok key={key}");
        }
        self.shared.changed.notify_all();
        Ok(())
    }
}

impl<S: KvStore + Send + 'static> Drop for WriteBehindStore<S> {
    fn drop(&mut self) {
        self.shared.lock_queue().shutdown = true;
        self.shared.changed.notify_all();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("event=write_behind_join module=persist status=error error_code=worker_panicked");
            }
        }
    }
}

/// Marks the worker dead on any exit path, including unwinding.
struct WorkerExitGuard<'a, S> {
    shared: &'a Shared<S>,
}

impl<S> Drop for WorkerExitGuard<'_, S> {
    fn drop(&mut self) {
        let mut queue = self.shared.lock_queue();
        queue.worker_alive = false;
        if std::thread::panicking() {
            error!(
                "event=write_behind_worker module=persist status=error error_code=worker_panicked dropped_keys={}",
                queue.in_flight.len() + queue.pending.len()
            );
        }
        queue.in_flight.clear();
        self.shared.changed.notify_all();
    }
}

fn run_worker<S: KvStore>(shared: &Shared<S>) {
    let _exit_guard = WorkerExitGuard { shared };
    loop {
        let batch = {
            let mut queue = shared.lock_queue();
            while queue.pending.is_empty() && !queue.shutdown {
                queue = shared
                    .changed
                    .wait(queue)
                    .unwrap_or_else(PoisonError::into_inner);
            }
            if queue.pending.is_empty() {
                return;
            }
            let batch = std::mem::take(&mut queue.pending);
            queue.in_flight = batch.clone();
            batch
        };

        {
            let inner = shared.inner.lock().unwrap_or_else(PoisonError::into_inner);
            for (key, value) in &batch {
                match inner.set(key, value) {
                    Ok(()) => debug!(
                        "event=write_behind_write module=persist status=ok key={key} bytes={}",
                        value.len()
                    ),
                    Err(err) => error!(
                        "event=write_behind_write module=persist status=error key={key} error={err}"
                    ),
                }
            }
        }

        let mut queue = shared.lock_queue();
        queue.in_flight.clear();
        shared.changed.notify_all();
    }
}
