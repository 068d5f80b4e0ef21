//! Fixed-size worker pool with a FIFO job queue.
//!
//! Independent of the search: jobs are opaque `FnOnce()` closures. The queue
//! is guarded by one mutex with a wake condition; workers dequeue one job at
//! a time and execute it outside the lock. Idle-waiting is driven by an
//! outstanding-job counter (incremented on submit, decremented after the job
//! body returns), not by queue length — queue length alone would report idle
//! while a dequeued job is still running.
//!
//! Shutdown stops accepting submissions, wakes every idle worker, lets all
//! queued and in-flight jobs run to completion, then joins the threads.
//! Work is never dropped.

use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};

use crate::core::SearchError;

type Job = Box<dyn FnOnce() + Send + 'static>;

struct PoolState {
    queue: VecDeque<Job>,
    /// Jobs submitted but not yet finished executing.
    outstanding: usize,
    shutdown: bool,
}

struct Shared {
    state: Mutex<PoolState>,
    work_available: Condvar,
    all_idle: Condvar,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, PoolState> {
        // Jobs run outside this lock, so a job panic cannot poison it.
        // Poisoning would take a panic while a guard is held (an assertion
        // in test code, say); the state is still consistent then, so
        // recover the guard.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// A fixed pool of OS worker threads sharing one FIFO job queue.
pub struct WorkerPool {
    shared: Arc<Shared>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn a pool with the given number of worker threads.
    #[must_use]
    pub fn new(worker_count: usize) -> Self {
        let shared = Arc::new(Shared {
            state: Mutex::new(PoolState {
                queue: VecDeque::new(),
                outstanding: 0,
                shutdown: false,
            }),
            work_available: Condvar::new(),
            all_idle: Condvar::new(),
        });

        let workers = (0..worker_count.max(1))
            .map(|id| {
                let shared = Arc::clone(&shared);
                thread::Builder::new()
                    .name(format!("mcts-worker-{id}"))
                    .spawn(move || worker_loop(&shared))
                    .unwrap_or_else(|e| panic!("failed to spawn worker thread: {e}"))
            })
            .collect();

        Self { shared, workers }
    }

    /// Number of worker threads.
    #[must_use]
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Enqueue a job and wake one idle worker.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::PoolShutdown`] once shutdown has begun; the
    /// job is rejected, never silently queued.
    pub fn submit<F>(&self, job: F) -> Result<(), SearchError>
    where
        F: FnOnce() + Send + 'static,
    {
        {
            let mut state = self.shared.lock();
            if state.shutdown {
                return Err(SearchError::PoolShutdown);
            }
            state.outstanding += 1;
            state.queue.push_back(Box::new(job));
        }
        self.shared.work_available.notify_one();
        Ok(())
    }

    /// Block until the queue is empty and no job is executing.
    pub fn await_idle(&self) {
        let mut state = self.shared.lock();
        while state.outstanding > 0 {
            state = self
                .shared
                .all_idle
                .wait(state)
                .unwrap_or_else(|e| e.into_inner());
        }
    }

    /// Stop accepting jobs, drain queued and in-flight work, join workers.
    ///
    /// Idempotent: a second call returns immediately.
    pub fn shutdown(&mut self) {
        {
            let mut state = self.shared.lock();
            if state.shutdown {
                return;
            }
            state.shutdown = true;
        }
        self.shared.work_available.notify_all();

        log::trace!("worker pool shutting down, joining {} workers", self.workers.len());
        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker_loop(shared: &Shared) {
    loop {
        let job = {
            let mut state = shared.lock();
            loop {
                if let Some(job) = state.queue.pop_front() {
                    break job;
                }
                if state.shutdown {
                    return;
                }
                state = shared
                    .work_available
                    .wait(state)
                    .unwrap_or_else(|e| e.into_inner());
            }
        };

        // Run outside the lock. A panicking job must not unwind the worker
        // or leak the outstanding counter, or await_idle would block
        // forever and shutdown would drain with one thread fewer.
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(job));
        if outcome.is_err() {
            log::error!("worker job panicked; worker continues");
        }

        let idle = {
            let mut state = shared.lock();
            state.outstanding -= 1;
            state.outstanding == 0
        };
        if idle {
            shared.all_idle.notify_all();
        }
    }
}
