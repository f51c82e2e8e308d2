//! A single long-lived OS thread that consumes work items from the shared
//! deque owned by a `Queue`.

use crate::error::{QueueError, QueueResult};
use crate::logging;
use crate::{kqdebug, kqtrace};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// A boxed, zero-argument closure capturing one dispatched argument tuple
/// and a reference to the owning `Queue`'s `QueueFunction`.
pub type WorkItem = Box<dyn FnOnce() + Send>;

/// Shared deque of pending work, guarded by the mutex workers wait on.
pub type WorkDeque = Mutex<VecDeque<WorkItem>>;

const STARTUP_POLL_STEP: Duration = Duration::from_micros(1);
const STARTUP_POLL_CAP: Duration = Duration::from_micros(500);
const SHUTDOWN_POLL_STEP: Duration = Duration::from_micros(1);
const SHUTDOWN_POLL_CAP: Duration = Duration::from_millis(5);

/// One worker thread plus its three observable lifecycle flags.
///
/// `keep_going`, `is_running`, and `is_idle` are written only by the worker
/// itself and read concurrently by the owning `Queue`; all three are
/// `AtomicBool` with acquire/release ordering.
pub(crate) struct Worker {
    index: usize,
    keep_going: Arc<AtomicBool>,
    is_running: Arc<AtomicBool>,
    is_idle: Arc<AtomicBool>,
    condvar: Arc<Condvar>,
    handle: Option<JoinHandle<()>>,
}

impl Worker {
    /// Spawn a worker thread and block until it reports `is_running = true`
    /// or the startup cap elapses.
    pub(crate) fn spawn(
        index: usize,
        deque: Arc<WorkDeque>,
        condvar: Arc<Condvar>,
        init_hook: Option<Arc<dyn Fn() + Send + Sync>>,
        close_hook: Option<Arc<dyn Fn() + Send + Sync>>,
    ) -> QueueResult<Worker> {
        let keep_going = Arc::new(AtomicBool::new(true));
        let is_running = Arc::new(AtomicBool::new(false));
        let is_idle = Arc::new(AtomicBool::new(false));

        let thread_keep_going = keep_going.clone();
        let thread_is_running = is_running.clone();
        let thread_is_idle = is_idle.clone();
        let thread_condvar = condvar.clone();

        let handle = thread::Builder::new()
            .name(format!("qdispatch-worker-{index}"))
            .spawn(move || {
                worker_loop(
                    index,
                    thread_keep_going,
                    thread_is_running,
                    thread_is_idle,
                    deque,
                    thread_condvar,
                    init_hook,
                    close_hook,
                )
            })
            .map_err(|source| QueueError::SpawnFailed { index, source })?;

        let mut worker = Worker {
            index,
            keep_going,
            is_running,
            is_idle,
            condvar,
            handle: Some(handle),
        };

        let mut waited = Duration::ZERO;
        while !worker.is_running.load(Ordering::Acquire) {
            thread::sleep(STARTUP_POLL_STEP);
            waited += STARTUP_POLL_STEP;
            if waited > STARTUP_POLL_CAP {
                worker.shutdown();
                return Err(QueueError::WorkerStartupFailed { index });
            }
        }

        Ok(worker)
    }

    #[inline]
    pub(crate) fn is_idle(&self) -> bool {
        self.is_idle.load(Ordering::Acquire)
    }

    #[inline]
    pub(crate) fn index(&self) -> usize {
        self.index
    }

    /// Tell the worker to stop, wake it, and join its thread.
    ///
    /// The double sleep-broadcast-repoll sequence covers the race where the
    /// worker was between setting `is_idle = true` and calling `wait` when
    /// the first broadcast went out.
    pub(crate) fn shutdown(&mut self) {
        self.keep_going.store(false, Ordering::Release);
        thread::sleep(SHUTDOWN_POLL_STEP);
        self.condvar.notify_all();
        thread::sleep(SHUTDOWN_POLL_STEP);

        let mut waited = Duration::ZERO;
        while self.is_running.load(Ordering::Acquire) && waited < SHUTDOWN_POLL_CAP {
            thread::sleep(SHUTDOWN_POLL_STEP);
            waited += SHUTDOWN_POLL_STEP;
            self.condvar.notify_all();
        }

        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        if self.handle.is_some() {
            self.shutdown();
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn worker_loop(
    index: usize,
    keep_going: Arc<AtomicBool>,
    is_running: Arc<AtomicBool>,
    is_idle: Arc<AtomicBool>,
    deque: Arc<WorkDeque>,
    condvar: Arc<Condvar>,
    init_hook: Option<Arc<dyn Fn() + Send + Sync>>,
    close_hook: Option<Arc<dyn Fn() + Send + Sync>>,
) {
    logging::set_worker_index(index);
    is_running.store(true, Ordering::Release);

    if let Some(hook) = &init_hook {
        hook();
    }
    kqdebug!("worker started");

    while keep_going.load(Ordering::Acquire) {
        is_idle.store(true, Ordering::Release);

        let guard = deque.lock().unwrap();
        let mut guard = condvar
            .wait_while(guard, |q| q.is_empty() && keep_going.load(Ordering::Acquire))
            .unwrap();

        is_idle.store(false, Ordering::Release);

        if !keep_going.load(Ordering::Acquire) {
            drop(guard);
            break;
        }

        let item = guard.pop_front();
        drop(guard);

        if let Some(item) = item {
            kqtrace!("dequeued work item");
            item();
        }

        is_idle.store(true, Ordering::Release);
    }

    if let Some(hook) = &close_hook {
        hook();
    }
    kqdebug!("worker stopped");

    is_running.store(false, Ordering::Release);
    is_idle.store(true, Ordering::Release);
    logging::clear_worker_index();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_deque() -> Arc<WorkDeque> {
        Arc::new(Mutex::new(VecDeque::new()))
    }

    #[test]
    fn starts_and_reports_idle() {
        let deque = new_deque();
        let condvar = Arc::new(Condvar::new());
        let mut worker = Worker::spawn(0, deque, condvar, None, None).unwrap();
        assert_eq!(worker.index(), 0);
        assert!(worker.is_idle());
        worker.shutdown();
        assert!(!worker.is_running.load(Ordering::Acquire));
    }

    #[test]
    fn executes_dispatched_item() {
        let deque = new_deque();
        let condvar = Arc::new(Condvar::new());
        let mut worker = Worker::spawn(0, deque.clone(), condvar.clone(), None, None).unwrap();

        let (tx, rx) = std::sync::mpsc::channel();
        let item: WorkItem = Box::new(move || {
            tx.send(()).unwrap();
        });
        deque.lock().unwrap().push_back(item);
        condvar.notify_all();

        rx.recv_timeout(Duration::from_secs(1)).unwrap();
        worker.shutdown();
    }

    #[test]
    fn shutdown_drops_unpopped_work_but_still_joins() {
        let deque = new_deque();
        let condvar = Arc::new(Condvar::new());
        let mut worker = Worker::spawn(0, deque, condvar, None, None).unwrap();
        worker.shutdown();
        assert!(!worker.is_running.load(Ordering::Acquire));
        assert!(worker.is_idle());
    }
}
