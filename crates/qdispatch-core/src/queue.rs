//! Owner of the worker pool, the FIFO work deque, and the synchronization
//! that ties them together.

use crate::error::QueueResult;
use crate::kqwarn;
use crate::queue_function::QueueFunction;
use crate::worker::{WorkDeque, WorkItem, Worker};
use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex};
use std::thread;
use std::time::Duration;

/// Spin-poll interval used while draining, and the safety cap on phase 2
/// (waiting for workers to go idle after the deque empties).
const DRAIN_POLL_INTERVAL: Duration = Duration::from_micros(50);
const DRAIN_PHASE2_CAP: Duration = Duration::from_secs(5);

/// Owns one `QueueFunction`, a fixed-size pool of workers, and the FIFO
/// deque of pending work.
///
/// `dispatch` never blocks on queue depth and never fails: submission is
/// unconditionally accepted. `has_work_left(true)` is the only way to wait
/// for previously dispatched work to finish.
pub struct Queue<R, A> {
    function: Arc<QueueFunction<R, A>>,
    deque: Arc<WorkDeque>,
    condvar: Arc<Condvar>,
    workers: Vec<Worker>,
}

impl<R, A> Queue<R, A>
where
    R: Send + 'static,
    A: Clone + Send + 'static,
{
    /// Build a Queue around `function`, starting `num_workers` worker
    /// threads (a request of zero silently becomes one).
    ///
    /// If any worker fails to start, the workers already started are torn
    /// down before the error is returned.
    pub fn new(function: QueueFunction<R, A>, num_workers: usize) -> QueueResult<Self> {
        let num_workers = num_workers.max(1);
        let function = Arc::new(function);
        let deque: Arc<WorkDeque> = Arc::new(Mutex::new(VecDeque::new()));
        let condvar = Arc::new(Condvar::new());

        let init_hook: Option<Arc<dyn Fn() + Send + Sync>> = {
            let function = function.clone();
            Some(Arc::new(move || function.run_init()))
        };
        let close_hook: Option<Arc<dyn Fn() + Send + Sync>> = {
            let function = function.clone();
            Some(Arc::new(move || function.run_close()))
        };

        let mut workers = Vec::with_capacity(num_workers);
        for index in 0..num_workers {
            match Worker::spawn(
                index,
                deque.clone(),
                condvar.clone(),
                init_hook.clone(),
                close_hook.clone(),
            ) {
                Ok(worker) => workers.push(worker),
                Err(err) => {
                    for mut worker in workers {
                        worker.shutdown();
                    }
                    return Err(err);
                }
            }
        }

        Ok(Queue {
            function,
            deque,
            condvar,
            workers,
        })
    }

    /// Submit one argument tuple for execution, FIFO-ordered with every
    /// other dispatch issued from this thread.
    pub fn dispatch(&self, args: A) {
        let function = self.function.clone();
        let work: WorkItem = Box::new(move || function.run(args));

        self.deque.lock().unwrap().push_back(work);
        self.condvar.notify_all();
    }

    /// Report whether there is work pending or in flight.
    ///
    /// In non-blocking mode (`block = false`) this is a snapshot: it
    /// returns `true` if the deque is non-empty or any worker is not idle.
    ///
    /// In blocking mode (`block = true`) this drains in two phases: wait
    /// for the deque to empty, then wait for every worker to report idle
    /// (capped at roughly 5 seconds as a safety valve, not a guarantee).
    pub fn has_work_left(&self, block: bool) -> bool {
        if !block {
            if !self.deque.lock().unwrap().is_empty() {
                return true;
            }
            return self.workers.iter().any(|w| !w.is_idle());
        }

        loop {
            let pending = self.deque.lock().unwrap().len();
            if pending == 0 {
                break;
            }
            thread::sleep(DRAIN_POLL_INTERVAL);
        }

        let mut elapsed = Duration::ZERO;
        loop {
            if self.workers.iter().all(|w| w.is_idle()) {
                break;
            }
            if elapsed >= DRAIN_PHASE2_CAP {
                let busy: Vec<usize> = self
                    .workers
                    .iter()
                    .filter(|w| !w.is_idle())
                    .map(|w| w.index())
                    .collect();
                kqwarn!(
                    "drain cap of {:?} exceeded, still busy: {:?}",
                    DRAIN_PHASE2_CAP,
                    busy
                );
                break;
            }
            thread::sleep(DRAIN_POLL_INTERVAL);
            elapsed += DRAIN_POLL_INTERVAL;
        }

        true
    }

    /// Number of live workers (always `max(1, requested)` from construction).
    pub fn num_workers(&self) -> usize {
        self.workers.len()
    }
}

impl<R, A> Drop for Queue<R, A> {
    fn drop(&mut self) {
        self.deque.lock().unwrap().clear();
        for worker in &mut self.workers {
            worker.shutdown();
        }
    }
}
