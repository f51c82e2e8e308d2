//! # qdispatch
//!
//! A generic work-dispatch queue: typed pre/main/post pipelines run across
//! a fixed pool of worker threads.
//!
//! ## Quick Start
//!
//! ```
//! use qdispatch::{Queue, QueueFunction};
//!
//! let qf = QueueFunction::<i64, i64>::new(|x| x * x)
//!     .with_post(|squared| println!("got {squared}"));
//!
//! let queue = Queue::new(qf, 4).unwrap();
//! for i in 0..10 {
//!     queue.dispatch(i);
//! }
//! queue.has_work_left(true);
//! ```
//!
//! `dispatch` never blocks and never fails. `has_work_left(true)` drains:
//! it blocks until the deque is empty and every worker has gone idle.
//!
//! This crate also ships `args` (a small CLI argument parser) and `bench`
//! (sample workloads used by the `qdispatch-cli` binary and by this crate's
//! own integration tests).

pub use qdispatch_core::{
    env_get_bool, kqdebug, kqerror, kqinfo, kqtrace, kqwarn, LogLevel, Queue, QueueError,
    QueueFunction, QueueResult,
};

pub mod args;
pub mod bench;
