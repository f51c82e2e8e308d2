//! # qdispatch-core
//!
//! The dispatch runtime: `Queue`, `Worker`, and `QueueFunction`.
//!
//! A `Queue<R, A>` owns a fixed-size pool of worker threads, a shared FIFO
//! deque of pending closures, and the mutex/condition-variable pair that
//! guard it. Callers build a `QueueFunction<R, A>` describing a pre/main/post
//! pipeline, hand it to `Queue::new`, then `dispatch` argument tuples for the
//! pool to execute. `Queue::has_work_left(true)` drains: it blocks until the
//! deque is empty and every worker has gone idle.
//!
//! ## Modules
//!
//! - `queue_function` - the pre/main/post/init/close pipeline
//! - `worker` - a single long-lived OS thread plus its lifecycle flags
//! - `queue` - the pool owner, deque, and drain primitive
//! - `error` - construction failure types
//! - `logging` - kernel-style leveled debug printing macros
//! - `env` - environment variable parsing helpers

pub mod env;
pub mod error;
pub mod logging;
pub mod queue;
pub mod queue_function;
mod worker;

pub use env::env_get_bool;
pub use error::{QueueError, QueueResult};
pub use logging::LogLevel;
pub use queue::Queue;
pub use queue_function::QueueFunction;
