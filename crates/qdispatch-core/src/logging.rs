//! Kernel-style print macros for qdispatch
//!
//! Provides thread-safe, context-aware debug output similar to Linux kernel's printk.
//! Automatically includes the current worker's index and an optional timestamp.
//!
//! # Environment Variables
//!
//! - `QDISPATCH_FLUSH_EPRINT=1` - Flush stderr after each print (useful for debugging crashes)
//! - `QDISPATCH_LOG_LEVEL=<level>` - Set log level: off, error, warn, info, debug, trace
//! - `QDISPATCH_LOG_TIME=1` - Include nanosecond timestamp in output
//!
//! # Output Format
//!
//! Without timestamp: `[LEVEL] [w<worker>] message`
//! With timestamp:    `[LEVEL] [<ns>] [w<worker>] message`
//!
//! Examples:
//! - `[DEBUG] [w0] dequeued work item`
//! - `[INFO]  [12345678] [w2] worker idle`
//! - `[WARN]  [w--] drain cap exceeded`
//!
//! # Usage
//!
//! ```ignore
//! use qdispatch_core::{kqdebug, kqinfo, kqwarn, kqerror};
//!
//! kqdebug!("dequeued work item {}", item_id);
//! kqinfo!("dispatch complete");
//! kqwarn!("drain cap exceeded after {} workers settled", settled);
//! kqerror!("worker {} failed to start", index);
//! ```

use crate::env::env_get_bool;
use std::io::Write;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::time::Instant;

/// Log levels (matches common conventions)
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Off = 0,
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
    Trace = 5,
}

impl LogLevel {
    pub fn from_u8(v: u8) -> Self {
        match v {
            0 => LogLevel::Off,
            1 => LogLevel::Error,
            2 => LogLevel::Warn,
            3 => LogLevel::Info,
            4 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }

    pub fn prefix(&self) -> &'static str {
        match self {
            LogLevel::Off => "",
            LogLevel::Error => "[ERROR]",
            LogLevel::Warn => "[WARN] ",
            LogLevel::Info => "[INFO] ",
            LogLevel::Debug => "[DEBUG]",
            LogLevel::Trace => "[TRACE]",
        }
    }
}

static FLUSH_ENABLED: AtomicBool = AtomicBool::new(false);
static TIME_ENABLED: AtomicBool = AtomicBool::new(false);
static LOG_LEVEL: AtomicU8 = AtomicU8::new(LogLevel::Info as u8);
static INITIALIZED: AtomicBool = AtomicBool::new(false);

static START_TIME: std::sync::OnceLock<Instant> = std::sync::OnceLock::new();

/// Initialize logging from environment variables.
///
/// Called automatically on first log, but can be called explicitly for
/// deterministic initialization.
pub fn init() {
    if INITIALIZED.swap(true, Ordering::SeqCst) {
        return;
    }

    START_TIME.get_or_init(Instant::now);

    FLUSH_ENABLED.store(env_get_bool("QDISPATCH_FLUSH_EPRINT", false), Ordering::Relaxed);
    TIME_ENABLED.store(env_get_bool("QDISPATCH_LOG_TIME", false), Ordering::Relaxed);

    if let Ok(val) = std::env::var("QDISPATCH_LOG_LEVEL") {
        let level = match val.to_lowercase().as_str() {
            "off" | "0" => LogLevel::Off,
            "error" | "1" => LogLevel::Error,
            "warn" | "2" => LogLevel::Warn,
            "info" | "3" => LogLevel::Info,
            "debug" | "4" => LogLevel::Debug,
            "trace" | "5" => LogLevel::Trace,
            _ => LogLevel::Info,
        };
        LOG_LEVEL.store(level as u8, Ordering::Relaxed);
    }
}

#[inline]
pub fn flush_enabled() -> bool {
    if !INITIALIZED.load(Ordering::Relaxed) {
        init();
    }
    FLUSH_ENABLED.load(Ordering::Relaxed)
}

#[inline]
pub fn time_enabled() -> bool {
    if !INITIALIZED.load(Ordering::Relaxed) {
        init();
    }
    TIME_ENABLED.load(Ordering::Relaxed)
}

#[inline]
pub fn log_level() -> LogLevel {
    if !INITIALIZED.load(Ordering::Relaxed) {
        init();
    }
    LogLevel::from_u8(LOG_LEVEL.load(Ordering::Relaxed))
}

/// Set log level programmatically, overriding `QDISPATCH_LOG_LEVEL`.
pub fn set_log_level(level: LogLevel) {
    LOG_LEVEL.store(level as u8, Ordering::Relaxed);
}

pub fn set_flush_enabled(enabled: bool) {
    FLUSH_ENABLED.store(enabled, Ordering::Relaxed);
}

pub fn set_time_enabled(enabled: bool) {
    TIME_ENABLED.store(enabled, Ordering::Relaxed);
}

#[inline]
pub fn level_enabled(level: LogLevel) -> bool {
    level as u8 <= log_level() as u8
}

#[inline]
pub fn elapsed_ns() -> u64 {
    let start = START_TIME.get_or_init(Instant::now);
    start.elapsed().as_nanos() as u64
}

thread_local! {
    static WORKER_INDEX: std::cell::Cell<Option<usize>> = const { std::cell::Cell::new(None) };
}

/// Record the index of the worker running on the calling thread.
///
/// Called by `Worker` at the top of its thread body.
pub fn set_worker_index(index: usize) {
    WORKER_INDEX.with(|w| w.set(Some(index)));
}

/// Clear the worker index for the calling thread.
pub fn clear_worker_index() {
    WORKER_INDEX.with(|w| w.set(None));
}

#[inline]
pub fn get_worker_index() -> Option<usize> {
    WORKER_INDEX.with(|w| w.get())
}

fn format_context() -> String {
    match get_worker_index() {
        Some(id) => format!("[w{}]", id),
        None => "[w--]".to_string(),
    }
}

#[doc(hidden)]
pub fn _klog_impl(level: LogLevel, args: std::fmt::Arguments<'_>) {
    if !level_enabled(level) {
        return;
    }

    let stderr = std::io::stderr();
    let mut handle = stderr.lock();

    let _ = write!(handle, "{} ", level.prefix());

    if time_enabled() {
        let _ = write!(handle, "[{}] ", elapsed_ns());
    }

    let _ = write!(handle, "{} ", format_context());

    let _ = handle.write_fmt(args);
    let _ = handle.write_all(b"\n");

    if flush_enabled() {
        let _ = handle.flush();
    }
}

/// Error level log with worker context
#[macro_export]
macro_rules! kqerror {
    ($($arg:tt)*) => {{
        $crate::logging::_klog_impl($crate::logging::LogLevel::Error, format_args!($($arg)*));
    }};
}

/// Warning level log with worker context
#[macro_export]
macro_rules! kqwarn {
    ($($arg:tt)*) => {{
        $crate::logging::_klog_impl($crate::logging::LogLevel::Warn, format_args!($($arg)*));
    }};
}

/// Info level log with worker context
#[macro_export]
macro_rules! kqinfo {
    ($($arg:tt)*) => {{
        $crate::logging::_klog_impl($crate::logging::LogLevel::Info, format_args!($($arg)*));
    }};
}

/// Debug level log with worker context
#[macro_export]
macro_rules! kqdebug {
    ($($arg:tt)*) => {{
        $crate::logging::_klog_impl($crate::logging::LogLevel::Debug, format_args!($($arg)*));
    }};
}

/// Trace level log with worker context
#[macro_export]
macro_rules! kqtrace {
    ($($arg:tt)*) => {{
        $crate::logging::_klog_impl($crate::logging::LogLevel::Trace, format_args!($($arg)*));
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_levels_order() {
        assert!(LogLevel::Error < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Debug);
        assert!(LogLevel::Debug < LogLevel::Trace);
    }

    #[test]
    fn level_from_u8() {
        assert_eq!(LogLevel::from_u8(0), LogLevel::Off);
        assert_eq!(LogLevel::from_u8(1), LogLevel::Error);
        assert_eq!(LogLevel::from_u8(4), LogLevel::Debug);
        assert_eq!(LogLevel::from_u8(99), LogLevel::Trace);
    }

    #[test]
    fn worker_index_context() {
        assert_eq!(get_worker_index(), None);
        set_worker_index(3);
        assert_eq!(get_worker_index(), Some(3));
        clear_worker_index();
        assert_eq!(get_worker_index(), None);
    }

    #[test]
    fn elapsed_ns_increases() {
        let t1 = elapsed_ns();
        std::thread::sleep(std::time::Duration::from_millis(1));
        let t2 = elapsed_ns();
        assert!(t2 > t1);
    }

    #[test]
    fn macros_compile_and_suppress() {
        set_log_level(LogLevel::Off);
        kqerror!("error {}", "msg");
        kqwarn!("warn");
        kqinfo!("info");
        kqdebug!("debug");
        kqtrace!("trace");
    }
}
