//! Error types for the qdispatch work-dispatch runtime

use core::fmt;

/// Result type for Queue construction
pub type QueueResult<T> = Result<T, QueueError>;

/// Errors that can occur while bringing a `Queue`'s worker pool up
#[derive(Debug)]
pub enum QueueError {
    /// The OS refused to spawn a worker thread
    SpawnFailed {
        index: usize,
        source: std::io::Error,
    },

    /// A worker thread was spawned but never observed `is_running = true`
    /// within the startup cap
    WorkerStartupFailed { index: usize },
}

impl fmt::Display for QueueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueueError::SpawnFailed { index, source } => {
                write!(f, "failed to spawn worker {}: {}", index, source)
            }
            QueueError::WorkerStartupFailed { index } => {
                write!(f, "worker {} did not start within the startup cap", index)
            }
        }
    }
}

impl std::error::Error for QueueError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            QueueError::SpawnFailed { source, .. } => Some(source),
            QueueError::WorkerStartupFailed { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_spawn_failed() {
        let e = QueueError::SpawnFailed {
            index: 2,
            source: std::io::Error::other("out of threads"),
        };
        assert_eq!(format!("{}", e), "failed to spawn worker 2: out of threads");
    }

    #[test]
    fn display_startup_failed() {
        let e = QueueError::WorkerStartupFailed { index: 0 };
        assert_eq!(
            format!("{}", e),
            "worker 0 did not start within the startup cap"
        );
    }
}
