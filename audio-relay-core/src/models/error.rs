use thiserror::Error;

/// Errors that can occur while orchestrating the relay.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RelayError {
    /// The configuration source is missing, malformed, or incomplete.
    /// Fatal to the operation that needed it; never retried.
    #[error("configuration error: {0}")]
    Config(String),

    /// The external audio pipeline failed to launch or exited abnormally.
    #[error("pipeline error: {0}")]
    Pipeline(String),

    /// A remote archive mirror pass failed.
    #[error("sync error: {0}")]
    Sync(String),

    /// A guarded operation used up its retry budget. Terminal for that
    /// invocation only; the owning worker continues to its next firing.
    #[error("{operation} failed after {attempts} attempts: {cause}")]
    Exhausted {
        operation: String,
        attempts: u32,
        cause: Box<RelayError>,
    },

    /// `start` was called for a worker name that is already live.
    #[error("worker {0} is already running")]
    WorkerConflict(String),

    /// `stop` or a query named a worker that is not registered.
    #[error("worker {0} not found")]
    WorkerNotFound(String),
}
