//! Error types used by the workvisor runtime and workers.
//!
//! This module defines three error enums:
//!
//! - [`WorkerError`] — failures raised by worker hooks (`before`, `body`, `work`).
//! - [`BusError`] — failures of the user-defined signal channel.
//! - [`StateError`] — failures of the file-backed state register.
//!
//! None of these ever escapes a worker's public `run()`: the runtime logs them
//! and converts them into the cooperative stop cascade. They surface directly
//! only from side-channel APIs (sending a signal, reading a state file).

use thiserror::Error;

/// # Errors produced by worker hooks.
///
/// The position of the failing hook decides the policy, not the variant alone:
/// a [`WorkerError::Fail`] returned from a loop `work` pass is logged and the
/// loop continues, while the same variant from `before` or a one-shot `body`
/// terminates the worker.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum WorkerError {
    /// Recoverable failure; inside a loop pass the loop continues.
    #[error("execution failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// Non-recoverable failure; escapes per-pass isolation and terminates the worker.
    #[error("fatal error: {error}")]
    Fatal {
        /// The underlying error message.
        error: String,
    },

    /// The hook observed a stop request and exited early; treated as a graceful exit.
    #[error("interrupted by stop request")]
    Interrupted,
}

impl WorkerError {
    /// Creates a recoverable failure from any displayable error.
    pub fn fail(error: impl ToString) -> Self {
        WorkerError::Fail {
            error: error.to_string(),
        }
    }

    /// Creates a fatal failure from any displayable error.
    pub fn fatal(error: impl ToString) -> Self {
        WorkerError::Fatal {
            error: error.to_string(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            WorkerError::Fail { .. } => "worker_failed",
            WorkerError::Fatal { .. } => "worker_fatal",
            WorkerError::Interrupted => "worker_interrupted",
        }
    }

    /// Returns `true` when the error must escape per-pass isolation.
    pub fn is_fatal(&self) -> bool {
        matches!(self, WorkerError::Fatal { .. })
    }
}

/// # Errors produced by the user-defined signal channel.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum BusError {
    /// Reading or writing the shared context record failed.
    #[error("signal context i/o failed: {0}")]
    Io(#[from] std::io::Error),

    /// The shared context record could not be encoded or decoded.
    #[error("signal context malformed: {0}")]
    Codec(#[from] serde_json::Error),

    /// Raising the doorbell signal at the target pid failed.
    #[error("failed to raise doorbell signal: {error}")]
    Raise {
        /// OS-level error message.
        error: String,
    },

    /// The host platform offers no doorbell signal (non-unix).
    #[error("user-defined signals are not supported on this platform")]
    Unsupported,
}

impl BusError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            BusError::Io(_) => "bus_io",
            BusError::Codec(_) => "bus_codec",
            BusError::Raise { .. } => "bus_raise",
            BusError::Unsupported => "bus_unsupported",
        }
    }
}

/// # Errors produced by the file-backed state register.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum StateError {
    /// Reading or writing a state file failed.
    #[error("state file i/o failed: {0}")]
    Io(#[from] std::io::Error),

    /// A state record could not be encoded or decoded.
    #[error("state record malformed: {0}")]
    Codec(#[from] serde_json::Error),
}
