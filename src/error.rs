// SPDX-License-Identifier: MPL-2.0
//! Crate-wide error types.
//!
//! Every failure in the engine falls into one of four categories, and none of
//! them is fatal: after reporting an error the engine is always back in an
//! interactive idle state with its history intact.

use crate::application::port::remote_edit::RemoteEditError;
use std::fmt;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Malformed input (empty image bytes, mismatched pixel buffer, invalid
    /// crop rectangle, unusable session record). Rejected locally with no
    /// state mutation.
    InvalidInput(String),

    /// The remote edit collaborator failed. Non-retryable; the message is
    /// surfaced verbatim and the current history is unaffected.
    RemoteEdit(RemoteEditError),

    /// The adjustment worker failed. The in-flight preview keeps its last
    /// good state.
    Worker(WorkerError),

    /// The blob store failed. Persistence is best-effort, so callers
    /// typically log this and move on.
    Persistence(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidInput(msg) => write!(f, "Invalid input: {msg}"),
            Error::RemoteEdit(err) => write!(f, "Remote edit failed: {err}"),
            Error::Worker(err) => write!(f, "Adjustment worker failed: {err}"),
            Error::Persistence(msg) => write!(f, "Persistence failed: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<RemoteEditError> for Error {
    fn from(err: RemoteEditError) -> Self {
        Error::RemoteEdit(err)
    }
}

impl From<WorkerError> for Error {
    fn from(err: WorkerError) -> Self {
        Error::Worker(err)
    }
}

/// Specific failure modes of the background adjustment worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerError {
    /// The pixel buffer or parameters in the request were unusable.
    InvalidRequest(String),

    /// Processing panicked or otherwise aborted mid-computation.
    Processing(String),

    /// The worker task has shut down and can no longer accept requests.
    Disconnected,
}

impl fmt::Display for WorkerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerError::InvalidRequest(msg) => write!(f, "invalid request: {msg}"),
            WorkerError::Processing(msg) => write!(f, "processing failed: {msg}"),
            WorkerError::Disconnected => write!(f, "worker disconnected"),
        }
    }
}

impl std::error::Error for WorkerError {}
