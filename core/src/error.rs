//! Error types for the portmon-core library.

use thiserror::Error;

/// Result type alias for portmon operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during scanning and settings management.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to execute a system command.
    #[error("Command execution failed: {0}")]
    CommandFailed(String),

    /// Permission denied for an operation.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Settings error.
    #[error("Settings error: {0}")]
    Config(String),
}

/// Errors produced when terminating the process owning a connection.
///
/// Termination requests are never retried automatically: the target may
/// already be gone, so a blind retry is not safe.
#[derive(Error, Debug)]
pub enum TerminationError {
    /// The owner identifier is missing or not a positive integer.
    #[error("Invalid termination target: {0}")]
    InvalidTarget(String),

    /// The kill request was issued but failed.
    #[error("Failed to terminate process {pid}: {reason}")]
    Failed { pid: u32, reason: String },
}
