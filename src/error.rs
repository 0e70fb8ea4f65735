//! Error types for s3scout
//!
//! Design philosophy:
//! - Use thiserror for structured error types in library code
//! - Errors should be actionable - include context about what to do
//! - Per-candidate probe failures are classified, not propagated; only
//!   setup and shutdown failures surface through these types

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for the s3scout application
#[derive(Error, Debug)]
pub enum ScanError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Result sink errors
    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),

    /// I/O errors (wordlist reads, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Worker task panicked
    #[error("Worker {id} panicked")]
    WorkerPanicked { id: usize },

    /// Work queue closed while candidates were still being fed
    #[error("Work queue closed unexpectedly")]
    QueueClosed,
}

/// Configuration and CLI errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Invalid worker count
    #[error("Invalid worker count {count}: must be between 1 and {max}")]
    InvalidWorkerCount { count: usize, max: usize },

    /// Invalid queue capacity
    #[error("Invalid queue size {size}: must be at least {min}")]
    InvalidQueueSize { size: usize, min: usize },

    /// Output path error
    #[error("Invalid output path '{path}': {reason}")]
    InvalidOutputPath { path: PathBuf, reason: String },
}

/// Result sink errors
#[derive(Error, Debug)]
pub enum SinkError {
    /// Failed to open the output file
    #[error("Failed to open output file '{path}': {reason}")]
    OpenFailed { path: PathBuf, reason: String },

    /// Write to the output file failed
    #[error("Failed to write to output file: {0}")]
    WriteFailed(#[from] std::io::Error),

    /// Sink channel closed unexpectedly
    #[error("Result sink channel closed unexpectedly")]
    ChannelClosed,

    /// Sink writer task panicked
    #[error("Result sink task panicked")]
    TaskPanicked,
}

/// Result type alias for ScanError
pub type Result<T> = std::result::Result<T, ScanError>;

/// Result type alias for SinkError
pub type SinkResult<T> = std::result::Result<T, SinkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion() {
        let cfg_err = ConfigError::InvalidWorkerCount { count: 0, max: 512 };
        let scan_err: ScanError = cfg_err.into();
        assert!(matches!(scan_err, ScanError::Config(_)));
    }

    #[test]
    fn test_error_messages() {
        let err = ConfigError::InvalidWorkerCount { count: 0, max: 512 };
        assert_eq!(
            err.to_string(),
            "Invalid worker count 0: must be between 1 and 512"
        );
    }
}
