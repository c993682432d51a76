//! Error types for the inspection tool.

use std::path::PathBuf;

/// Errors that can occur while running a command.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// IO error on stdin or stdout.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to read a statement file.
    #[error("Failed to read statement file '{path}': {source}")]
    ReadFile {
        /// Path to the statement file.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Serialization error while rendering JSON.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Some statements could not be resolved.
    #[error("{0} statement(s) could not be resolved")]
    InvalidStatements(usize),

    /// The stdin reader thread panicked.
    #[error("Producer thread panicked")]
    ProducerPanicked,
}

/// Result type for CLI commands.
pub type Result<T> = std::result::Result<T, CliError>;
