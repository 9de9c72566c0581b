//! Error handling for the quint CLI.

use thiserror::Error;

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// The target path could not be read.
    #[error("Target is not a file or does not exist.")]
    TargetNotReadable,

    /// IO failure while writing output.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Strict-JSON serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias using CliError.
pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_not_readable_display() {
        assert_eq!(
            CliError::TargetNotReadable.to_string(),
            "Target is not a file or does not exist."
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: CliError = io_err.into();
        assert!(matches!(err, CliError::Io(_)));
    }
}
