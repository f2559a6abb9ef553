//! Error types for the launcher stub.
//!
//! Every variant here is fatal: the stub reports it on stderr and exits
//! non-zero, with no retry. Malformed launch data records are deliberately
//! not part of this taxonomy; the decoder skips them with a warning.

use std::io;

use thiserror::Error;

/// Result type alias for stub operations.
pub type Result<T> = std::result::Result<T, LaunchError>;

/// Fatal launcher errors.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// The stub's own binary image cannot be opened or read.
    #[error("cannot read stub binary: {0}")]
    Io(#[from] io::Error),

    /// The pairs region has zero length; the stub wraps nothing.
    #[error("stub binary carries no launch data")]
    EmptyLaunchData,

    /// The trailing length field does not describe the file it sits in.
    #[error("corrupt launch data: {0}")]
    CorruptLaunchData(String),

    /// A key the active launch strategy requires is absent.
    #[error("cannot find key \"{0}\" from launch data")]
    MissingLaunchInfoKey(String),

    /// The serialized command line reached the platform maximum. The line
    /// is discarded, never truncated.
    #[error("command line too long: {length} bytes (limit {limit})")]
    CommandLineTooLong { length: usize, limit: usize },

    /// The OS refused to create the child process.
    #[error("cannot launch {executable}: {source}")]
    SpawnFailure {
        executable: String,
        source: io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_names_the_key() {
        let err = LaunchError::MissingLaunchInfoKey("PYTHON_BIN".to_string());
        assert_eq!(
            err.to_string(),
            "cannot find key \"PYTHON_BIN\" from launch data"
        );
    }

    #[test]
    fn command_line_too_long_reports_both_lengths() {
        let err = LaunchError::CommandLineTooLong {
            length: 40_000,
            limit: 32_768,
        };
        let msg = err.to_string();
        assert!(msg.contains("40000"));
        assert!(msg.contains("32768"));
    }

    #[test]
    fn spawn_failure_names_the_executable() {
        let err = LaunchError::SpawnFailure {
            executable: "C:\\Py\\python.exe".to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        };
        assert!(err.to_string().contains("C:\\Py\\python.exe"));
    }
}
