//! Error types for cairn operations.
//!
//! This module defines [`CairnError`], the primary error type used throughout
//! the library, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - `Config` errors are programmer errors: misuse of the library caught at
//!   the point of misuse (empty scope input, removal of a protected argument,
//!   registration-name collisions).  They are never silently downgraded.
//! - `Execution` errors are operational: a directory that does not exist, a
//!   chdir that fails, an executable missing from `PATH`.  Build-script entry
//!   points typically convert these into a fatal [`fail`](crate::exec::fail).

use thiserror::Error;

/// Core error type for cairn operations.
#[derive(Debug, Error)]
pub enum CairnError {
    /// Library misuse caught at configuration time.
    #[error("Invalid configuration: {message}")]
    Config { message: String },

    /// An operational failure (filesystem, environment, process control).
    #[error("{message}")]
    Execution { message: String },

    /// A program could not be located on `PATH`.
    #[error("Could not find '{name}' on PATH")]
    ExecutableNotFound { name: String },

    /// A spawned command exited unsuccessfully.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// Malformed command-line input rejected by the argument parser.
    #[error("{0}")]
    Cli(#[from] clap::Error),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CairnError {
    /// Construct a [`CairnError::Config`] from any message.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Construct a [`CairnError::Execution`] from any message.
    pub fn execution(message: impl Into<String>) -> Self {
        Self::Execution {
            message: message.into(),
        }
    }
}

/// Result type alias for cairn operations.
pub type Result<T> = std::result::Result<T, CairnError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_display_is_prefixed() {
        let err = CairnError::config("set_env: at least one pair required");
        assert_eq!(
            err.to_string(),
            "Invalid configuration: set_env: at least one pair required"
        );
    }

    #[test]
    fn execution_display_is_bare() {
        let err = CairnError::execution("cd: '/nope' is not a directory, but create=False.");
        assert_eq!(
            err.to_string(),
            "cd: '/nope' is not a directory, but create=False."
        );
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: CairnError = io.into();
        assert!(matches!(err, CairnError::Io(_)));
    }
}
