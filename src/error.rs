//! Error hierarchy for liftrs
//!
//! The calculators themselves never fail: missing data is reported through
//! defaults or `None`. These errors cover the edges around them: reading input
//! files, loading configuration and checking command-line arguments.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for liftrs operations
#[derive(Debug, Error)]
pub enum LiftRsError {
    /// Problems with caller-supplied input
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    /// Config file missing or unreadable
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors in caller-supplied input
#[derive(Debug, Error)]
pub enum InputError {
    /// Input file not found at specified path
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Input file could not be parsed
    #[error("Could not parse {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    /// Argument outside its accepted range
    #[error("Invalid value for {name}: {value} ({reason})")]
    InvalidArgument {
        name: String,
        value: String,
        reason: String,
    },
}

/// Result type alias for liftrs operations
pub type Result<T> = std::result::Result<T, LiftRsError>;

impl LiftRsError {
    /// Build an [`InputError::InvalidArgument`]
    pub fn invalid_argument(
        name: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        LiftRsError::Input(InputError::InvalidArgument {
            name: name.into(),
            value: value.to_string(),
            reason: reason.into(),
        })
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            LiftRsError::Input(InputError::FileNotFound { .. }) => ErrorSeverity::Warning,
            LiftRsError::Input(InputError::InvalidArgument { .. }) => ErrorSeverity::Warning,
            _ => ErrorSeverity::Error,
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            LiftRsError::Input(InputError::FileNotFound { path }) => {
                format!("Could not find training history file: {}", path.display())
            }
            LiftRsError::Input(InputError::Parse { path, .. }) => {
                format!(
                    "Training history in {} is not valid JSON for this command.",
                    path.display()
                )
            }
            LiftRsError::Input(InputError::InvalidArgument { name, reason, .. }) => {
                format!("Please check --{}: {}", name, reason)
            }
            LiftRsError::Configuration(reason) => {
                format!("Could not load config: {}", reason)
            }
            _ => self.to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Error that prevents operation
    Error,
    /// Caller mistake that a corrected invocation fixes
    Warning,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_severity() {
        let err = LiftRsError::Input(InputError::FileNotFound {
            path: PathBuf::from("history.json"),
        });
        assert_eq!(err.severity(), ErrorSeverity::Warning);

        let err = LiftRsError::Configuration("bad toml".to_string());
        assert_eq!(err.severity(), ErrorSeverity::Error);
    }

    #[test]
    fn test_invalid_argument() {
        let err = LiftRsError::invalid_argument("rpe", 11.0, "must be between 1 and 10");
        assert_eq!(
            err.to_string(),
            "Input error: Invalid value for rpe: 11 (must be between 1 and 10)"
        );
        assert_eq!(err.user_message(), "Please check --rpe: must be between 1 and 10");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: LiftRsError = io_err.into();
        assert!(matches!(err, LiftRsError::Io(_)));
        assert_eq!(err.severity(), ErrorSeverity::Error);
    }

    #[test]
    fn test_user_messages() {
        let err = LiftRsError::Input(InputError::FileNotFound {
            path: PathBuf::from("volume.json"),
        });
        assert!(err.user_message().contains("Could not find"));

        let err = LiftRsError::Configuration("missing field".to_string());
        assert_eq!(err.user_message(), "Could not load config: missing field");
    }
}
