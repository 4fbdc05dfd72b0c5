//! Error types and exit codes for panelvote
//!
//! Exit codes:
//! - 0: Success
//! - 1: Generic failure (backend, IO, serialization)
//! - 2: Usage error (bad flags/args)
//! - 3: Session/authorization error (not logged in, wrong role, login rejected)

mod macros;

use std::path::Path;
use thiserror::Error;

use crate::api::ApiError;

/// Exit codes for the panelvote CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success (0)
    Success = 0,
    /// Generic failure (1)
    Failure = 1,
    /// Usage error - bad flags/args (2)
    Usage = 2,
    /// Session error - missing session, wrong role, rejected login (3)
    Session = 3,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

/// Errors that can occur during panelvote operations
#[derive(Error, Debug)]
pub enum PanelError {
    // Usage errors (exit code 2)
    #[error("unknown format: {0} (expected: human or json)")]
    UnknownFormat(String),

    #[error("{0}")]
    UsageError(String),

    #[error("invalid {context}: {value}")]
    InvalidValue { context: String, value: String },

    #[error("unsupported {context}: {value} (supported: {supported})")]
    Unsupported {
        context: String,
        value: String,
        supported: String,
    },

    #[error("criterion {criterion} is not open for voting")]
    CriterionClosed { criterion: String },

    // Session errors (exit code 3)
    #[error("not logged in (run `panelvote login` first)")]
    NotLoggedIn,

    #[error("this command requires the {required} role (logged in as {actual})")]
    WrongRole { required: String, actual: String },

    #[error("login failed: {0}")]
    LoginRejected(String),

    #[error("results have not been published yet")]
    ResultsNotPublished,

    // Generic failures (exit code 1)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("backend error: {0}")]
    Api(#[from] ApiError),

    #[error("failed to {operation} {target}: {reason}")]
    FailedOperationWithTarget {
        operation: String,
        target: String,
        reason: String,
    },

    #[error("{0}")]
    Other(String),
}

impl PanelError {
    /// Create an error for a failed IO operation with context
    pub fn io_operation(
        operation: &str,
        path: &Path,
        error: impl std::fmt::Display,
    ) -> Self {
        PanelError::FailedOperationWithTarget {
            operation: operation.to_string(),
            target: path.display().to_string(),
            reason: error.to_string(),
        }
    }

    /// Create an error for an invalid value or configuration
    pub fn invalid_value(context: &str, value: impl std::fmt::Display) -> Self {
        PanelError::InvalidValue {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// Create an error for an unsupported value
    pub fn unsupported(
        context: &str,
        value: impl std::fmt::Display,
        supported: impl std::fmt::Display,
    ) -> Self {
        PanelError::Unsupported {
            context: context.to_string(),
            value: value.to_string(),
            supported: supported.to_string(),
        }
    }

    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            PanelError::UnknownFormat(_)
            | PanelError::UsageError(_)
            | PanelError::InvalidValue { .. }
            | PanelError::Unsupported { .. }
            | PanelError::CriterionClosed { .. } => ExitCode::Usage,

            PanelError::NotLoggedIn
            | PanelError::WrongRole { .. }
            | PanelError::LoginRejected(_)
            | PanelError::ResultsNotPublished => ExitCode::Session,

            PanelError::Io(_)
            | PanelError::Json(_)
            | PanelError::Toml(_)
            | PanelError::Api(_)
            | PanelError::FailedOperationWithTarget { .. }
            | PanelError::Other(_) => ExitCode::Failure,
        }
    }

    /// Get the error type identifier
    fn error_type(&self) -> &'static str {
        match self {
            PanelError::UnknownFormat(_) => "unknown_format",
            PanelError::UsageError(_) => "usage_error",
            PanelError::InvalidValue { .. } => "invalid_value",
            PanelError::Unsupported { .. } => "unsupported",
            PanelError::CriterionClosed { .. } => "criterion_closed",
            PanelError::NotLoggedIn => "not_logged_in",
            PanelError::WrongRole { .. } => "wrong_role",
            PanelError::LoginRejected(_) => "login_rejected",
            PanelError::ResultsNotPublished => "results_not_published",
            PanelError::Io(_) => "io_error",
            PanelError::Json(_) => "json_error",
            PanelError::Toml(_) => "toml_error",
            PanelError::Api(_) => "api_error",
            PanelError::FailedOperationWithTarget { .. } => "failed_operation_with_target",
            PanelError::Other(_) => "other",
        }
    }

    /// Convert error to JSON representation for structured error output.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.exit_code() as i32,
                "type": self.error_type(),
                "message": self.to_string(),
            }
        })
    }
}

/// Result type alias for panelvote operations
pub type Result<T> = std::result::Result<T, PanelError>;
