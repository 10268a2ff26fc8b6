//! Error types for moneyweb-core
//!
//! Validation failures carry the offending form field so the presentation
//! layer can point at it.

use thiserror::Error;

/// How loudly an error should be reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Expected outcome, e.g. an expired session
    Info,
    /// Rejected input the user can correct
    Warning,
    /// The operation failed
    Error,
    /// The backend broke its contract
    Critical,
}

impl ErrorSeverity {
    pub fn log_level(self) -> log::Level {
        match self {
            ErrorSeverity::Info => log::Level::Debug,
            ErrorSeverity::Warning => log::Level::Warn,
            ErrorSeverity::Error | ErrorSeverity::Critical => log::Level::Error,
        }
    }
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorSeverity::Info => "info",
            ErrorSeverity::Warning => "warning",
            ErrorSeverity::Error => "error",
            ErrorSeverity::Critical => "critical",
        };
        f.write_str(name)
    }
}

/// Main error type for moneyweb-core
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("{message}")]
    Validation { field: String, message: String },

    #[error("Invalid {what}: {value}")]
    InvalidFormat { what: &'static str, value: String },
}

impl CoreError {
    /// Shorthand for a field validation failure
    pub fn validation(field: &str, message: &str) -> Self {
        CoreError::Validation {
            field: field.to_string(),
            message: message.to_string(),
        }
    }

    pub fn invalid_format(what: &'static str, value: &str) -> Self {
        CoreError::InvalidFormat {
            what,
            value: value.to_string(),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            CoreError::Validation { .. } => "VALIDATION_ERROR",
            CoreError::InvalidFormat { .. } => "INVALID_FORMAT",
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Warning
    }

    /// The form field this error is attached to, if any
    pub fn field(&self) -> Option<&str> {
        match self {
            CoreError::Validation { field, .. } => Some(field),
            CoreError::InvalidFormat { .. } => None,
        }
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_carries_field() {
        let error = CoreError::validation("amount", "Amount must be greater than zero");
        assert_eq!(error.field(), Some("amount"));
        assert_eq!(error.code(), "VALIDATION_ERROR");
        assert_eq!(error.to_string(), "Amount must be greater than zero");
    }

    #[test]
    fn test_invalid_format_message() {
        let error = CoreError::invalid_format("transaction type", "TRANSFER");
        assert_eq!(error.to_string(), "Invalid transaction type: TRANSFER");
        assert!(error.field().is_none());
    }

    #[test]
    fn test_severity_ordering_and_levels() {
        assert!(ErrorSeverity::Critical > ErrorSeverity::Warning);
        assert_eq!(ErrorSeverity::Info.log_level(), log::Level::Debug);
        assert_eq!(ErrorSeverity::Critical.to_string(), "critical");
    }
}
