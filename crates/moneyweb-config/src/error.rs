//! Error types for moneyweb-config

use std::fmt;

use thiserror::Error;

/// Configuration error type
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file {path} does not exist")]
    FileNotFound { path: String },

    #[error("Cannot read config file {path}: {reason}")]
    Unreadable { path: String, reason: String },

    #[error("Config is not valid YAML: {message}")]
    InvalidYaml { message: String },

    #[error("{field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

impl ConfigError {
    pub fn invalid(field: &str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::FileNotFound { .. } => "CONFIG_NOT_FOUND",
            ConfigError::Unreadable { .. } => "CONFIG_UNREADABLE",
            ConfigError::InvalidYaml { .. } => "CONFIG_INVALID_YAML",
            ConfigError::InvalidValue { .. } => "CONFIG_INVALID_VALUE",
        }
    }

    /// What to do about it, shown under the error on startup
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            ConfigError::FileNotFound { .. } => {
                Some("Pass --config <path>, or run with --print-config > config.yaml to start from the defaults.")
            }
            ConfigError::InvalidYaml { .. } => Some("Compare the file with the output of --print-config."),
            ConfigError::Unreadable { .. } | ConfigError::InvalidValue { .. } => None,
        }
    }

    /// Startup report: code, message and hint
    pub fn report(&self) -> ConfigReport<'_> {
        ConfigReport(self)
    }
}

pub struct ConfigReport<'a>(&'a ConfigError);

impl fmt::Display for ConfigReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.0.code(), self.0)?;
        if let Some(hint) = self.0.hint() {
            write!(f, "\n  hint: {}", hint)?;
        }
        Ok(())
    }
}

/// Result type with ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_value_names_field() {
        let error = ConfigError::invalid("pagination.page_size", "must be between 1 and 100");
        assert_eq!(error.code(), "CONFIG_INVALID_VALUE");
        assert_eq!(error.to_string(), "pagination.page_size: must be between 1 and 100");
        assert!(error.hint().is_none());
    }

    #[test]
    fn test_report_includes_hint() {
        let error = ConfigError::FileNotFound {
            path: "moneyweb.yaml".to_string(),
        };
        let report = error.report().to_string();
        assert!(report.starts_with("[CONFIG_NOT_FOUND] Config file moneyweb.yaml does not exist"));
        assert!(report.contains("--print-config"));
    }
}
