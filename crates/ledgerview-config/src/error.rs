//! Error types for ledgerview-config

use serde::Serialize;
use std::io;
use thiserror::Error;

/// Stable codes for configuration failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfigErrorCode {
    FileNotFound,
    ReadFailed,
    InvalidYaml,
    InvalidValue,
}

impl std::fmt::Display for ConfigErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigErrorCode::FileNotFound => write!(f, "FILE_NOT_FOUND"),
            ConfigErrorCode::ReadFailed => write!(f, "READ_FAILED"),
            ConfigErrorCode::InvalidYaml => write!(f, "INVALID_YAML"),
            ConfigErrorCode::InvalidValue => write!(f, "INVALID_VALUE"),
        }
    }
}

/// What went wrong in a config file, and where
#[derive(Debug, Clone, Serialize)]
pub struct ConfigErrorDetails {
    pub code: ConfigErrorCode,
    pub message: String,
    /// Dotted key of the offending setting, e.g. `store.fetch_timeout_ms`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// 1-based line and column inside the YAML text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<(usize, usize)>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl std::fmt::Display for ConfigErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(field) = &self.field {
            write!(f, "\nSetting: {}", field)?;
        }
        if let Some((line, column)) = self.location {
            write!(f, "\nAt line {}, column {}", line, column)?;
        }
        for suggestion in &self.suggestions {
            write!(f, "\n  - {}", suggestion)?;
        }
        Ok(())
    }
}

/// Configuration error type
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    FileNotFound { path: String },

    #[error("Cannot read config file {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Invalid YAML: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

impl ConfigError {
    pub fn code(&self) -> ConfigErrorCode {
        match self {
            ConfigError::FileNotFound { .. } => ConfigErrorCode::FileNotFound,
            ConfigError::ReadFailed { .. } => ConfigErrorCode::ReadFailed,
            ConfigError::InvalidYaml(_) => ConfigErrorCode::InvalidYaml,
            ConfigError::InvalidValue { .. } => ConfigErrorCode::InvalidValue,
        }
    }

    /// Error with the offending setting or YAML position and hints for fixing it
    pub fn to_details(&self) -> ConfigErrorDetails {
        let mut details = ConfigErrorDetails {
            code: self.code(),
            message: self.to_string(),
            field: None,
            location: None,
            suggestions: Vec::new(),
        };

        match self {
            ConfigError::FileNotFound { .. } => {
                details.suggestions.push("Pass the config file with --config.".to_string());
                details
                    .suggestions
                    .push("Run `ledgerview init-config > config.yaml` to create one.".to_string());
            }
            ConfigError::ReadFailed { .. } => {
                details.suggestions.push("Check the file permissions.".to_string());
            }
            ConfigError::InvalidYaml(source) => {
                details.location = source.location().map(|l| (l.line(), l.column()));
            }
            ConfigError::InvalidValue { field, .. } => {
                details.field = Some(field.clone());
                details.suggestions.push(
                    "See `ledgerview init-config` for the documented values.".to_string(),
                );
            }
        }

        details
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_yaml_keeps_position() {
        let source = serde_yaml::from_str::<serde_yaml::Value>("a: 1\nb: [2\n").unwrap_err();
        let error = ConfigError::from(source);
        assert_eq!(error.code().to_string(), "INVALID_YAML");

        let details = error.to_details();
        let (line, _) = details.location.unwrap();
        assert!(line >= 2);
        assert!(details.to_string().contains("At line"));
    }

    #[test]
    fn test_read_failure_keeps_io_source() {
        let error = ConfigError::ReadFailed {
            path: "config.yaml".to_string(),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(error.to_string().contains("denied"));
        assert!(std::error::Error::source(&error).is_some());
    }

    #[test]
    fn test_invalid_value_details() {
        let details = ConfigError::InvalidValue {
            field: "store.fetch_timeout_ms".to_string(),
            reason: "Timeout must be greater than 0".to_string(),
        }
        .to_details();

        assert_eq!(details.field.as_deref(), Some("store.fetch_timeout_ms"));
        assert!(details.to_string().starts_with("[INVALID_VALUE]"));
    }
}
