//! Configuration management for ledgerview
//!
//! This module handles loading, validation, and management of
//! ledgerview configuration from YAML files.

pub mod error;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use error::ConfigError;

// ==================== Configuration Types ====================

/// Data directory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Directory holding the store files
    #[serde(default = "default_data_path")]
    pub path: PathBuf,
    /// Chart of accounts file (JSON array)
    #[serde(default = "default_accounts_file")]
    pub accounts_file: String,
    /// Ledger postings file (JSON array)
    #[serde(default = "default_transactions_file")]
    pub transactions_file: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
            accounts_file: default_accounts_file(),
            transactions_file: default_transactions_file(),
        }
    }
}

fn default_data_path() -> PathBuf {
    PathBuf::from("./data")
}

fn default_accounts_file() -> String {
    "accounts.json".to_string()
}

fn default_transactions_file() -> String {
    "transactions.json".to_string()
}

/// Store access settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Upper bound for a single store read, in milliseconds
    #[serde(default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_ms: default_fetch_timeout_ms(),
        }
    }
}

fn default_fetch_timeout_ms() -> u64 {
    10_000
}

/// Report derivation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportsConfig {
    /// Expense codes starting with this prefix are cost of sales
    #[serde(default = "default_cost_of_sales_prefix")]
    pub cost_of_sales_prefix: String,
    /// Reserved code for the synthetic current-period earnings row
    #[serde(default = "default_current_earnings_code")]
    pub current_earnings_code: String,
    /// Display name for the synthetic current-period earnings row
    #[serde(default = "default_current_earnings_name")]
    pub current_earnings_name: String,
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            cost_of_sales_prefix: default_cost_of_sales_prefix(),
            current_earnings_code: default_current_earnings_code(),
            current_earnings_name: default_current_earnings_name(),
        }
    }
}

fn default_cost_of_sales_prefix() -> String {
    "51".to_string()
}

fn default_current_earnings_code() -> String {
    "3999".to_string()
}

fn default_current_earnings_name() -> String {
    "Current Period Earnings".to_string()
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

/// Currency and number formatting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyConfig {
    /// Reporting currency code
    #[serde(default = "default_currency")]
    pub code: String,
    /// Number of decimal places
    #[serde(default = "default_decimal_places")]
    pub decimal_places: u32,
    /// Thousands separator
    #[serde(default = "default_thousands_sep")]
    pub thousands_separator: String,
    /// Decimal separator
    #[serde(default = "default_decimal_sep")]
    pub decimal_separator: String,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            code: default_currency(),
            decimal_places: default_decimal_places(),
            thousands_separator: default_thousands_sep(),
            decimal_separator: default_decimal_sep(),
        }
    }
}

fn default_currency() -> String {
    "IDR".to_string()
}

fn default_decimal_places() -> u32 {
    2
}

fn default_thousands_sep() -> String {
    ",".to_string()
}

fn default_decimal_sep() -> String {
    ".".to_string()
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Data directory settings
    #[serde(default)]
    pub data: DataConfig,
    /// Store access settings
    #[serde(default)]
    pub store: StoreConfig,
    /// Report derivation settings
    #[serde(default)]
    pub reports: ReportsConfig,
    /// Currency settings
    #[serde(default)]
    pub currency: CurrencyConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store.fetch_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "store.fetch_timeout_ms".to_string(),
                reason: "Timeout must be greater than 0".to_string(),
            });
        }

        if self.reports.cost_of_sales_prefix.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "reports.cost_of_sales_prefix".to_string(),
                reason: "Prefix must not be empty".to_string(),
            });
        }

        if self.reports.current_earnings_code.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "reports.current_earnings_code".to_string(),
                reason: "Reserved code must not be empty".to_string(),
            });
        }

        if self.currency.decimal_places > 10 {
            return Err(ConfigError::InvalidValue {
                field: "currency.decimal_places".to_string(),
                reason: "Decimal places must be between 0 and 10".to_string(),
            });
        }

        if !LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "logging.level".to_string(),
                reason: format!("Log level must be one of {}", LOG_LEVELS.join(", ")),
            });
        }

        Ok(())
    }

    /// Generate a default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }

    /// Get the full path to the accounts file
    pub fn accounts_path(&self) -> PathBuf {
        self.data.path.join(&self.data.accounts_file)
    }

    /// Get the full path to the transactions file
    pub fn transactions_path(&self) -> PathBuf {
        self.data.path.join(&self.data.transactions_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.reports.cost_of_sales_prefix, "51");
        assert_eq!(config.reports.current_earnings_code, "3999");
        assert_eq!(config.store.fetch_timeout_ms, 10_000);
        assert_eq!(config.accounts_path(), PathBuf::from("./data/accounts.json"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config = Config::from_yaml("reports:\n  current_earnings_code: \"3900\"\n").unwrap();
        assert_eq!(config.reports.current_earnings_code, "3900");
        assert_eq!(config.reports.cost_of_sales_prefix, "51");
        assert_eq!(config.data.transactions_file, "transactions.json");
    }

    #[test]
    fn test_generated_default_parses() {
        let config = Config::from_yaml(Config::generate_default()).unwrap();
        assert_eq!(config.currency.decimal_places, 2);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let err = Config::from_yaml("store:\n  fetch_timeout_ms: 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "store.fetch_timeout_ms"));
    }

    #[test]
    fn test_validate_rejects_empty_reserved_code() {
        let mut config = Config::default();
        config.reports.current_earnings_code = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unknown_log_level() {
        let mut config = Config::default();
        config.logging.level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_yaml() {
        let err = Config::from_yaml("store: [unterminated").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidYaml(_)));
        assert!(err.to_details().location.is_some());
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load("/definitely/not/here/config.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "data:\n  path: /srv/books\ncurrency:\n  code: USD").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.currency.code, "USD");
        assert_eq!(config.transactions_path(), PathBuf::from("/srv/books/transactions.json"));
    }
}
