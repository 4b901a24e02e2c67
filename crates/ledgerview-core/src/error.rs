//! Error types for ledgerview-core
//!
//! This module provides error handling for report derivation: error codes,
//! detailed messages with suggestions, and the non-fatal integrity warnings
//! that travel alongside computed figures.

use ledgerview_store::StoreError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// A store read failed
    FetchFailed,
    /// A store write failed
    WriteFailed,
    /// A store read did not finish in time
    Timeout,
    /// Parent links form a cycle
    CycleDetected,
    /// Two accounts share an id
    DuplicateAccount,
    /// A real account uses a reserved code
    ReservedCode,
    /// Journal lines do not sum to zero
    UnbalancedJournal,
    /// Validation error
    ValidationError,
    /// Configuration error
    ConfigError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::FetchFailed => write!(f, "FETCH_FAILED"),
            ErrorCode::WriteFailed => write!(f, "WRITE_FAILED"),
            ErrorCode::Timeout => write!(f, "TIMEOUT"),
            ErrorCode::CycleDetected => write!(f, "CYCLE_DETECTED"),
            ErrorCode::DuplicateAccount => write!(f, "DUPLICATE_ACCOUNT"),
            ErrorCode::ReservedCode => write!(f, "RESERVED_CODE"),
            ErrorCode::UnbalancedJournal => write!(f, "UNBALANCED_JOURNAL"),
            ErrorCode::ValidationError => write!(f, "VALIDATION_ERROR"),
            ErrorCode::ConfigError => write!(f, "CONFIG_ERROR"),
        }
    }
}

/// Detailed error information for callers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Suggestions for resolution
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
    /// Whether repeating the request may succeed
    pub retryable: bool,
}

impl ErrorDetails {
    /// Create a new error detail
    pub fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            details: None,
            suggestions: vec![],
            retryable: false,
        }
    }

    /// Add detail information
    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.details = Some(detail);
        self
    }

    /// Add a suggestion
    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestions.push(suggestion);
        self
    }
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, "\nDetails: {}", details)?;
        }
        if !self.suggestions.is_empty() {
            write!(f, "\nSuggestions:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n  - {}", suggestion)?;
            }
        }
        Ok(())
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    /// Informational
    Info,
    /// Warning - operation may be affected
    Warning,
    /// Error - operation failed
    Error,
    /// Critical - data or configuration must be fixed before retrying
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "info"),
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
            ErrorSeverity::Critical => write!(f, "critical"),
        }
    }
}

/// Main error type for ledgerview-core
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Fetch from {store} store failed: {source}")]
    FetchFailed {
        store: &'static str,
        #[source]
        source: StoreError,
    },

    #[error("Write to {store} store failed: {source}")]
    WriteFailed {
        store: &'static str,
        #[source]
        source: StoreError,
    },

    #[error("{operation} timed out after {millis} ms")]
    Timeout { operation: &'static str, millis: u64 },

    #[error("Cycle detected in account hierarchy at account {account_id}")]
    CycleDetected { account_id: String },

    #[error("Duplicate account id: {id}")]
    DuplicateAccount { id: String },

    #[error("Account code {code} is reserved for current period earnings (account {account_id})")]
    ReservedCode { code: String, account_id: String },

    #[error("Journal {journal_id} does not balance: lines sum to {imbalance}")]
    UnbalancedJournal { journal_id: String, imbalance: Decimal },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },
}

impl CoreError {
    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::FetchFailed { .. } => ErrorCode::FetchFailed,
            CoreError::WriteFailed { .. } => ErrorCode::WriteFailed,
            CoreError::Timeout { .. } => ErrorCode::Timeout,
            CoreError::CycleDetected { .. } => ErrorCode::CycleDetected,
            CoreError::DuplicateAccount { .. } => ErrorCode::DuplicateAccount,
            CoreError::ReservedCode { .. } => ErrorCode::ReservedCode,
            CoreError::UnbalancedJournal { .. } => ErrorCode::UnbalancedJournal,
            CoreError::ValidationError { .. } => ErrorCode::ValidationError,
            CoreError::ConfigError { .. } => ErrorCode::ConfigError,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::FetchFailed { .. } => ErrorSeverity::Error,
            CoreError::WriteFailed { .. } => ErrorSeverity::Error,
            CoreError::Timeout { .. } => ErrorSeverity::Error,
            CoreError::CycleDetected { .. } => ErrorSeverity::Critical,
            CoreError::DuplicateAccount { .. } => ErrorSeverity::Critical,
            CoreError::ReservedCode { .. } => ErrorSeverity::Critical,
            CoreError::UnbalancedJournal { .. } => ErrorSeverity::Warning,
            CoreError::ValidationError { .. } => ErrorSeverity::Warning,
            CoreError::ConfigError { .. } => ErrorSeverity::Critical,
        }
    }

    /// Store failures and timeouts may succeed on a fresh request
    pub fn is_retryable(&self) -> bool {
        matches!(self, CoreError::FetchFailed { .. } | CoreError::Timeout { .. })
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        let mut details = ErrorDetails::new(self.code(), self.to_string());
        details.retryable = self.is_retryable();

        match self {
            CoreError::FetchFailed { store, source } => {
                if let Some(path) = source.path() {
                    details = details.with_detail(serde_json::json!({ "store": store, "path": path }));
                }
                details = details.with_suggestion(
                    "Check that the data files exist and are readable, then retry.".to_string()
                );
            }
            CoreError::WriteFailed { source: StoreError::Rejected { .. }, .. } => {
                details = details.with_suggestion(
                    "Use a journal id that has not been posted before.".to_string()
                );
            }
            CoreError::Timeout { .. } => {
                details = details.with_suggestion(
                    "Retry the report, or raise store.fetch_timeout_ms.".to_string()
                );
            }
            CoreError::CycleDetected { account_id } => {
                details = details.with_suggestion(format!(
                    "Follow the parentId chain starting at '{}' and break the loop.", account_id
                ));
            }
            CoreError::DuplicateAccount { id } => {
                details = details.with_suggestion(format!(
                    "Give each account with id '{}' a unique id.", id
                ));
            }
            CoreError::ReservedCode { code, .. } => {
                details = details.with_suggestion(format!(
                    "Renumber the account using code {}, or change reports.current_earnings_code.", code
                ));
            }
            CoreError::UnbalancedJournal { imbalance, .. } => {
                details = details.with_detail(serde_json::json!({ "imbalance": imbalance.to_string() }));
                details = details.with_suggestion(
                    "Debit and credit lines of a journal must sum to zero.".to_string()
                );
            }
            CoreError::ValidationError { message } => {
                details = details.with_detail(serde_json::json!({ "validation_message": message }));
            }
            _ => {}
        }

        details
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

// ==================== Integrity Warnings ====================

/// Kind of non-fatal data problem found while deriving reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntegrityWarningKind {
    /// Assets differ from liabilities plus equity
    UnbalancedBalanceSheet,
    /// A journal's postings do not sum to zero
    UnbalancedJournal,
    /// An account references a parent that does not exist
    DanglingParent,
    /// Postings were made directly against an account that has children
    PostingToParentAccount,
}

impl std::fmt::Display for IntegrityWarningKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IntegrityWarningKind::UnbalancedBalanceSheet => write!(f, "UNBALANCED_BALANCE_SHEET"),
            IntegrityWarningKind::UnbalancedJournal => write!(f, "UNBALANCED_JOURNAL"),
            IntegrityWarningKind::DanglingParent => write!(f, "DANGLING_PARENT"),
            IntegrityWarningKind::PostingToParentAccount => write!(f, "POSTING_TO_PARENT_ACCOUNT"),
        }
    }
}

/// Non-fatal discrepancy reported next to the computed figures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrityWarning {
    pub kind: IntegrityWarningKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<Decimal>,
}

impl IntegrityWarning {
    pub fn new(kind: IntegrityWarningKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            expected: None,
            actual: None,
        }
    }

    /// Add expected/actual values
    pub fn with_values(mut self, expected: Decimal, actual: Decimal) -> Self {
        self.expected = Some(expected);
        self.actual = Some(actual);
        self
    }
}

impl std::fmt::Display for IntegrityWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)?;
        if let (Some(expected), Some(actual)) = (self.expected, self.actual) {
            write!(f, " (expected {}, actual {})", expected, actual)?;
        }
        Ok(())
    }
}

// ==================== Error Logging ====================

/// Error context for reporting
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Request ID for tracing
    pub request_id: Option<String>,
    /// Operation being performed
    pub operation: String,
    /// Additional context data
    pub data: serde_json::Value,
}

impl ErrorContext {
    /// Create a new error context
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            request_id: None,
            operation: operation.into(),
            data: serde_json::json!({}),
        }
    }

    /// Add request ID
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Add context data
    pub fn with_data(mut self, key: &str, value: serde_json::Value) -> Self {
        self.data[key] = value;
        self
    }
}

/// Error logger trait
pub trait ErrorLogger: Send + Sync {
    /// Log an error
    fn log_error(&self, error: &CoreError, context: &ErrorContext);
    /// Log an integrity warning
    fn log_warning(&self, warning: &IntegrityWarning, context: &ErrorContext);
}

/// Default error logger using log crate
#[derive(Debug, Default)]
pub struct DefaultErrorLogger;

impl ErrorLogger for DefaultErrorLogger {
    fn log_error(&self, error: &CoreError, context: &ErrorContext) {
        log::error!(
            target: "ledgerview::error",
            "ERROR [{}] {} - Operation: {} - Request: {:?}",
            error.code(),
            error.to_details(),
            context.operation,
            context.request_id
        );
    }

    fn log_warning(&self, warning: &IntegrityWarning, context: &ErrorContext) {
        log::warn!(
            target: "ledgerview::integrity",
            "WARNING: {} - Operation: {} - Request: {:?}",
            warning,
            context.operation,
            context.request_id
        );
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::FetchFailed.to_string(), "FETCH_FAILED");
        assert_eq!(ErrorCode::CycleDetected.to_string(), "CYCLE_DETECTED");
        assert_eq!(ErrorCode::ReservedCode.to_string(), "RESERVED_CODE");
    }

    #[test]
    fn test_error_severity_display() {
        assert_eq!(ErrorSeverity::Warning.to_string(), "warning");
        assert_eq!(ErrorSeverity::Critical.to_string(), "critical");
    }

    #[test]
    fn test_retryable_errors() {
        let timeout = CoreError::Timeout { operation: "list_accounts", millis: 50 };
        assert!(timeout.is_retryable());
        assert!(timeout.to_details().retryable);

        let fetch = CoreError::FetchFailed {
            store: "transaction",
            source: StoreError::Unavailable { message: "offline".to_string() },
        };
        assert!(fetch.is_retryable());
        assert_eq!(fetch.code(), ErrorCode::FetchFailed);

        let cycle = CoreError::CycleDetected { account_id: "a".to_string() };
        assert!(!cycle.is_retryable());
        assert_eq!(cycle.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn test_error_details_unbalanced_journal() {
        let error = CoreError::UnbalancedJournal {
            journal_id: "j-7".to_string(),
            imbalance: dec!(12.50),
        };
        let details = error.to_details();

        assert_eq!(details.code, ErrorCode::UnbalancedJournal);
        assert!(details.message.contains("j-7"));
        assert_eq!(details.details.as_ref().unwrap()["imbalance"], "12.50");
        assert!(!details.suggestions.is_empty());
    }

    #[test]
    fn test_error_details_fetch_failed_path() {
        let error = CoreError::FetchFailed {
            store: "account",
            source: StoreError::Malformed {
                path: "data/accounts.json".to_string(),
                message: "expected value".to_string(),
            },
        };
        let details = error.to_details();
        assert_eq!(details.details.as_ref().unwrap()["path"], "data/accounts.json");
        assert!(details.to_string().starts_with("[FETCH_FAILED]"));
    }

    #[test]
    fn test_integrity_warning_display() {
        let warning = IntegrityWarning::new(
            IntegrityWarningKind::UnbalancedBalanceSheet,
            "Assets do not equal liabilities and equity",
        )
        .with_values(dec!(100), dec!(90));

        let text = warning.to_string();
        assert!(text.starts_with("[UNBALANCED_BALANCE_SHEET]"));
        assert!(text.contains("expected 100"));
    }

    #[test]
    fn test_error_context() {
        let context = ErrorContext::new("balance_sheet")
            .with_request_id("req-123")
            .with_data("period", serde_json::json!("all"));

        assert_eq!(context.operation, "balance_sheet");
        assert_eq!(context.request_id, Some("req-123".to_string()));
        assert_eq!(context.data["period"], "all");
    }
}
