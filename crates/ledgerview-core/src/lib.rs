//! Core ledger processing and report derivation
//!
//! Accounts form a forest through their parent links. [`AccountTree`] arranges
//! them in code order, [`aggregate_balances`] nets postings per account, and
//! [`ReportDeriver`] rolls the balances up the tree into a trial balance, an
//! income statement and a balance sheet. [`ReportService`] ties this to the
//! stores.

pub mod balances;
pub mod deriver;
pub mod error;
pub mod journal;
pub mod period;
pub mod reports;
pub mod service;
pub mod tree;

pub use balances::{aggregate_balances, BalanceIndex, BalanceMap};
pub use deriver::{
    compute_balance_sheet, compute_income_statement, compute_trial_balance, derive_rows,
    Derivation, ReportDeriver, ReportOptions, CURRENT_EARNINGS_ID,
};
pub use error::{
    CoreError, CoreResult, DefaultErrorLogger, ErrorCode, ErrorContext, ErrorDetails,
    ErrorLogger, ErrorSeverity, IntegrityWarning, IntegrityWarningKind,
};
pub use journal::{check_journals, JournalEntry, JournalLine};
pub use period::ReportPeriod;
pub use reports::{
    BalanceSheet, DerivedRow, IncomeStatement, StatementLine, TrialBalance, TrialBalanceRow,
};
pub use service::ReportService;
pub use tree::{AccountNode, AccountTree, NodeId};
