//! Report service
//!
//! Each request reads the complete chart of accounts and the complete
//! posting list from the stores, then derives the report synchronously.
//! Nothing is cached between requests, so concurrent requests never share
//! state. Store reads are bounded by a timeout; failures are logged and
//! returned unmodified, never replaced by partial data.

use chrono::NaiveDate;
use ledgerview_config::Config;
use ledgerview_store::{
    Account, AccountStoreRef, StoreError, Transaction, TransactionStoreRef,
};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::deriver::{ReportDeriver, ReportOptions};
use crate::error::{
    CoreError, CoreResult, DefaultErrorLogger, ErrorContext, ErrorLogger, IntegrityWarning,
};
use crate::journal::{check_journals, JournalEntry};
use crate::period::ReportPeriod;
use crate::reports::{BalanceSheet, IncomeStatement, TrialBalance};
use crate::tree::AccountTree;

/// Fetches ledger data and derives reports from it
pub struct ReportService {
    accounts: AccountStoreRef,
    transactions: TransactionStoreRef,
    deriver: ReportDeriver,
    fetch_timeout: Duration,
    logger: Arc<dyn ErrorLogger>,
}

impl ReportService {
    pub fn new(
        accounts: AccountStoreRef,
        transactions: TransactionStoreRef,
        options: ReportOptions,
        fetch_timeout: Duration,
    ) -> Self {
        Self {
            accounts,
            transactions,
            deriver: ReportDeriver::new(options),
            fetch_timeout,
            logger: Arc::new(DefaultErrorLogger),
        }
    }

    /// Build a service with report options and timeout taken from `config`
    pub fn from_config(
        config: &Config,
        accounts: AccountStoreRef,
        transactions: TransactionStoreRef,
    ) -> CoreResult<Self> {
        config.validate().map_err(|e| CoreError::ConfigError {
            message: e.to_string(),
        })?;

        Ok(Self::new(
            accounts,
            transactions,
            ReportOptions::from(&config.reports),
            Duration::from_millis(config.store.fetch_timeout_ms),
        ))
    }

    /// Replace the logger used for failures and integrity warnings
    pub fn with_logger(mut self, logger: Arc<dyn ErrorLogger>) -> Self {
        self.logger = logger;
        self
    }

    async fn timed<T, F>(&self, operation: &'static str, store: &'static str, read: F) -> CoreResult<T>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        match tokio::time::timeout(self.fetch_timeout, read).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(source)) => Err(CoreError::FetchFailed { store, source }),
            Err(_) => Err(CoreError::Timeout {
                operation,
                millis: self.fetch_timeout.as_millis() as u64,
            }),
        }
    }

    fn fail<T>(&self, error: CoreError, operation: &str) -> CoreResult<T> {
        self.logger.log_error(&error, &ErrorContext::new(operation));
        Err(error)
    }

    fn report_warnings(&self, warnings: &[IntegrityWarning], operation: &str, period: &ReportPeriod) {
        if warnings.is_empty() {
            return;
        }
        let context = ErrorContext::new(operation)
            .with_data("period", serde_json::json!(period.description()));
        for warning in warnings {
            self.logger.log_warning(warning, &context);
        }
    }

    /// Read both stores concurrently
    pub async fn fetch(&self) -> CoreResult<(Vec<Account>, Vec<Transaction>)> {
        let (accounts, transactions) = tokio::join!(
            self.timed("list_accounts", "account", self.accounts.list_accounts()),
            self.timed(
                "list_all_transactions",
                "transaction",
                self.transactions.list_all_transactions()
            ),
        );

        let accounts = match accounts {
            Ok(accounts) => accounts,
            Err(e) => return self.fail(e, "fetch"),
        };
        let transactions = match transactions {
            Ok(transactions) => transactions,
            Err(e) => return self.fail(e, "fetch"),
        };

        log::debug!(
            "Fetched {} accounts and {} postings",
            accounts.len(),
            transactions.len()
        );
        Ok((accounts, transactions))
    }

    async fn fetch_tree(&self, period: &ReportPeriod) -> CoreResult<(AccountTree, Vec<Transaction>)> {
        let (accounts, transactions) = self.fetch().await?;
        let tree = match AccountTree::build(accounts) {
            Ok(tree) => tree,
            Err(e) => return self.fail(e, "build_tree"),
        };
        Ok((tree, period.filter(transactions)))
    }

    pub async fn trial_balance(&self, period: ReportPeriod) -> CoreResult<TrialBalance> {
        let (tree, transactions) = self.fetch_tree(&period).await?;
        let report = self.deriver.trial_balance_for(&tree, &transactions);
        self.report_warnings(&report.warnings, "trial_balance", &period);
        Ok(report)
    }

    pub async fn income_statement(&self, period: ReportPeriod) -> CoreResult<IncomeStatement> {
        let (tree, transactions) = self.fetch_tree(&period).await?;
        let report = self.deriver.income_statement_for(&tree, &transactions);
        self.report_warnings(&report.warnings, "income_statement", &period);
        Ok(report)
    }

    /// Balance sheet as of `as_of`, or over every posting when `None`
    ///
    /// Always cumulative from the first posting, so opening positions are kept.
    pub async fn balance_sheet(&self, as_of: Option<NaiveDate>) -> CoreResult<BalanceSheet> {
        let period = ReportPeriod { start: None, end: as_of };
        let (tree, transactions) = self.fetch_tree(&period).await?;
        let report = match self.deriver.balance_sheet_for(&tree, &transactions) {
            Ok(report) => report,
            Err(e) => return self.fail(e, "balance_sheet"),
        };
        self.report_warnings(&report.warnings, "balance_sheet", &period);
        Ok(report)
    }

    /// Journals in the store whose postings do not sum to zero
    pub async fn journal_warnings(&self) -> CoreResult<Vec<IntegrityWarning>> {
        let transactions = match self
            .timed(
                "list_all_transactions",
                "transaction",
                self.transactions.list_all_transactions(),
            )
            .await
        {
            Ok(transactions) => transactions,
            Err(e) => return self.fail(e, "check_journals"),
        };

        let warnings = check_journals(&transactions);
        self.report_warnings(&warnings, "check_journals", &ReportPeriod::all());
        Ok(warnings)
    }

    /// Validate a journal entry against the chart and append its postings
    pub async fn post_journal(&self, entry: JournalEntry) -> CoreResult<Vec<Transaction>> {
        entry.validate()?;

        let accounts = match self
            .timed("list_accounts", "account", self.accounts.list_accounts())
            .await
        {
            Ok(accounts) => accounts,
            Err(e) => return self.fail(e, "post_journal"),
        };
        let tree = AccountTree::build(accounts)?;

        for line in &entry.lines {
            let node = tree.find(&line.account_id).ok_or_else(|| CoreError::ValidationError {
                message: format!("unknown account {} in journal {}", line.account_id, entry.journal_id),
            })?;
            let node = tree.node(node);
            if !node.is_leaf() {
                return Err(CoreError::ValidationError {
                    message: format!(
                        "account {} {} has child accounts and cannot take postings",
                        node.account.code, node.account.name
                    ),
                });
            }
            if !node.account.is_active() {
                log::warn!(
                    "Posting journal {} to inactive account {}",
                    entry.journal_id,
                    node.account.code
                );
            }
        }

        let journal_id = entry.journal_id.clone();
        let postings = entry.into_transactions()?;
        if let Err(source) = self.transactions.append_transactions(postings.clone()).await {
            return self.fail(
                CoreError::WriteFailed {
                    store: "transaction",
                    source,
                },
                "post_journal",
            );
        }

        log::info!("Posted journal {} with {} lines", journal_id, postings.len());
        Ok(postings)
    }
}
