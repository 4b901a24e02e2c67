//! Journal entries
//!
//! A journal entry is a set of postings recorded together whose signed
//! amounts sum to zero. Entries are validated before they become postings;
//! postings already in a store are checked after the fact and reported as
//! warnings.

use chrono::NaiveDate;
use ledgerview_store::Transaction;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{CoreError, CoreResult, IntegrityWarning, IntegrityWarningKind};

/// One side of a journal entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalLine {
    pub account_id: String,
    /// Positive for debit, negative for credit
    pub amount: Decimal,
}

impl JournalLine {
    pub fn debit(account_id: impl Into<String>, amount: Decimal) -> Self {
        Self {
            account_id: account_id.into(),
            amount: amount.abs(),
        }
    }

    pub fn credit(account_id: impl Into<String>, amount: Decimal) -> Self {
        Self {
            account_id: account_id.into(),
            amount: -amount.abs(),
        }
    }
}

/// Postings to be recorded together
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub journal_id: String,
    pub date: NaiveDate,
    pub description: String,
    pub lines: Vec<JournalLine>,
}

impl JournalEntry {
    pub fn new(journal_id: impl Into<String>, date: NaiveDate, description: impl Into<String>) -> Self {
        Self {
            journal_id: journal_id.into(),
            date,
            description: description.into(),
            lines: Vec::new(),
        }
    }

    pub fn line(mut self, line: JournalLine) -> Self {
        self.lines.push(line);
        self
    }

    /// Sum of all line amounts; zero for a balanced entry
    pub fn imbalance(&self) -> Decimal {
        self.lines.iter().map(|l| l.amount).sum()
    }

    pub fn validate(&self) -> CoreResult<()> {
        if self.journal_id.trim().is_empty() {
            return Err(CoreError::ValidationError {
                message: "journal id must not be empty".to_string(),
            });
        }
        if self.lines.len() < 2 {
            return Err(CoreError::ValidationError {
                message: format!("journal {} needs at least two lines", self.journal_id),
            });
        }
        if let Some(line) = self.lines.iter().find(|l| l.amount.is_zero()) {
            return Err(CoreError::ValidationError {
                message: format!(
                    "journal {} has a zero amount line for account {}",
                    self.journal_id, line.account_id
                ),
            });
        }

        let imbalance = self.imbalance();
        if !imbalance.is_zero() {
            return Err(CoreError::UnbalancedJournal {
                journal_id: self.journal_id.clone(),
                imbalance,
            });
        }
        Ok(())
    }

    /// Validate, then emit one posting per line sharing the journal id
    pub fn into_transactions(self) -> CoreResult<Vec<Transaction>> {
        self.validate()?;

        let JournalEntry {
            journal_id,
            date,
            description,
            lines,
        } = self;

        Ok(lines
            .into_iter()
            .enumerate()
            .map(|(n, line)| {
                Transaction::new(
                    format!("{}-{}", journal_id, n + 1),
                    line.account_id,
                    line.amount,
                    date,
                    description.clone(),
                )
                .with_journal(journal_id.clone())
            })
            .collect())
    }
}

/// Warn about every journal whose postings do not sum to zero
///
/// Postings without a journal id are not checked.
pub fn check_journals(transactions: &[Transaction]) -> Vec<IntegrityWarning> {
    let mut sums: BTreeMap<&str, (Decimal, usize)> = BTreeMap::new();
    for tx in transactions {
        if let Some(journal_id) = tx.journal_id.as_deref() {
            let entry = sums.entry(journal_id).or_insert((Decimal::ZERO, 0));
            entry.0 += tx.amount;
            entry.1 += 1;
        }
    }

    sums.into_iter()
        .filter(|(_, (sum, _))| !sum.is_zero())
        .map(|(journal_id, (sum, count))| {
            IntegrityWarning::new(
                IntegrityWarningKind::UnbalancedJournal,
                format!(
                    "Journal {} has {} postings summing to {}",
                    journal_id, count, sum
                ),
            )
            .with_values(Decimal::ZERO, sum)
        })
        .collect()
}
