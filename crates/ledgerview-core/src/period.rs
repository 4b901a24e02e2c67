//! Reporting period for filtering postings by date

use chrono::NaiveDate;
use ledgerview_store::Transaction;
use serde::{Deserialize, Serialize};

/// Inclusive date range a report covers. Open ends are unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReportPeriod {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl ReportPeriod {
    /// All postings ever made
    pub fn all() -> Self {
        Self::default()
    }

    /// Postings from `start` through `end`
    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// Postings on or before `end` (balance sheet "as of")
    pub fn up_to(end: NaiveDate) -> Self {
        Self {
            start: None,
            end: Some(end),
        }
    }

    pub fn is_all(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Check if a date is within the period
    pub fn contains(&self, date: &NaiveDate) -> bool {
        match (self.start, self.end) {
            (None, None) => true,
            (Some(s), None) => *date >= s,
            (None, Some(e)) => *date <= e,
            (Some(s), Some(e)) => *date >= s && *date <= e,
        }
    }

    /// Keep only the postings dated within the period
    pub fn filter(&self, transactions: Vec<Transaction>) -> Vec<Transaction> {
        if self.is_all() {
            return transactions;
        }
        transactions
            .into_iter()
            .filter(|t| self.contains(&t.date))
            .collect()
    }

    /// Get a human-readable description of the period
    pub fn description(&self) -> String {
        match (self.start, self.end) {
            (None, None) => "All Time".to_string(),
            (Some(s), None) => format!("From {}", s),
            (None, Some(e)) => format!("As of {}", e),
            (Some(s), Some(e)) => format!("{} to {}", s, e),
        }
    }
}
