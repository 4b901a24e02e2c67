//! Account and transaction records as the stores persist them

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Normal balance side of an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountType {
    Debit,
    Credit,
}

/// Report section an account contributes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountGroup {
    Assets,
    Liabilities,
    Equity,
    Revenues,
    Expenses,
}

/// Account status. Informational only; inactive accounts still aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AccountStatus {
    #[default]
    Active,
    Inactive,
}

/// Chart of accounts entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Opaque unique identifier
    pub id: String,
    /// Sortable account code (e.g., "1110")
    pub code: String,
    /// Display label
    pub name: String,
    /// Normal balance side
    #[serde(rename = "type")]
    pub account_type: AccountType,
    /// Report section
    pub group: AccountGroup,
    #[serde(default)]
    pub status: AccountStatus,
    /// Free-form tags such as "cash" or "bank"
    #[serde(default)]
    pub classifications: BTreeSet<String>,
    /// Parent account id; `None` for a root
    #[serde(default)]
    pub parent_id: Option<String>,
}

impl Account {
    /// Create an active, unclassified account
    pub fn new(
        id: impl Into<String>,
        code: impl Into<String>,
        name: impl Into<String>,
        account_type: AccountType,
        group: AccountGroup,
    ) -> Self {
        Self {
            id: id.into(),
            code: code.into(),
            name: name.into(),
            account_type,
            group,
            status: AccountStatus::Active,
            classifications: BTreeSet::new(),
            parent_id: None,
        }
    }

    /// Set the parent account id
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    /// Add a classification tag
    pub fn with_classification(mut self, tag: impl Into<String>) -> Self {
        self.classifications.insert(tag.into().to_lowercase());
        self
    }

    /// Check for a classification tag, ignoring case
    pub fn has_classification(&self, tag: &str) -> bool {
        self.classifications
            .iter()
            .any(|c| c.eq_ignore_ascii_case(tag))
    }

    pub fn is_active(&self) -> bool {
        self.status == AccountStatus::Active
    }
}

/// Ledger posting against a single account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Unique posting identifier
    pub id: String,
    /// Account the posting is made against
    pub account_id: String,
    /// Signed amount; positive increases the debit side
    pub amount: Decimal,
    /// Posting date (YYYY-MM-DD)
    pub date: NaiveDate,
    #[serde(default)]
    pub description: String,
    /// Journal entry the posting belongs to
    #[serde(default)]
    pub journal_id: Option<String>,
}

impl Transaction {
    /// Create a posting without a journal id
    pub fn new(
        id: impl Into<String>,
        account_id: impl Into<String>,
        amount: Decimal,
        date: NaiveDate,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            account_id: account_id.into(),
            amount,
            date,
            description: description.into(),
            journal_id: None,
        }
    }

    /// Attach the posting to a journal entry
    pub fn with_journal(mut self, journal_id: impl Into<String>) -> Self {
        self.journal_id = Some(journal_id.into());
        self
    }

    pub fn is_debit(&self) -> bool {
        self.amount.is_sign_positive() && !self.amount.is_zero()
    }

    pub fn is_credit(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_account_from_json() {
        let json = r#"{
            "id": "acc-cash",
            "code": "1110",
            "name": "Cash",
            "type": "Debit",
            "group": "Assets",
            "status": "Active",
            "classifications": ["cash"],
            "parentId": "acc-current"
        }"#;

        let account: Account = serde_json::from_str(json).unwrap();
        assert_eq!(account.account_type, AccountType::Debit);
        assert_eq!(account.group, AccountGroup::Assets);
        assert_eq!(account.parent_id.as_deref(), Some("acc-current"));
        assert!(account.has_classification("CASH"));
        assert!(!account.has_classification("bank"));
    }

    #[test]
    fn test_account_optional_fields_default() {
        let json = r#"{"id": "a", "code": "1000", "name": "Assets", "type": "Debit", "group": "Assets"}"#;
        let account: Account = serde_json::from_str(json).unwrap();
        assert!(account.is_active());
        assert!(account.parent_id.is_none());
        assert!(account.classifications.is_empty());
    }

    #[test]
    fn test_account_serializes_type_key() {
        let account = Account::new("a", "1000", "Assets", AccountType::Debit, AccountGroup::Assets);
        let value = serde_json::to_value(&account).unwrap();
        assert_eq!(value["type"], "Debit");
        assert!(value.get("parentId").is_some());
    }

    #[test]
    fn test_transaction_from_json() {
        let json = r#"{
            "id": "t1",
            "accountId": "acc-cash",
            "amount": "-250.50",
            "date": "2024-03-01",
            "description": "Office supplies",
            "journalId": "j1"
        }"#;

        let tx: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.amount, dec!(-250.50));
        assert_eq!(tx.journal_id.as_deref(), Some("j1"));
        assert!(tx.is_credit());
        assert!(!tx.is_debit());
    }

}
