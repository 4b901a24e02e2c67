//! Account and transaction stores
//!
//! The report core reads the full chart of accounts and the full posting
//! list through the traits defined here. Two implementations ship with the
//! crate: a JSON file store and an in-memory store.

use async_trait::async_trait;
use ledgerview_utils::compare_codes;
use std::sync::Arc;

pub mod error;
pub mod json_file;
pub mod memory;
pub mod types;

pub use error::StoreError;
pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use types::{Account, AccountGroup, AccountStatus, AccountType, Transaction};

// ==================== Store Traits ====================

/// Shared account store reference
pub type AccountStoreRef = Arc<dyn AccountStore>;

/// Shared transaction store reference
pub type TransactionStoreRef = Arc<dyn TransactionStore>;

/// Source of the chart of accounts
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Return every account, in no particular order
    async fn list_accounts(&self) -> Result<Vec<Account>, StoreError>;
}

/// Source of ledger postings
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Return every posting, in no particular order
    async fn list_all_transactions(&self) -> Result<Vec<Transaction>, StoreError>;

    /// Persist new postings. Either all entries are stored or none are.
    async fn append_transactions(&self, entries: Vec<Transaction>) -> Result<(), StoreError>;
}

/// Active accounts carrying a classification tag, ordered by code
///
/// Disbursement workflows use this to offer cash and bank accounts.
pub fn accounts_with_classification(accounts: &[Account], tag: &str) -> Vec<Account> {
    let mut matched: Vec<Account> = accounts
        .iter()
        .filter(|a| a.is_active() && a.has_classification(tag))
        .cloned()
        .collect();
    matched.sort_by(|a, b| compare_codes(&a.code, &b.code).then_with(|| a.id.cmp(&b.id)));
    matched
}
