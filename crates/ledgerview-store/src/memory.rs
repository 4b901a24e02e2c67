//! In-memory store

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::types::{Account, Transaction};
use crate::{AccountStore, TransactionStore};

/// Store holding accounts and postings in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    accounts: RwLock<Vec<Account>>,
    transactions: RwLock<Vec<Transaction>>,
}

impl MemoryStore {
    pub fn new(accounts: Vec<Account>, transactions: Vec<Transaction>) -> Self {
        Self {
            accounts: RwLock::new(accounts),
            transactions: RwLock::new(transactions),
        }
    }

    /// Add or replace an account by id
    pub async fn upsert_account(&self, account: Account) {
        let mut accounts = self.accounts.write().await;
        match accounts.iter_mut().find(|a| a.id == account.id) {
            Some(existing) => *existing = account,
            None => accounts.push(account),
        }
    }

    pub async fn transaction_count(&self) -> usize {
        self.transactions.read().await.len()
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn list_accounts(&self) -> Result<Vec<Account>, StoreError> {
        Ok(self.accounts.read().await.clone())
    }
}

#[async_trait]
impl TransactionStore for MemoryStore {
    async fn list_all_transactions(&self) -> Result<Vec<Transaction>, StoreError> {
        Ok(self.transactions.read().await.clone())
    }

    async fn append_transactions(&self, entries: Vec<Transaction>) -> Result<(), StoreError> {
        let mut transactions = self.transactions.write().await;
        if let Some(dup) = entries
            .iter()
            .find(|e| transactions.iter().any(|t| t.id == e.id))
        {
            return Err(StoreError::Rejected {
                message: format!("transaction id '{}' already exists", dup.id),
            });
        }
        transactions.extend(entries);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AccountGroup, AccountType};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn posting(id: &str, amount: rust_decimal::Decimal) -> Transaction {
        Transaction::new(id, "cash", amount, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(), "")
    }

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemoryStore::new(
            vec![Account::new("cash", "1110", "Cash", AccountType::Debit, AccountGroup::Assets)],
            vec![posting("t1", dec!(100))],
        );

        store.append_transactions(vec![posting("t2", dec!(-40))]).await.unwrap();
        assert_eq!(store.list_all_transactions().await.unwrap().len(), 2);
        assert_eq!(store.list_accounts().await.unwrap()[0].code, "1110");
    }

    #[tokio::test]
    async fn test_memory_store_rejects_duplicate_ids() {
        let store = MemoryStore::new(vec![], vec![posting("t1", dec!(100))]);

        let result = store
            .append_transactions(vec![posting("t2", dec!(1)), posting("t1", dec!(-1))])
            .await;
        assert!(matches!(result, Err(StoreError::Rejected { .. })));
        assert_eq!(store.transaction_count().await, 1);
    }

    #[tokio::test]
    async fn test_upsert_account() {
        let store = MemoryStore::default();
        store
            .upsert_account(Account::new("a", "1000", "Assets", AccountType::Debit, AccountGroup::Assets))
            .await;
        store
            .upsert_account(Account::new("a", "1000", "All Assets", AccountType::Debit, AccountGroup::Assets))
            .await;

        let accounts = store.list_accounts().await.unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].name, "All Assets");
    }
}
