//! JSON file store
//!
//! Accounts and transactions each live in one file holding a JSON array.
//! Reads never return partial data: a missing or malformed file is an error.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use crate::error::StoreError;
use crate::types::{Account, Transaction};
use crate::{AccountStore, TransactionStore};

/// Store backed by two JSON files on disk
#[derive(Debug)]
pub struct JsonFileStore {
    accounts_path: PathBuf,
    transactions_path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(accounts_path: impl Into<PathBuf>, transactions_path: impl Into<PathBuf>) -> Self {
        Self {
            accounts_path: accounts_path.into(),
            transactions_path: transactions_path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn accounts_path(&self) -> &Path {
        &self.accounts_path
    }

    pub fn transactions_path(&self) -> &Path {
        &self.transactions_path
    }
}

async fn read_json_array<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, StoreError> {
    let display = path.to_string_lossy().to_string();
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| StoreError::Io { path: display.clone(), source })?;

    let records: Vec<T> = serde_json::from_str(&content).map_err(|e| StoreError::Malformed {
        path: display.clone(),
        message: e.to_string(),
    })?;

    log::debug!("Read {} records from {}", records.len(), display);
    Ok(records)
}

async fn write_json_array<T: serde::Serialize>(path: &Path, records: &[T]) -> Result<(), StoreError> {
    let display = path.to_string_lossy().to_string();
    let content = serde_json::to_string_pretty(records).map_err(|e| StoreError::Malformed {
        path: display.clone(),
        message: e.to_string(),
    })?;

    // Stage next to the target, then rename over it
    let staging = path.with_extension("json.tmp");
    tokio::fs::write(&staging, content)
        .await
        .map_err(|source| StoreError::Io { path: staging.to_string_lossy().to_string(), source })?;
    tokio::fs::rename(&staging, path)
        .await
        .map_err(|source| StoreError::Io { path: display, source })
}

#[async_trait]
impl AccountStore for JsonFileStore {
    async fn list_accounts(&self) -> Result<Vec<Account>, StoreError> {
        read_json_array(&self.accounts_path).await
    }
}

#[async_trait]
impl TransactionStore for JsonFileStore {
    async fn list_all_transactions(&self) -> Result<Vec<Transaction>, StoreError> {
        read_json_array(&self.transactions_path).await
    }

    async fn append_transactions(&self, entries: Vec<Transaction>) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut existing: Vec<Transaction> = read_json_array(&self.transactions_path).await?;
        if let Some(dup) = entries
            .iter()
            .find(|e| existing.iter().any(|t| t.id == e.id))
        {
            return Err(StoreError::Rejected {
                message: format!("transaction id '{}' already exists", dup.id),
            });
        }

        let added = entries.len();
        existing.extend(entries);
        write_json_array(&self.transactions_path, &existing).await?;
        log::info!(
            "Appended {} postings to {}",
            added,
            self.transactions_path.display()
        );
        Ok(())
    }
}
