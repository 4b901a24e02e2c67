//! Error types for ledgerview-store

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Malformed data in {path}: {message}")]
    Malformed { path: String, message: String },

    #[error("Write rejected: {message}")]
    Rejected { message: String },

    #[error("Store unavailable: {message}")]
    Unavailable { message: String },
}

impl StoreError {
    /// Location the error refers to, if any
    pub fn path(&self) -> Option<&str> {
        match self {
            StoreError::Io { path, .. } | StoreError::Malformed { path, .. } => Some(path),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        let error = StoreError::Io {
            path: "data/accounts.json".to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "missing"),
        };
        assert!(error.to_string().contains("data/accounts.json"));
        assert_eq!(error.path(), Some("data/accounts.json"));

        let error = StoreError::Rejected { message: "read only".to_string() };
        assert_eq!(error.path(), None);
    }
}
