use std::path::PathBuf;

use localforge_core::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SqliteStoreError {
    #[error("failed to create store directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("sqlite connection failed: {0}")]
    Connection(#[source] sqlx::Error),
    #[error("schema migration failed: {0}")]
    Migration(#[source] sqlx::Error),
    #[error("sqlite query failed: {0}")]
    Query(#[from] sqlx::Error),
    #[error("failed to serialize metadata for '{doc_id}': {source}")]
    Metadata {
        doc_id: String,
        #[source]
        source: serde_json::Error,
    },
}

impl From<SqliteStoreError> for StoreError {
    fn from(value: SqliteStoreError) -> Self {
        match value {
            SqliteStoreError::Metadata { .. } => StoreError::Internal(Box::new(value)),
            other => StoreError::Persistence(Box::new(other)),
        }
    }
}
