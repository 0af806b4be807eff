use std::{error::Error as StdError, fmt};

use thiserror::Error;

#[derive(Debug)]
pub enum EmbeddingError {
    InvalidResponse(String),
    Provider(String),
    /// No usable backend could be constructed. Fatal at startup.
    Unavailable(String),
    Other(Box<dyn StdError + Send + Sync>),
}

impl fmt::Display for EmbeddingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmbeddingError::InvalidResponse(message) => {
                write!(f, "Embedding invalid response: {message}")
            }
            EmbeddingError::Provider(message) => write!(f, "Embedding provider error: {message}"),
            EmbeddingError::Unavailable(message) => {
                write!(f, "No embedding backend available: {message}")
            }
            EmbeddingError::Other(error) => write!(f, "Embedding error: {error}"),
        }
    }
}

impl StdError for EmbeddingError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            EmbeddingError::Other(error) => Some(error.as_ref()),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid document at index {index}: {reason}")]
    InvalidDocument { index: usize, reason: String },
    #[error("corrupt row for document '{doc_id}': {reason}")]
    CorruptRow { doc_id: String, reason: String },
    #[error("persistence error: {0}")]
    Persistence(#[source] Box<dyn StdError + Send + Sync>),
    #[error("internal store error: {0}")]
    Internal(#[source] Box<dyn StdError + Send + Sync>),
}

impl StoreError {
    pub fn invalid_document(index: usize, reason: impl Into<String>) -> Self {
        StoreError::InvalidDocument {
            index,
            reason: reason.into(),
        }
    }

    /// True for caller-side mistakes, as opposed to storage failures.
    pub fn is_validation(&self) -> bool {
        matches!(self, StoreError::InvalidDocument { .. })
    }
}
