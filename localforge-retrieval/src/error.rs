use std::path::PathBuf;

use localforge_core::{EmbeddingError, StoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("invalid document id: {0:?}")]
    InvalidId(String),
    #[error("path not found: {}", .0.display())]
    PathNotFound(PathBuf),
    #[error("batch mismatch: docs={docs}, embeddings={embeddings}")]
    BatchMismatch { docs: usize, embeddings: usize },
    #[error("loader failed: {0}")]
    Loader(String),
    #[error("embedding error: {0}")]
    Embedding(#[from] EmbeddingError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

pub type RetrievalResult<T> = Result<T, RetrievalError>;
