use std::error::Error;

use localforge_core::{EmbeddingError, StoreError};

#[test]
fn embedding_error_display_messages() {
    assert_eq!(
        EmbeddingError::Unavailable("no model".to_string()).to_string(),
        "No embedding backend available: no model"
    );
    assert_eq!(
        EmbeddingError::Provider("boom".to_string()).to_string(),
        "Embedding provider error: boom"
    );
}

#[test]
fn embedding_error_other_exposes_source() {
    let err = EmbeddingError::Other(Box::new(std::io::Error::new(
        std::io::ErrorKind::NotFound,
        "weights",
    )));
    assert_eq!(err.to_string(), "Embedding error: weights");
    assert!(err.source().is_some());
}

#[test]
fn store_error_messages_are_lowercase() {
    let io = || Box::new(std::io::Error::new(std::io::ErrorKind::Other, "disk"));
    assert_eq!(
        StoreError::Internal(io()).to_string(),
        "internal store error: disk"
    );
    assert_eq!(
        StoreError::Persistence(io()).to_string(),
        "persistence error: disk"
    );
    assert_eq!(
        StoreError::invalid_document(2, "document id is empty").to_string(),
        "invalid document at index 2: document id is empty"
    );
}
