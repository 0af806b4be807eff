//! Data model and capability traits shared by every LocalForge crate.

mod document;
mod embedding;
mod error;
mod similarity;
mod vector_store;

pub use document::{Document, Value};
pub use embedding::Embedding;
pub use error::{EmbeddingError, StoreError};
pub use similarity::{cosine_similarity, rank};
pub use vector_store::{SearchResult, VectorStore};
