use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{Document, StoreError};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    #[serde(flatten)]
    pub document: Document,
    pub score: f32,
}

/// Persistent document store with exact similarity search.
///
/// Upserts replace a row wholesale (last writer wins). Concurrent writers to
/// the same id race with no ordering guarantee beyond what the backing engine
/// serializes, and searches may observe a partially applied batch.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Inserts or replaces every document, returning the number of rows written.
    async fn upsert(&self, docs: Vec<Document>) -> Result<usize, StoreError>;

    async fn search(
        &self,
        query_embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchResult>, StoreError>;

    async fn get_all(&self) -> Result<Vec<Document>, StoreError>;

    /// Removes the given ids and returns how many rows existed.
    async fn delete(&self, ids: &[String]) -> Result<usize, StoreError>;

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.get_all().await?.len())
    }
}

#[async_trait]
impl<T> VectorStore for std::sync::Arc<T>
where
    T: VectorStore + ?Sized,
{
    async fn upsert(&self, docs: Vec<Document>) -> Result<usize, StoreError> {
        (**self).upsert(docs).await
    }

    async fn search(
        &self,
        query_embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchResult>, StoreError> {
        (**self).search(query_embedding, top_k).await
    }

    async fn get_all(&self) -> Result<Vec<Document>, StoreError> {
        (**self).get_all().await
    }

    async fn delete(&self, ids: &[String]) -> Result<usize, StoreError> {
        (**self).delete(ids).await
    }

    async fn count(&self) -> Result<usize, StoreError> {
        (**self).count().await
    }
}
