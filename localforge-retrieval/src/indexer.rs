use localforge_core::{Document, Embedding, VectorStore};
use tracing::info;

use crate::error::RetrievalResult;
use crate::{DirectoryLoader, RetrievalError};

/// Encodes document contents in one batch and upserts the result.
pub struct Indexer<E, S> {
    embedder: E,
    store: S,
}

impl<E, S> Indexer<E, S>
where
    E: Embedding,
    S: VectorStore,
{
    pub fn new(embedder: E, store: S) -> Self {
        Self { embedder, store }
    }

    pub async fn index(&self, docs: Vec<Document>) -> RetrievalResult<usize> {
        if docs.is_empty() {
            return Ok(0);
        }
        for doc in &docs {
            if doc.id.trim().is_empty() {
                return Err(RetrievalError::InvalidId(doc.id.clone()));
            }
        }

        let texts: Vec<String> = docs.iter().map(|doc| doc.content.clone()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;
        if embeddings.len() != docs.len() {
            return Err(RetrievalError::BatchMismatch {
                docs: docs.len(),
                embeddings: embeddings.len(),
            });
        }

        let docs_with_embeddings = docs
            .into_iter()
            .zip(embeddings)
            .map(|(doc, embedding)| doc.with_embedding(embedding))
            .collect();

        Ok(self.store.upsert(docs_with_embeddings).await?)
    }

    /// Crawls `loader`'s root off the async runtime, then indexes every file found.
    pub async fn index_directory(&self, loader: &DirectoryLoader) -> RetrievalResult<usize> {
        let loader = loader.clone();
        let docs = tokio::task::spawn_blocking(move || loader.load())
            .await
            .map_err(|err| RetrievalError::Loader(err.to_string()))??;

        let count = self.index(docs).await?;
        info!(indexed = count, embedder = self.embedder.name(), "indexed directory");
        Ok(count)
    }
}
