use async_trait::async_trait;
use localforge_core::{Document, Embedding, EmbeddingError, VectorStore};
use localforge_embeddings::HashingEmbedder;
use localforge_retrieval::{Indexer, RetrievalError, Retriever};
use localforge_store_sqlite::SqliteVectorStore;

async fn memory_store() -> SqliteVectorStore {
    SqliteVectorStore::builder("sqlite::memory:")
        .max_connections(1)
        .build()
        .await
        .expect("in-memory store should build")
}

#[tokio::test]
async fn indexer_rejects_empty_id() {
    let indexer = Indexer::new(HashingEmbedder::new(8), memory_store().await);

    let error = indexer
        .index(vec![Document::new("   ", "hello")])
        .await
        .unwrap_err();

    assert!(matches!(error, RetrievalError::InvalidId(id) if id.trim().is_empty()));
}

#[tokio::test]
async fn indexer_embeds_and_upserts_documents() {
    let embedder = HashingEmbedder::default();
    let store = memory_store().await;
    let indexer = Indexer::new(embedder.clone(), store.clone());

    let written = indexer
        .index(vec![
            Document::new("doc-1", "rust borrow checker lifetimes"),
            Document::new("doc-2", "python garbage collector"),
        ])
        .await
        .unwrap();
    assert_eq!(written, 2);

    let retriever = Retriever::new(embedder, store);
    let results = retriever.retrieve("rust lifetimes", 1).await.unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].document.id, "doc-1");
    assert_eq!(results[0].document.content, "rust borrow checker lifetimes");
}

#[tokio::test]
async fn indexer_with_no_documents_is_a_no_op() {
    let store = memory_store().await;
    let indexer = Indexer::new(HashingEmbedder::new(8), store.clone());
    assert_eq!(indexer.index(Vec::new()).await.unwrap(), 0);
    assert_eq!(store.count().await.unwrap(), 0);
}

struct ShortEmbedder;

#[async_trait]
impl Embedding for ShortEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Ok(vec![1.0])
    }

    async fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(vec![vec![1.0]])
    }

    fn dimension(&self) -> usize {
        1
    }
}

#[tokio::test]
async fn indexer_detects_embedder_returning_wrong_row_count() {
    let store = memory_store().await;
    let indexer = Indexer::new(ShortEmbedder, store.clone());

    let error = indexer
        .index(vec![Document::new("a", "a"), Document::new("b", "b")])
        .await
        .unwrap_err();

    assert!(matches!(
        error,
        RetrievalError::BatchMismatch {
            docs: 2,
            embeddings: 1
        }
    ));
    assert_eq!(store.count().await.unwrap(), 0);
}
