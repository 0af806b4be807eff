use async_trait::async_trait;

use crate::EmbeddingError;

/// Maps text to fixed-width vectors.
///
/// `embed_batch` must return exactly one vector per input, in input order,
/// each of length [`Embedding::dimension`].
#[async_trait]
pub trait Embedding: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;

    fn dimension(&self) -> usize;

    /// Short backend label used in logs and health output.
    fn name(&self) -> &str {
        "embedding"
    }
}

#[async_trait]
impl<T> Embedding for std::sync::Arc<T>
where
    T: Embedding + ?Sized,
{
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        (**self).embed(text).await
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        (**self).embed_batch(texts).await
    }

    fn dimension(&self) -> usize {
        (**self).dimension()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
