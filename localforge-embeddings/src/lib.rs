mod error;
mod hashing;
mod select;

#[cfg(feature = "candle")]
mod candle;

pub use error::EmbeddingProviderError;
pub use hashing::{HashingEmbedder, DEFAULT_HASHING_DIMENSION};
pub use select::{select_embedder, EmbedderConfig, EmbeddingBackend};

#[cfg(feature = "candle")]
pub use candle::{CandleEmbedding, DEFAULT_MODEL_NAME};
