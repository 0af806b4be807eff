use std::{fmt, path::PathBuf, str::FromStr, sync::Arc};

use localforge_core::{Embedding, EmbeddingError};

use crate::{HashingEmbedder, DEFAULT_HASHING_DIMENSION};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EmbeddingBackend {
    /// Model-backed when it loads, hashing otherwise.
    #[default]
    Auto,
    Model,
    Hashing,
}

impl FromStr for EmbeddingBackend {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "model" => Ok(Self::Model),
            "hashing" | "hash" => Ok(Self::Hashing),
            other => Err(format!(
                "unknown embedding backend '{other}' (expected auto, model or hashing)"
            )),
        }
    }
}

impl fmt::Display for EmbeddingBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Auto => "auto",
            Self::Model => "model",
            Self::Hashing => "hashing",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Debug)]
pub struct EmbedderConfig {
    pub backend: EmbeddingBackend,
    pub model_path: Option<PathBuf>,
    pub hashing_dimension: usize,
}

impl Default for EmbedderConfig {
    fn default() -> Self {
        Self {
            backend: EmbeddingBackend::Auto,
            model_path: None,
            hashing_dimension: DEFAULT_HASHING_DIMENSION,
        }
    }
}

/// Picks the embedding backend once, at startup.
///
/// Returns [`EmbeddingError::Unavailable`] only when the configuration demands
/// a backend that cannot be constructed.
pub fn select_embedder(config: &EmbedderConfig) -> Result<Arc<dyn Embedding>, EmbeddingError> {
    match config.backend {
        EmbeddingBackend::Hashing => Ok(hashing(config)),
        EmbeddingBackend::Model => load_model(config),
        EmbeddingBackend::Auto => match load_model(config) {
            Ok(embedder) => Ok(embedder),
            Err(error) => {
                tracing::warn!(
                    error = %error,
                    dimension = config.hashing_dimension,
                    "model-backed embeddings unavailable; falling back to hashing embedder"
                );
                Ok(hashing(config))
            }
        },
    }
}

fn hashing(config: &EmbedderConfig) -> Arc<dyn Embedding> {
    tracing::info!(dimension = config.hashing_dimension, "using hashing embedder");
    Arc::new(HashingEmbedder::new(config.hashing_dimension))
}

#[cfg(feature = "candle")]
fn load_model(config: &EmbedderConfig) -> Result<Arc<dyn Embedding>, EmbeddingError> {
    let path = config.model_path.as_ref().ok_or_else(|| {
        EmbeddingError::Unavailable("no embedding model path configured".to_string())
    })?;
    let embedder = crate::CandleEmbedding::from_dir(path)?;
    Ok(Arc::new(embedder))
}

#[cfg(not(feature = "candle"))]
fn load_model(_config: &EmbedderConfig) -> Result<Arc<dyn Embedding>, EmbeddingError> {
    Err(EmbeddingError::Unavailable(
        "built without the `candle` feature".to_string(),
    ))
}
