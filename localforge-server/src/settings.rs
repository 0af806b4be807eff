use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use localforge_embeddings::{EmbedderConfig, EmbeddingBackend, DEFAULT_HASHING_DIMENSION};
use localforge_llm::{DEFAULT_OLLAMA_MODEL, DEFAULT_OLLAMA_URL};

/// Process settings. Every flag can also be supplied through its environment
/// variable.
#[derive(Debug, Clone, Parser)]
#[command(name = "localforge-server", version, about = "Offline semantic search and RAG server")]
pub struct Settings {
    #[arg(long, env = "OLLAMA_URL", default_value = DEFAULT_OLLAMA_URL)]
    pub ollama_url: String,

    #[arg(long, env = "OLLAMA_MODEL", default_value = DEFAULT_OLLAMA_MODEL)]
    pub ollama_model: String,

    /// Directory with config.json, tokenizer.json and model.safetensors.
    #[arg(long, env = "EMBEDDING_MODEL_PATH")]
    pub embedding_model_path: Option<PathBuf>,

    /// auto, model or hashing.
    #[arg(long, env = "EMBEDDING_BACKEND", default_value = "auto")]
    pub embedding_backend: EmbeddingBackend,

    #[arg(long, env = "HASHING_DIMENSION", default_value_t = DEFAULT_HASHING_DIMENSION)]
    pub hashing_dimension: usize,

    #[arg(long, env = "VECTOR_DB_PATH", default_value = "./data/embeddings.db")]
    pub db_path: PathBuf,

    /// Indexed once before the server starts accepting requests.
    #[arg(long, env = "AUTO_INDEX_PATH")]
    pub auto_index_path: Option<PathBuf>,

    #[arg(long, env = "LOCALFORGE_BIND", default_value = "127.0.0.1:8000")]
    pub bind: SocketAddr,
}

impl Settings {
    pub fn embedder_config(&self) -> EmbedderConfig {
        EmbedderConfig {
            backend: self.embedding_backend,
            model_path: self.embedding_model_path.clone(),
            hashing_dimension: self.hashing_dimension,
        }
    }
}
