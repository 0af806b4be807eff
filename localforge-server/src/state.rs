use std::sync::Arc;

use anyhow::Context;
use localforge_core::{Embedding, VectorStore};
use localforge_embeddings::select_embedder;
use localforge_llm::OllamaClient;
use localforge_store_sqlite::SqliteVectorStore;

use crate::Settings;

/// Everything a request handler needs, built once at startup and shared.
#[derive(Clone)]
pub struct AppState {
    pub embedder: Arc<dyn Embedding>,
    pub store: Arc<dyn VectorStore>,
    pub llm: Option<OllamaClient>,
}

impl AppState {
    pub fn new(embedder: Arc<dyn Embedding>, store: Arc<dyn VectorStore>) -> Self {
        Self {
            embedder,
            store,
            llm: None,
        }
    }

    pub fn with_llm(mut self, llm: OllamaClient) -> Self {
        self.llm = Some(llm);
        self
    }
}

pub async fn build_state(settings: &Settings) -> anyhow::Result<AppState> {
    let embedder =
        select_embedder(&settings.embedder_config()).context("no usable embedding backend")?;

    let store = SqliteVectorStore::open(&settings.db_path)
        .await
        .with_context(|| format!("failed to open store at {}", settings.db_path.display()))?;

    let llm = OllamaClient::new(&settings.ollama_url, &settings.ollama_model)?;

    tracing::info!(
        embedder = embedder.name(),
        dimension = embedder.dimension(),
        db_path = %settings.db_path.display(),
        ollama_model = %settings.ollama_model,
        "application state ready"
    );

    Ok(AppState::new(embedder, Arc::new(store)).with_llm(llm))
}
