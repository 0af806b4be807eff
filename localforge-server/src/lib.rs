//! HTTP surface for LocalForge: ingestion, search and retrieval-augmented
//! answers over a local document store.

mod error;
mod routes;
mod settings;
mod state;

use std::path::Path;

use localforge_retrieval::{DirectoryLoader, Indexer, RetrievalError};

pub use error::ApiError;
pub use routes::{router, AddBatchRequest, AddItem, IndexRequest, QueryRequest, SearchRequest};
pub use settings::Settings;
pub use state::{build_state, AppState};

/// Indexes every matching file under `path` into the state's store.
pub async fn index_directory<I, T>(
    state: &AppState,
    path: &Path,
    extensions: I,
) -> Result<usize, RetrievalError>
where
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    let loader = DirectoryLoader::new(path).extensions(extensions);
    Indexer::new(state.embedder.clone(), state.store.clone())
        .index_directory(&loader)
        .await
}
