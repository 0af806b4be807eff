mod error;
mod indexer;
mod loader;
mod retriever;

pub use error::RetrievalError;
pub use indexer::Indexer;
pub use loader::{DirectoryLoader, DEFAULT_EXTENSIONS};
pub use retriever::Retriever;
