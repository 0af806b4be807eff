//! SQLite-backed document store with brute-force cosine search.

pub mod codec;
mod error;
pub mod migrations;
pub mod schema;
mod store;

pub use error::SqliteStoreError;
pub use store::{SearchReport, SqliteVectorStore, SqliteVectorStoreBuilder};
