use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use async_trait::async_trait;
use localforge_core::{
    cosine_similarity, rank, Document, SearchResult, StoreError, Value, VectorStore,
};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use tracing::{debug, warn};

use crate::codec::{decode_embedding, encode_embedding};
use crate::migrations::run_migrations;
use crate::schema::{
    COUNT_DOCUMENTS_SQL, DELETE_DOCUMENT_SQL, SELECT_ALL_DOCUMENTS_SQL, UPSERT_DOCUMENT_SQL,
};
use crate::SqliteStoreError;

const DEFAULT_FILE_CONNECTIONS: u32 = 4;

/// Ranked results plus the number of documents left out because their
/// dimensionality differed from the query.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchReport {
    pub results: Vec<SearchResult>,
    pub skipped: usize,
}

/// Document store over a single `documents` table.
///
/// Every operation checks a connection out of the pool (or opens a
/// transaction) and returns it when the future completes or is dropped.
#[derive(Debug, Clone)]
pub struct SqliteVectorStore {
    pool: SqlitePool,
}

#[derive(Debug, Clone)]
enum Location {
    Url(String),
    File(PathBuf),
}

impl Location {
    fn is_in_memory(&self) -> bool {
        match self {
            Location::Url(url) => url.contains(":memory:") || url.contains("mode=memory"),
            Location::File(_) => false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SqliteVectorStoreBuilder {
    location: Location,
    max_connections: u32,
    create_if_missing: bool,
}

impl SqliteVectorStore {
    pub fn builder(database_url: impl Into<String>) -> SqliteVectorStoreBuilder {
        SqliteVectorStoreBuilder {
            location: Location::Url(database_url.into()),
            max_connections: 1,
            create_if_missing: true,
        }
    }

    /// Opens (creating if needed) the database file at `path`, including any
    /// missing parent directories.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, SqliteStoreError> {
        SqliteVectorStoreBuilder {
            location: Location::File(path.as_ref().to_path_buf()),
            max_connections: DEFAULT_FILE_CONNECTIONS,
            create_if_missing: true,
        }
        .build()
        .await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Brute-force cosine search that also reports skipped documents.
    pub async fn search_with_report(
        &self,
        query_embedding: &[f32],
        top_k: usize,
    ) -> Result<SearchReport, StoreError> {
        if top_k == 0 {
            return Ok(SearchReport::default());
        }

        let docs = self.get_all().await?;
        let mut skipped = 0;
        let mut scored = Vec::with_capacity(docs.len());
        for mut doc in docs {
            let Some(embedding) = doc.embedding.take() else {
                skipped += 1;
                continue;
            };
            if embedding.len() != query_embedding.len() {
                skipped += 1;
                continue;
            }
            let score = cosine_similarity(query_embedding, &embedding);
            scored.push(SearchResult {
                document: doc,
                score,
            });
        }

        if skipped > 0 {
            warn!(
                skipped,
                query_dim = query_embedding.len(),
                "skipped documents with mismatched embedding dimension"
            );
        }

        let scanned = scored.len();
        let results = rank(scored, top_k);
        debug!(scanned, returned = results.len(), top_k, "search complete");
        Ok(SearchReport { results, skipped })
    }

    fn validate(docs: &[Document]) -> Result<(), StoreError> {
        for (index, doc) in docs.iter().enumerate() {
            if doc.id.trim().is_empty() {
                return Err(StoreError::invalid_document(index, "document id is empty"));
            }
            match &doc.embedding {
                None => {
                    return Err(StoreError::invalid_document(
                        index,
                        format!("document '{}' has no embedding", doc.id),
                    ))
                }
                Some(embedding) if embedding.is_empty() => {
                    return Err(StoreError::invalid_document(
                        index,
                        format!("document '{}' has an empty embedding", doc.id),
                    ))
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}

impl SqliteVectorStoreBuilder {
    pub fn max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections.max(1);
        self
    }

    pub fn create_if_missing(mut self, create_if_missing: bool) -> Self {
        self.create_if_missing = create_if_missing;
        self
    }

    pub async fn build(self) -> Result<SqliteVectorStore, SqliteStoreError> {
        let options = match &self.location {
            Location::Url(url) => {
                SqliteConnectOptions::from_str(url).map_err(SqliteStoreError::Connection)?
            }
            Location::File(path) => {
                if self.create_if_missing {
                    create_parent_dir(path)?;
                }
                SqliteConnectOptions::new()
                    .filename(path)
                    .journal_mode(SqliteJournalMode::Wal)
            }
        }
        .create_if_missing(self.create_if_missing);

        let mut pool_options = SqlitePoolOptions::new().max_connections(self.max_connections);
        if self.location.is_in_memory() {
            // The database disappears with its last connection.
            pool_options = pool_options
                .min_connections(1)
                .max_lifetime(None)
                .idle_timeout(None);
        }
        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(SqliteStoreError::Connection)?;

        run_migrations(&pool).await?;
        debug!(location = ?self.location, "document store ready");

        Ok(SqliteVectorStore { pool })
    }
}

fn create_parent_dir(path: &Path) -> Result<(), SqliteStoreError> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }
    std::fs::create_dir_all(parent).map_err(|source| SqliteStoreError::CreateDir {
        path: parent.to_path_buf(),
        source,
    })
}

fn corrupt(doc_id: &str, reason: impl ToString) -> StoreError {
    StoreError::CorruptRow {
        doc_id: doc_id.to_string(),
        reason: reason.to_string(),
    }
}

fn row_to_document(row: &SqliteRow) -> Result<Document, StoreError> {
    let doc_id: String = row.try_get("doc_id").map_err(SqliteStoreError::from)?;
    let content: String = row.try_get("content").map_err(SqliteStoreError::from)?;
    let metadata_json: String = row.try_get("metadata").map_err(SqliteStoreError::from)?;
    let blob: Vec<u8> = row.try_get("embedding").map_err(SqliteStoreError::from)?;
    let dim: i64 = row.try_get("embedding_dim").map_err(SqliteStoreError::from)?;

    let dim = usize::try_from(dim)
        .map_err(|_| corrupt(&doc_id, format!("negative embedding dimension {dim}")))?;
    let embedding = decode_embedding(&blob, dim).map_err(|err| corrupt(&doc_id, err))?;
    let metadata: HashMap<String, Value> = serde_json::from_str(&metadata_json)
        .map_err(|err| corrupt(&doc_id, format!("invalid metadata json: {err}")))?;

    Ok(Document {
        id: doc_id,
        content,
        metadata,
        embedding: Some(embedding),
    })
}

#[async_trait]
impl VectorStore for SqliteVectorStore {
    async fn upsert(&self, docs: Vec<Document>) -> Result<usize, StoreError> {
        if docs.is_empty() {
            return Ok(0);
        }
        Self::validate(&docs)?;

        let mut tx = self.pool.begin().await.map_err(SqliteStoreError::from)?;
        for doc in &docs {
            let embedding = doc.embedding.as_deref().unwrap_or_default();
            let metadata = serde_json::to_string(&doc.metadata).map_err(|source| {
                SqliteStoreError::Metadata {
                    doc_id: doc.id.clone(),
                    source,
                }
            })?;
            sqlx::query(UPSERT_DOCUMENT_SQL)
                .bind(&doc.id)
                .bind(&doc.content)
                .bind(metadata)
                .bind(encode_embedding(embedding))
                .bind(embedding.len() as i64)
                .execute(&mut *tx)
                .await
                .map_err(SqliteStoreError::from)?;
        }
        tx.commit().await.map_err(SqliteStoreError::from)?;

        debug!(count = docs.len(), "upserted documents");
        Ok(docs.len())
    }

    async fn search(
        &self,
        query_embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchResult>, StoreError> {
        Ok(self.search_with_report(query_embedding, top_k).await?.results)
    }

    async fn get_all(&self) -> Result<Vec<Document>, StoreError> {
        let rows = sqlx::query(SELECT_ALL_DOCUMENTS_SQL)
            .fetch_all(&self.pool)
            .await
            .map_err(SqliteStoreError::from)?;

        rows.iter().map(row_to_document).collect()
    }

    async fn delete(&self, ids: &[String]) -> Result<usize, StoreError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await.map_err(SqliteStoreError::from)?;
        let mut deleted = 0u64;
        for id in ids {
            deleted += sqlx::query(DELETE_DOCUMENT_SQL)
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(SqliteStoreError::from)?
                .rows_affected();
        }
        tx.commit().await.map_err(SqliteStoreError::from)?;

        debug!(requested = ids.len(), deleted, "deleted documents");
        Ok(deleted as usize)
    }

    async fn count(&self) -> Result<usize, StoreError> {
        let count: i64 = sqlx::query_scalar(COUNT_DOCUMENTS_SQL)
            .fetch_one(&self.pool)
            .await
            .map_err(SqliteStoreError::from)?;
        Ok(count as usize)
    }
}
