pub const DOCUMENTS_TABLE: &str = "documents";

pub const CREATE_DOCUMENTS_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS documents (\
    doc_id TEXT PRIMARY KEY,\
    content TEXT NOT NULL,\
    metadata TEXT NOT NULL,\
    embedding BLOB NOT NULL,\
    embedding_dim INTEGER NOT NULL\
)";

pub const MIGRATION_STATEMENTS_SQL: [&str; 1] = [CREATE_DOCUMENTS_TABLE_SQL];

pub const UPSERT_DOCUMENT_SQL: &str = "INSERT INTO documents (doc_id, content, metadata, embedding, embedding_dim) \
    VALUES (?, ?, ?, ?, ?) \
    ON CONFLICT(doc_id) DO UPDATE SET \
    content = excluded.content, \
    metadata = excluded.metadata, \
    embedding = excluded.embedding, \
    embedding_dim = excluded.embedding_dim";

pub const SELECT_ALL_DOCUMENTS_SQL: &str =
    "SELECT doc_id, content, metadata, embedding, embedding_dim FROM documents ORDER BY doc_id";

pub const DELETE_DOCUMENT_SQL: &str = "DELETE FROM documents WHERE doc_id = ?";

pub const COUNT_DOCUMENTS_SQL: &str = "SELECT COUNT(*) FROM documents";
