use std::collections::HashMap;
use std::path::PathBuf;

use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use localforge_core::{Document, SearchResult, Value};
use localforge_llm::build_rag_prompt;
use localforge_retrieval::{Indexer, Retriever, DEFAULT_EXTENSIONS};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::{index_directory, ApiError, AppState};

const MAX_BODY_BYTES: usize = 64 * 1024 * 1024;
const DEFAULT_TOP_K: usize = 5;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AddItem {
    pub doc_id: String,
    pub content: String,
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AddBatchRequest {
    pub items: Vec<AddItem>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QueryRequest {
    pub query: String,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IndexRequest {
    pub path: PathBuf,
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

#[derive(Debug, Serialize)]
struct IndexedResponse {
    indexed: usize,
}

#[derive(Debug, Serialize)]
struct SearchResponse {
    results: Vec<SearchResult>,
}

#[derive(Debug, Serialize)]
struct QueryResponse {
    response: String,
    context: Vec<SearchResult>,
}

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

fn default_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect()
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/add-batch", post(add_batch))
        .route("/search", post(search))
        .route("/query", post(query))
        .route("/index", post(index_path))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn add_batch(
    State(state): State<AppState>,
    payload: Result<Json<AddBatchRequest>, JsonRejection>,
) -> Result<Json<IndexedResponse>, ApiError> {
    let Json(request) = payload?;
    let docs = request
        .items
        .into_iter()
        .map(|item| Document {
            id: item.doc_id,
            content: item.content,
            metadata: item.metadata,
            embedding: None,
        })
        .collect();

    let indexed = Indexer::new(state.embedder.clone(), state.store.clone())
        .index(docs)
        .await?;
    Ok(Json(IndexedResponse { indexed }))
}

async fn search(
    State(state): State<AppState>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    let Json(request) = payload?;
    let results = Retriever::new(state.embedder.clone(), state.store.clone())
        .retrieve(&request.query, request.top_k)
        .await?;
    Ok(Json(SearchResponse { results }))
}

async fn query(
    State(state): State<AppState>,
    payload: Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<QueryResponse>, ApiError> {
    let Json(request) = payload?;
    let llm = state.llm.clone().ok_or(ApiError::LlmUnavailable)?;
    let context = Retriever::new(state.embedder.clone(), state.store.clone())
        .retrieve(&request.query, request.top_k)
        .await?;

    let prompt = build_rag_prompt(&request.query, &context);
    let response = llm.generate(&prompt).await?;
    Ok(Json(QueryResponse { response, context }))
}

async fn index_path(
    State(state): State<AppState>,
    payload: Result<Json<IndexRequest>, JsonRejection>,
) -> Result<Json<IndexedResponse>, ApiError> {
    let Json(request) = payload?;
    let indexed = index_directory(&state, &request.path, &request.extensions).await?;
    Ok(Json(IndexedResponse { indexed }))
}
