use std::path::Path;

use anyhow::Context;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

pub const DEFAULT_HOST: &str = "http://localhost:8000";

#[derive(Debug, Deserialize)]
pub struct QueryAnswer {
    pub response: String,
    #[serde(default)]
    pub context: Vec<Value>,
}

/// Thin HTTP client for a running `localforge-server`.
#[derive(Clone, Debug)]
pub struct ServerClient {
    host: String,
    http: Client,
}

impl ServerClient {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    pub async fn index(&self, path: &Path) -> anyhow::Result<Value> {
        self.post("/index", json!({ "path": path })).await
    }

    pub async fn search(&self, query: &str, top_k: usize) -> anyhow::Result<Value> {
        self.post("/search", json!({ "query": query, "top_k": top_k }))
            .await
    }

    pub async fn query(&self, question: &str) -> anyhow::Result<QueryAnswer> {
        let value = self.post("/query", json!({ "query": question })).await?;
        serde_json::from_value(value).context("unexpected /query response")
    }

    async fn post(&self, route: &str, body: Value) -> anyhow::Result<Value> {
        let url = format!("{}{route}", self.host);
        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("request to {url} failed"))?
            .error_for_status()
            .with_context(|| format!("{url} returned an error status"))?;
        response
            .json()
            .await
            .with_context(|| format!("invalid JSON from {url}"))
    }
}
