use httpmock::prelude::*;
use localforge_llm::{LlmError, OllamaClient};
use serde_json::json;

#[tokio::test]
async fn ollama_generate_returns_response_field() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/generate")
            .json_body(json!({"model": "llama3.1", "prompt": "hi", "stream": false}));
        then.status(200)
            .json_body(json!({"response": "hello", "done": true}));
    });

    let client = OllamaClient::new(server.url(""), "llama3.1").expect("client");
    let answer = client.generate("hi").await.expect("generate");
    assert_eq!(answer, "hello");
    mock.assert();
}

#[tokio::test]
async fn ollama_generate_defaults_missing_response_to_empty() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/generate");
        then.status(200).json_body(json!({"done": true}));
    });

    let client = OllamaClient::new(server.url("/"), "llama3.1").expect("client");
    assert_eq!(client.generate("hi").await.unwrap(), "");
}

#[tokio::test]
async fn ollama_generate_surfaces_http_errors() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/generate");
        then.status(500).body("model not loaded");
    });

    let client = OllamaClient::new(server.url(""), "llama3.1").expect("client");
    let err = client.generate("hi").await.unwrap_err();
    assert!(matches!(err, LlmError::Provider(_)));
}
