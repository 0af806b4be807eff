use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("LLM client setup failed: {0}")]
    Client(String),
    #[error("LLM provider failed: {0}")]
    Provider(String),
}
