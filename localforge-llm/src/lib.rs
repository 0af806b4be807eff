mod error;
mod ollama;
mod prompt;

pub use error::LlmError;
pub use ollama::{OllamaClient, DEFAULT_OLLAMA_MODEL, DEFAULT_OLLAMA_URL};
pub use prompt::build_rag_prompt;
