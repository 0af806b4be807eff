//! Model-backed embeddings via Candle.
//!
//! Loads a BERT-family sentence-transformer from a local directory holding
//! `config.json`, `tokenizer.json` and `model.safetensors`. Nothing is fetched
//! over the network.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use localforge_core::{Embedding, EmbeddingError};
use tokenizers::{Tokenizer, TruncationParams};
use tracing::{debug, info};

use crate::EmbeddingProviderError;

pub const DEFAULT_MODEL_NAME: &str = "sentence-transformers/all-MiniLM-L6-v2";

const MAX_SEQ_LENGTH: usize = 256;

pub struct CandleEmbedding {
    inner: Arc<Encoder>,
    dimension: usize,
    model_dir: PathBuf,
}

/// Model state shared with blocking inference tasks.
struct Encoder {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
}

impl std::fmt::Debug for CandleEmbedding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CandleEmbedding")
            .field("model_dir", &self.model_dir)
            .field("dimension", &self.dimension)
            .finish()
    }
}

fn load_error(err: impl std::fmt::Display) -> EmbeddingProviderError {
    EmbeddingProviderError::ModelLoad(err.to_string())
}

fn inference_error(err: impl std::fmt::Display) -> EmbeddingProviderError {
    EmbeddingProviderError::Inference(err.to_string())
}

impl CandleEmbedding {
    pub fn from_dir(model_dir: impl AsRef<Path>) -> Result<Self, EmbeddingProviderError> {
        let model_dir = model_dir.as_ref();
        info!(model_dir = %model_dir.display(), "loading embedding model");

        let config_raw =
            std::fs::read_to_string(model_dir.join("config.json")).map_err(load_error)?;
        let config: BertConfig = serde_json::from_str(&config_raw).map_err(load_error)?;
        let hidden_size = serde_json::from_str::<serde_json::Value>(&config_raw)
            .map_err(load_error)?
            .get("hidden_size")
            .and_then(serde_json::Value::as_u64)
            .ok_or_else(|| load_error("config.json has no hidden_size"))?
            as usize;

        let tokenizer = load_tokenizer(&model_dir.join("tokenizer.json"))?;

        let device = Device::Cpu;
        let weights = model_dir.join("model.safetensors");
        // SAFETY: the weights file is only read and must not be modified while mapped.
        let vb = unsafe { VarBuilder::from_mmaped_safetensors(&[weights], DType::F32, &device) }
            .map_err(load_error)?;
        let model = BertModel::load(vb, &config).map_err(load_error)?;

        info!(dimension = hidden_size, "embedding model loaded");

        Ok(Self {
            inner: Arc::new(Encoder {
                model,
                tokenizer,
                device,
            }),
            dimension: hidden_size,
            model_dir: model_dir.to_path_buf(),
        })
    }

    /// Runs one forward pass on the blocking pool so request handlers keep
    /// making progress while the model works.
    async fn encode(
        &self,
        texts: Vec<String>,
    ) -> Result<Vec<Vec<f32>>, EmbeddingProviderError> {
        let encoder = Arc::clone(&self.inner);
        run_blocking(move || encoder.encode_batch(&texts)).await
    }
}

/// Loads a tokenizer that truncates to [`MAX_SEQ_LENGTH`] while keeping the
/// special tokens added by its post-processor.
fn load_tokenizer(path: &Path) -> Result<Tokenizer, EmbeddingProviderError> {
    let mut tokenizer = Tokenizer::from_file(path).map_err(load_error)?;
    tokenizer
        .with_truncation(Some(TruncationParams {
            max_length: MAX_SEQ_LENGTH,
            ..Default::default()
        }))
        .map_err(load_error)?;
    Ok(tokenizer)
}

async fn run_blocking<T, F>(work: F) -> Result<T, EmbeddingProviderError>
where
    F: FnOnce() -> Result<T, EmbeddingProviderError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(inference_error)?
}

impl Encoder {
    fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingProviderError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        debug!(count = texts.len(), "encoding batch");

        let encodings = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(inference_error)?;

        let max_len = encodings
            .iter()
            .map(|encoding| encoding.get_ids().len())
            .max()
            .unwrap_or(0)
            .max(1);

        let mut ids = Vec::with_capacity(texts.len() * max_len);
        let mut mask = Vec::with_capacity(texts.len() * max_len);
        for encoding in &encodings {
            let mut row_ids = encoding.get_ids().to_vec();
            let mut row_mask = encoding.get_attention_mask().to_vec();
            row_ids.resize(max_len, 0);
            row_mask.resize(max_len, 0);
            ids.extend(row_ids);
            mask.extend(row_mask);
        }

        let shape = (texts.len(), max_len);
        let input_ids = Tensor::from_vec(ids, shape, &self.device).map_err(inference_error)?;
        let attention_mask =
            Tensor::from_vec(mask, shape, &self.device).map_err(inference_error)?;
        let token_type_ids = input_ids.zeros_like().map_err(inference_error)?;

        let hidden = self
            .model
            .forward(&input_ids, &token_type_ids, Some(&attention_mask))
            .map_err(inference_error)?;
        let pooled = mean_pool(&hidden, &attention_mask).map_err(inference_error)?;
        pooled.to_vec2::<f32>().map_err(inference_error)
    }
}

fn mean_pool(hidden: &Tensor, attention_mask: &Tensor) -> candle_core::Result<Tensor> {
    let mask = attention_mask
        .unsqueeze(2)?
        .broadcast_as(hidden.shape())?
        .to_dtype(DType::F32)?;
    let summed = hidden.broadcast_mul(&mask)?.sum(1)?;
    let counts = mask.sum(1)?.clamp(1e-9, f64::MAX)?;
    summed.broadcast_div(&counts)
}

#[async_trait]
impl Embedding for CandleEmbedding {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.encode(vec![text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                EmbeddingProviderError::InvalidResponse("model returned no rows".to_string())
                    .into()
            })
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let rows = self.encode(texts.to_vec()).await?;
        if rows.len() != texts.len() {
            return Err(EmbeddingProviderError::InvalidResponse(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                rows.len()
            ))
            .into());
        }
        Ok(rows)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        "candle"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_dir_reports_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let err = CandleEmbedding::from_dir(dir.path()).unwrap_err();
        assert!(matches!(err, EmbeddingProviderError::ModelLoad(_)));
    }

    const WORD_LEVEL_TOKENIZER: &str = r#"{
        "version": "1.0",
        "truncation": null,
        "padding": null,
        "added_tokens": [],
        "normalizer": null,
        "pre_tokenizer": { "type": "Whitespace" },
        "post_processor": {
            "type": "TemplateProcessing",
            "single": [
                { "SpecialToken": { "id": "[CLS]", "type_id": 0 } },
                { "Sequence": { "id": "A", "type_id": 0 } },
                { "SpecialToken": { "id": "[SEP]", "type_id": 0 } }
            ],
            "pair": [
                { "SpecialToken": { "id": "[CLS]", "type_id": 0 } },
                { "Sequence": { "id": "A", "type_id": 0 } },
                { "SpecialToken": { "id": "[SEP]", "type_id": 0 } },
                { "Sequence": { "id": "B", "type_id": 1 } },
                { "SpecialToken": { "id": "[SEP]", "type_id": 1 } }
            ],
            "special_tokens": {
                "[CLS]": { "id": "[CLS]", "ids": [1], "tokens": ["[CLS]"] },
                "[SEP]": { "id": "[SEP]", "ids": [2], "tokens": ["[SEP]"] }
            }
        },
        "decoder": null,
        "model": {
            "type": "WordLevel",
            "vocab": { "[UNK]": 0, "[CLS]": 1, "[SEP]": 2, "word": 3 },
            "unk_token": "[UNK]"
        }
    }"#;

    #[test]
    fn long_inputs_are_truncated_with_separator_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokenizer.json");
        std::fs::write(&path, WORD_LEVEL_TOKENIZER).unwrap();

        let tokenizer = load_tokenizer(&path).unwrap();
        let text = vec!["word"; MAX_SEQ_LENGTH * 2].join(" ");
        let encoding = tokenizer.encode(text, true).unwrap();
        let ids = encoding.get_ids();

        assert_eq!(ids.len(), MAX_SEQ_LENGTH);
        assert_eq!(ids.first(), Some(&1));
        assert_eq!(ids.last(), Some(&2));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn blocking_work_runs_off_the_runtime_thread() {
        let runtime_thread = std::thread::current().id();
        let worker_thread = run_blocking(|| Ok(std::thread::current().id()))
            .await
            .unwrap();
        assert_ne!(worker_thread, runtime_thread);
    }

    #[tokio::test]
    async fn panicking_inference_is_reported() {
        let err = run_blocking::<(), _>(|| panic!("forward pass exploded"))
            .await
            .unwrap_err();
        assert!(matches!(err, EmbeddingProviderError::Inference(_)));
    }
}
