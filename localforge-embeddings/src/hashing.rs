use async_trait::async_trait;
use localforge_core::{Embedding, EmbeddingError};

pub const DEFAULT_HASHING_DIMENSION: usize = 512;

const FNV_OFFSET: u64 = 14695981039346656037;
const FNV_PRIME: u64 = 1099511628211;

fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash = FNV_OFFSET;
    for byte in bytes {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Offline fallback embedder: a bag-of-tokens hashed into a fixed number of
/// buckets, L2-normalized.
///
/// Tokens are lowercase runs of two or more word characters. Each token adds
/// one to bucket `fnv1a(token) % dimension`. A text with no tokens maps to the
/// zero vector.
#[derive(Clone, Debug)]
pub struct HashingEmbedder {
    dimension: usize,
}

impl HashingEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    pub fn encode(&self, text: &str) -> Vec<f32> {
        let mut vec = vec![0.0_f32; self.dimension];
        let lowered = text.to_lowercase();
        for token in tokens(&lowered) {
            let bucket = (fnv1a(token.as_bytes()) % self.dimension as u64) as usize;
            vec[bucket] += 1.0;
        }

        let mut norm = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm == 0.0 {
            norm = 1.0;
        }
        for value in &mut vec {
            *value /= norm;
        }
        vec
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_HASHING_DIMENSION)
    }
}

fn tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| token.chars().nth(1).is_some())
}

#[async_trait]
impl Embedding for HashingEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Ok(self.encode(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(texts.iter().map(|text| self.encode(text)).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        "hashing"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_character_tokens_are_ignored() {
        let collected: Vec<&str> = tokens("a bb c_d ee-f").collect();
        assert_eq!(collected, vec!["bb", "c_d", "ee"]);
    }

    #[test]
    fn fnv1a_matches_reference_value() {
        assert_eq!(fnv1a(b""), FNV_OFFSET);
        assert_eq!(fnv1a(b"a"), 0xaf63dc4c8601ec8c);
    }
}
