use tracing::debug;

use crate::constants::DEFAULT_STUB_EMBEDDING_DIM;
use crate::hashing::hash_to_u64;

use super::error::{EmbeddingError, EmbeddingResult};
use super::{Embedder, l2_normalize};

/// Character-trigram feature hashing into a fixed number of buckets.
///
/// Texts that share substrings land near each other, which is enough to exercise the
/// ranking pipeline end to end. It is not a semantic model.
#[derive(Debug, Clone)]
pub struct StubEmbedder {
    dim: usize,
    model_id: String,
}

impl StubEmbedder {
    pub fn new(dim: usize) -> EmbeddingResult<Self> {
        if dim == 0 {
            return Err(EmbeddingError::InvalidConfig {
                reason: "embedding dimension must be > 0".to_string(),
            });
        }
        Ok(Self {
            dim,
            model_id: format!("stub-trigram-{dim}"),
        })
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dim];
        let padded: Vec<char> = std::iter::once(' ')
            .chain(text.chars())
            .chain(std::iter::once(' '))
            .collect();

        for gram in padded.windows(3) {
            let token: String = gram.iter().collect();
            self.accumulate(&mut vector, token.as_bytes(), 1.0);
        }
        for word in text.split_whitespace() {
            self.accumulate(&mut vector, word.as_bytes(), 2.0);
        }

        l2_normalize(&mut vector);
        vector
    }

    fn accumulate(&self, vector: &mut [f32], token: &[u8], weight: f32) {
        let h = hash_to_u64(token);
        let bucket = (h % self.dim as u64) as usize;
        let sign = if (h >> 63) == 0 { 1.0 } else { -1.0 };
        vector[bucket] += sign * weight;
    }
}

impl Default for StubEmbedder {
    fn default() -> Self {
        Self {
            dim: DEFAULT_STUB_EMBEDDING_DIM,
            model_id: format!("stub-trigram-{DEFAULT_STUB_EMBEDDING_DIM}"),
        }
    }
}

impl Embedder for StubEmbedder {
    fn embed(&self, texts: &[&str]) -> EmbeddingResult<Vec<Vec<f32>>> {
        debug!(batch = texts.len(), dim = self.dim, "Generating stub embeddings");
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}
