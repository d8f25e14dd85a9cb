use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::RwLock;

use super::error::{EmbeddingError, EmbeddingResult};
use super::Embedder;

/// Embedder returning canned vectors, with call accounting.
///
/// Unknown texts get `fallback` (a zero vector of the configured dimension by default).
#[derive(Debug)]
pub struct MockEmbedder {
    model_id: String,
    dim: usize,
    vectors: RwLock<HashMap<String, Vec<f32>>>,
    fallback: RwLock<Option<Vec<f32>>>,
    fail: AtomicBool,
    calls: AtomicUsize,
    texts_embedded: AtomicUsize,
}

impl MockEmbedder {
    pub fn new(dim: usize) -> Self {
        Self::with_model_id("mock-model", dim)
    }

    pub fn with_model_id(model_id: &str, dim: usize) -> Self {
        Self {
            model_id: model_id.to_string(),
            dim,
            vectors: RwLock::new(HashMap::new()),
            fallback: RwLock::new(None),
            fail: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
            texts_embedded: AtomicUsize::new(0),
        }
    }

    /// Registers the vector returned for `text` (matched verbatim, callers normalize).
    pub fn insert(&self, text: &str, vector: Vec<f32>) {
        self.vectors.write().insert(text.to_string(), vector);
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with_vector(self, text: &str, vector: Vec<f32>) -> Self {
        self.insert(text, vector);
        self
    }

    pub fn set_fallback(&self, vector: Vec<f32>) {
        *self.fallback.write() = Some(vector);
    }

    /// Makes every subsequent call fail with [`EmbeddingError::InferenceFailed`].
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Number of `embed` invocations.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Total number of texts passed to `embed`.
    pub fn texts_embedded(&self) -> usize {
        self.texts_embedded.load(Ordering::SeqCst)
    }
}

impl Embedder for MockEmbedder {
    fn embed(&self, texts: &[&str]) -> EmbeddingResult<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.texts_embedded.fetch_add(texts.len(), Ordering::SeqCst);

        if self.fail.load(Ordering::SeqCst) {
            return Err(EmbeddingError::InferenceFailed {
                reason: "mock embedder configured to fail".to_string(),
            });
        }

        let vectors = self.vectors.read();
        let fallback = self.fallback.read();
        Ok(texts
            .iter()
            .map(|t| {
                vectors
                    .get(*t)
                    .cloned()
                    .or_else(|| fallback.clone())
                    .unwrap_or_else(|| vec![0.0; self.dim])
            })
            .collect())
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}
