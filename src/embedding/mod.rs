//! Text-to-vector encoders.
//!
//! The ranking core only talks to the [`Embedder`] trait. Concrete encoders (ONNX,
//! remote APIs) live outside this crate; [`StubEmbedder`] keeps the binary usable
//! without model files and [`MockEmbedder`] drives the tests.

mod error;
/// Deterministic test embedder with canned vectors.
#[cfg(any(test, feature = "mock"))]
pub mod mock;
/// Feature-hashing embedder (no model files).
pub mod stub;


pub use error::{EmbeddingError, EmbeddingResult};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockEmbedder;
pub use stub::StubEmbedder;

/// Black-box text encoder.
///
/// Callers pass already-normalized text. An implementation must return exactly one
/// vector per input, in input order, and keep the dimension constant for a given
/// [`model_id`](Embedder::model_id).
pub trait Embedder: Send + Sync {
    /// Encodes a batch of texts.
    fn embed(&self, texts: &[&str]) -> EmbeddingResult<Vec<Vec<f32>>>;

    /// Identifier that namespaces cached vectors.
    fn model_id(&self) -> &str;
}

impl<E: Embedder + ?Sized> Embedder for std::sync::Arc<E> {
    fn embed(&self, texts: &[&str]) -> EmbeddingResult<Vec<Vec<f32>>> {
        (**self).embed(texts)
    }

    fn model_id(&self) -> &str {
        (**self).model_id()
    }
}

/// Checks the one-vector-per-text contract and rejects empty vectors.
pub fn validate_batch(expected: usize, vectors: &[Vec<f32>]) -> EmbeddingResult<()> {
    if vectors.len() != expected {
        return Err(EmbeddingError::CountMismatch {
            expected,
            actual: vectors.len(),
        });
    }
    if let Some(index) = vectors.iter().position(Vec::is_empty) {
        return Err(EmbeddingError::EmptyVector { index });
    }
    Ok(())
}

/// Scales `vector` to unit length in place; zero vectors are left untouched.
pub fn l2_normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in vector.iter_mut() {
            *x /= norm;
        }
    }
}
