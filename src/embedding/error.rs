use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("embedding inference failed: {reason}")]
    InferenceFailed { reason: String },

    #[error("embedder returned {actual} vectors for {expected} texts")]
    CountMismatch { expected: usize, actual: usize },

    #[error("embedder returned an empty vector for input {index}")]
    EmptyVector { index: usize },

    #[error("invalid embedder configuration: {reason}")]
    InvalidConfig { reason: String },
}

pub type EmbeddingResult<T> = Result<T, EmbeddingError>;
