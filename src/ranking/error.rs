use thiserror::Error;

use crate::cache::CacheError;
use crate::embedding::EmbeddingError;
use crate::vectordb::VectorDbError;

/// Failure to rank one text. Batch classification reports one per failed item.
#[derive(Debug, Error)]
pub enum RankingError {
    #[error("embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("embedding cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("vector search failed: {0}")]
    VectorDb(#[from] VectorDbError),

    #[error("classification cancelled")]
    Cancelled,
}

pub type RankingResult<T> = Result<T, RankingError>;
