use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by candidate store operations.
pub enum VectorDbError {
    /// Query dimension differs from the store's dimension.
    #[error("vector dimension mismatch: store has {expected}, query has {actual}")]
    DimensionMismatch {
        /// Store dimension.
        expected: usize,
        /// Query dimension.
        actual: usize,
    },

    /// A candidate in a replacement set has a different dimension from the first one.
    #[error("candidate '{label}' has dimension {actual}, set dimension is {expected}")]
    InconsistentDimensions {
        /// Offending candidate label.
        label: String,
        /// Dimension of the first candidate.
        expected: usize,
        /// Dimension of the offending candidate.
        actual: usize,
    },

    /// A candidate carries an empty vector.
    #[error("candidate '{label}' has an empty vector")]
    EmptyVector {
        /// Offending candidate label.
        label: String,
    },
}

/// Convenience result type for vector operations.
pub type VectorDbResult<T> = Result<T, VectorDbError>;
