use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
/// Errors returned by the embedding cache tiers.
pub enum CacheError {
    /// IO error while reading or writing a record.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File or directory involved.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Cache directory is missing and could not be created.
    #[error("cache directory unavailable: {path}")]
    DirectoryUnavailable {
        /// Directory path.
        path: PathBuf,
    },

    /// Record is shorter than its 4-byte length header.
    #[error("truncated cache record header in {path} ({len} bytes)")]
    TruncatedHeader {
        /// Record path.
        path: PathBuf,
        /// Bytes actually present.
        len: usize,
    },

    /// Payload length disagrees with the declared element count.
    #[error("corrupt cache record {path}: declared {declared} floats, found {actual} payload bytes")]
    Corrupt {
        /// Record path.
        path: PathBuf,
        /// Element count from the header.
        declared: u32,
        /// Payload bytes after the header.
        actual: usize,
    },
}

/// Convenience result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;
