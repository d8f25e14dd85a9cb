//! Two-tier embedding cache: a moka memory tier over a file-per-key disk tier.

/// Binary record store.
pub mod disk;
mod error;
pub mod l1;
pub mod tiered;

#[cfg(test)]
mod tiered_tests;

pub use disk::{DiskTier, decode_record, encode_record};
pub use error::{CacheError, CacheResult};
pub use l1::L1Cache;
pub use tiered::{CacheStats, CacheTier, EmbeddingCache};
