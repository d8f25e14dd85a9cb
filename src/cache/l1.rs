//! In-memory embedding tier.
//!
//! Keys are the 32-byte BLAKE3 digests produced by
//! [`hash_embedding_key`](crate::hashing::hash_embedding_key); values are shared,
//! immutable vectors.

use moka::sync::Cache;
use std::sync::Arc;

use crate::constants::DEFAULT_L1_CAPACITY;

/// Bounded in-memory map from embedding key to vector.
#[derive(Clone)]
pub struct L1Cache {
    entries: Cache<[u8; 32], Arc<[f32]>>,
}

impl L1Cache {
    /// Creates a cache with the default capacity.
    #[inline]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_L1_CAPACITY)
    }

    /// Creates a cache with a max entry capacity.
    #[inline]
    pub fn with_capacity(capacity: u64) -> Self {
        Self {
            entries: Cache::builder().max_capacity(capacity).build(),
        }
    }

    #[inline]
    pub fn get(&self, key: &[u8; 32]) -> Option<Arc<[f32]>> {
        self.entries.get(key)
    }

    /// Inserts `vector` unless the key is already present, returning the stored value.
    ///
    /// Entries are never overwritten, so concurrent writers of the same key observe one
    /// vector.
    #[inline]
    pub fn insert_if_absent(&self, key: [u8; 32], vector: Arc<[f32]>) -> Arc<[f32]> {
        self.entries.get_with(key, || vector)
    }

    #[inline]
    pub fn contains(&self, key: &[u8; 32]) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the number of cached entries.
    ///
    /// Moka updates counts lazily; call [`run_pending_tasks`](Self::run_pending_tasks)
    /// first when an exact figure matters.
    #[inline]
    pub fn len(&self) -> u64 {
        self.entries.entry_count()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.entry_count() == 0
    }

    #[inline]
    pub fn clear(&self) {
        self.entries.invalidate_all();
    }

    /// Runs any pending maintenance tasks in the underlying cache.
    #[inline]
    pub fn run_pending_tasks(&self) {
        self.entries.run_pending_tasks();
    }
}

impl Default for L1Cache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for L1Cache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("L1Cache")
            .field("entry_count", &self.entries.entry_count())
            .finish()
    }
}
