//! Memory tier in front of an optional disk tier.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tracing::{debug, instrument, warn};

use super::disk::DiskTier;
use super::error::CacheResult;
use super::l1::L1Cache;
use crate::hashing::hash_embedding_key;

/// Which tier answered a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheTier {
    Memory,
    Disk,
}

/// Lookup counters, readable while the cache is in use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub memory_hits: u64,
    pub disk_hits: u64,
    pub misses: u64,
    pub disk_errors: u64,
    pub memory_entries: u64,
}

#[derive(Debug, Default)]
struct Counters {
    memory_hits: AtomicU64,
    disk_hits: AtomicU64,
    misses: AtomicU64,
    disk_errors: AtomicU64,
}

/// Embedding cache keyed by `(model id, normalized text)`.
///
/// Lookups try memory first, then disk; disk hits are promoted into memory. Entries are
/// append-only: a key always maps to the first vector stored for it in this process.
#[derive(Debug)]
pub struct EmbeddingCache {
    model_id: String,
    l1: L1Cache,
    disk: Option<DiskTier>,
    counters: Counters,
}

impl EmbeddingCache {
    /// Memory-only cache.
    pub fn memory_only(model_id: impl Into<String>, l1_capacity: u64) -> Self {
        Self {
            model_id: model_id.into(),
            l1: L1Cache::with_capacity(l1_capacity),
            disk: None,
            counters: Counters::default(),
        }
    }

    /// Cache backed by `dir`, which is created if missing.
    pub fn with_disk(
        model_id: impl Into<String>,
        l1_capacity: u64,
        dir: impl Into<PathBuf>,
    ) -> CacheResult<Self> {
        let disk = DiskTier::new(dir);
        disk.ensure_dir()?;
        Ok(Self {
            disk: Some(disk),
            ..Self::memory_only(model_id, l1_capacity)
        })
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn disk(&self) -> Option<&DiskTier> {
        self.disk.as_ref()
    }

    /// Cache key for already-normalized text.
    #[inline]
    pub fn key(&self, normalized_text: &str) -> [u8; 32] {
        hash_embedding_key(&self.model_id, normalized_text)
    }

    /// Looks up the vector for `normalized_text`.
    ///
    /// Disk read failures other than a corrupt payload are returned so the caller can
    /// decide whether to fall back to the encoder.
    #[instrument(skip(self, normalized_text), fields(text_len = normalized_text.len()))]
    pub fn get(&self, normalized_text: &str) -> CacheResult<Option<(Arc<[f32]>, CacheTier)>> {
        let key = self.key(normalized_text);

        if let Some(vector) = self.l1.get(&key) {
            self.counters.memory_hits.fetch_add(1, Ordering::Relaxed);
            return Ok(Some((vector, CacheTier::Memory)));
        }

        let Some(disk) = &self.disk else {
            self.counters.misses.fetch_add(1, Ordering::Relaxed);
            return Ok(None);
        };

        match disk.load(&key) {
            Ok(Some(vector)) => {
                debug!("Disk cache hit, promoting to memory");
                self.counters.disk_hits.fetch_add(1, Ordering::Relaxed);
                let stored = self.l1.insert_if_absent(key, Arc::from(vector));
                Ok(Some((stored, CacheTier::Disk)))
            }
            Ok(None) => {
                self.counters.misses.fetch_add(1, Ordering::Relaxed);
                Ok(None)
            }
            Err(e) => {
                self.counters.disk_errors.fetch_add(1, Ordering::Relaxed);
                Err(e)
            }
        }
    }

    /// Records `vector` for `normalized_text` and returns the vector now held in memory.
    ///
    /// Only a vector that actually entered memory is persisted. The disk write is best effort: failures are logged and counted, never returned.
    #[instrument(skip(self, normalized_text, vector), fields(text_len = normalized_text.len(), dim = vector.len()))]
    pub fn put(&self, normalized_text: &str, vector: Vec<f32>) -> Arc<[f32]> {
        let key = self.key(normalized_text);
        let candidate: Arc<[f32]> = Arc::from(vector);
        let stored = self.l1.insert_if_absent(key, Arc::clone(&candidate));
        // Memory already held a vector for this key; its record is written or loaded.
        if !Arc::ptr_eq(&stored, &candidate) {
            return stored;
        }

        if let Some(disk) = &self.disk
            && let Err(e) = disk.store(&key, &stored)
        {
            self.counters.disk_errors.fetch_add(1, Ordering::Relaxed);
            warn!(error = %e, "Failed to persist embedding");
        }

        stored
    }

    pub fn stats(&self) -> CacheStats {
        self.l1.run_pending_tasks();
        CacheStats {
            memory_hits: self.counters.memory_hits.load(Ordering::Relaxed),
            disk_hits: self.counters.disk_hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            disk_errors: self.counters.disk_errors.load(Ordering::Relaxed),
            memory_entries: self.l1.len(),
        }
    }

    /// Drops the memory tier; disk records stay.
    pub fn clear_memory(&self) {
        self.l1.clear();
    }
}
