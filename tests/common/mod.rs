//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use categorizer::cache::EmbeddingCache;
use categorizer::config::RankingConfig;
use categorizer::embedding::{Embedder, MockEmbedder};
use categorizer::ranking::RankingService;
use categorizer::scoring::RuleBook;
use categorizer::taxonomy::TaxonomyEntry;

pub const DIM: usize = 3;

pub type MockService = RankingService<Arc<MockEmbedder>>;

/// Embedder with fixed vectors for the seed, taxonomy and query texts used below.
pub fn fixture_embedder() -> Arc<MockEmbedder> {
    Arc::new(
        MockEmbedder::new(DIM)
            .with_vector("vr space", vec![1.0, 0.0, 0.0])
            .with_vector("metaverse", vec![0.98, 0.199, 0.0])
            .with_vector("education", vec![0.0, 0.5, 0.866_025_4])
            .with_vector("immersive world", vec![0.8, 0.6, 0.0])
            .with_vector("lesson plans for schools", vec![0.1, 0.3, 0.95])
            .with_vector("000 general works", vec![0.0, 1.0, 0.0])
            .with_vector("007 information science", vec![0.6, 0.8, 0.0]),
    )
}

pub fn fixture_taxonomy() -> Vec<TaxonomyEntry> {
    vec![
        TaxonomyEntry::new("000", "General works"),
        TaxonomyEntry::new("007", "Information science"),
    ]
}

pub fn memory_service(embedder: Arc<MockEmbedder>, config: RankingConfig) -> MockService {
    let cache = EmbeddingCache::memory_only(embedder.model_id(), 1_000);
    RankingService::new(embedder, cache, config, RuleBook::empty())
}

pub fn disk_service(embedder: Arc<MockEmbedder>, config: RankingConfig, dir: &Path) -> MockService {
    let cache = EmbeddingCache::with_disk(embedder.model_id(), 1_000, dir).expect("disk cache");
    RankingService::new(embedder, cache, config, RuleBook::empty())
}

/// Service with the fixture seeds and taxonomy loaded.
pub fn loaded_service(config: RankingConfig) -> (MockService, Arc<MockEmbedder>) {
    let embedder = fixture_embedder();
    let service = memory_service(Arc::clone(&embedder), config);
    service
        .load_seeds(["VR space", "metaverse", "education"])
        .expect("seeds");
    service
        .load_taxonomy(&fixture_taxonomy())
        .expect("taxonomy");
    (service, embedder)
}

pub fn assert_sorted_desc(scores: &[f32]) {
    for pair in scores.windows(2) {
        assert!(pair[0] >= pair[1], "scores not descending: {scores:?}");
    }
}
