//! Disk tier behaviour across service instances.

mod common;

use std::fs;
use std::sync::Arc;

use categorizer::cache::{CacheError, EmbeddingCache};
use categorizer::config::RankingConfig;
use categorizer::embedding::Embedder;
use categorizer::ranking::RankingError;
use categorizer::text::normalize_text;
use tempfile::TempDir;

use common::{disk_service, fixture_embedder};

#[test]
fn test_second_run_reuses_disk_embeddings() {
    let dir = TempDir::new().expect("tempdir");

    let first = fixture_embedder();
    let service = disk_service(Arc::clone(&first), RankingConfig::default(), dir.path());
    service.load_seeds(["VR space", "education"]).expect("seeds");
    service.rank_one("Immersive world").expect("rank");
    assert_eq!(first.texts_embedded(), 3);

    let second = fixture_embedder();
    let service = disk_service(Arc::clone(&second), RankingConfig::default(), dir.path());
    service.load_seeds(["VR space", "education"]).expect("seeds");
    let row = service.rank_one("Immersive world").expect("rank");

    assert_eq!(second.call_count(), 0);
    assert_eq!(row.suggestions[0].label, "VR space");
    let stats = service.cache().stats();
    assert_eq!(stats.disk_hits, 3);
    assert_eq!(stats.misses, 0);
}

#[test]
fn test_seed_batch_embeds_misses_in_one_call() {
    let dir = TempDir::new().expect("tempdir");
    let embedder = fixture_embedder();
    let service = disk_service(Arc::clone(&embedder), RankingConfig::default(), dir.path());

    service
        .load_seeds(["VR space", "metaverse", "education", "vr SPACE"])
        .expect("seeds");

    assert_eq!(service.seed_count(), 3);
    assert_eq!(embedder.call_count(), 1);
    assert_eq!(embedder.texts_embedded(), 3);
}

#[test]
fn test_corrupt_record_is_recomputed_and_rewritten() {
    let dir = TempDir::new().expect("tempdir");
    let embedder = fixture_embedder();
    let cache = EmbeddingCache::with_disk(embedder.model_id(), 100, dir.path()).expect("cache");
    let text = normalize_text("VR space");
    cache.put(&text, vec![1.0, 0.0, 0.0]);

    let path = cache
        .disk()
        .expect("disk tier")
        .entry_path(&cache.key(&text));
    // Header declares 3 floats, payload holds 1.
    let mut bytes = 3u32.to_le_bytes().to_vec();
    bytes.extend_from_slice(&1.0f32.to_le_bytes());
    fs::write(&path, bytes).expect("corrupt record");

    let service = disk_service(Arc::clone(&embedder), RankingConfig::default(), dir.path());
    service.load_seeds(["VR space"]).expect("seeds");

    assert_eq!(embedder.texts_embedded(), 1);
    assert_eq!(fs::metadata(&path).expect("record").len(), 4 + 3 * 4);
}

#[test]
fn test_truncated_header_surfaces_as_cache_error() {
    let dir = TempDir::new().expect("tempdir");
    let embedder = fixture_embedder();
    let service = disk_service(Arc::clone(&embedder), RankingConfig::default(), dir.path());

    let text = normalize_text("VR space");
    let path = service
        .cache()
        .disk()
        .expect("disk tier")
        .entry_path(&service.cache().key(&text));
    fs::write(&path, [0u8, 1]).expect("truncated record");

    let result = service.load_seeds(["VR space"]);
    assert!(matches!(
        result,
        Err(RankingError::Cache(CacheError::TruncatedHeader { len: 2, .. }))
    ));

    let purged = service.cache().disk().expect("disk tier").purge().expect("purge");
    assert_eq!(purged, 1);
    assert_eq!(service.load_seeds(["VR space"]).expect("seeds"), 1);
}

#[test]
fn test_model_id_namespaces_records() {
    let dir = TempDir::new().expect("tempdir");
    let a = EmbeddingCache::with_disk("model-a", 100, dir.path()).expect("cache");
    let b = EmbeddingCache::with_disk("model-b", 100, dir.path()).expect("cache");

    a.put("vr space", vec![1.0, 0.0]);

    assert!(a.get("vr space").expect("lookup").is_some());
    assert!(b.get("vr space").expect("lookup").is_none());
}
