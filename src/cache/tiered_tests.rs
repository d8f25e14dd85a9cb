use super::*;
use tempfile::TempDir;

#[test]
fn test_memory_only_put_then_get() {
    let cache = EmbeddingCache::memory_only("m", 100);
    assert!(cache.get("vr").expect("get").is_none());

    cache.put("vr", vec![1.0, 0.0]);
    let (vector, tier) = cache.get("vr").expect("get").expect("hit");
    assert_eq!(&*vector, &[1.0, 0.0]);
    assert_eq!(tier, CacheTier::Memory);

    let stats = cache.stats();
    assert_eq!(stats.memory_hits, 1);
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.memory_entries, 1);
}

#[test]
fn test_put_is_append_only_in_memory() {
    let cache = EmbeddingCache::memory_only("m", 100);
    let first = cache.put("same", vec![1.0]);
    let second = cache.put("same", vec![2.0]);

    assert_eq!(&*first, &[1.0]);
    assert_eq!(&*second, &[1.0]);
}

#[test]
fn test_repeat_put_skips_disk_write() {
    let dir = TempDir::new().expect("temp dir");
    let cache = EmbeddingCache::with_disk("m", 100, dir.path()).expect("cache");
    let key = cache.key("same");
    let disk = cache.disk().expect("disk tier");

    cache.put("same", vec![1.0]);
    assert!(disk.exists(&key));
    std::fs::remove_file(disk.entry_path(&key)).expect("remove");

    let second = cache.put("same", vec![2.0]);
    assert_eq!(&*second, &[1.0]);
    assert!(!disk.exists(&key));
}

#[test]
fn test_model_id_namespaces_keys() {
    let a = EmbeddingCache::memory_only("model-a", 10);
    let b = EmbeddingCache::memory_only("model-b", 10);
    assert_ne!(a.key("text"), b.key("text"));
}

#[test]
fn test_disk_hit_after_memory_cleared() {
    let dir = TempDir::new().expect("temp dir");
    let cache = EmbeddingCache::with_disk("m", 100, dir.path()).expect("cache");

    cache.put("education", vec![0.25, 0.5, 0.75]);
    cache.clear_memory();

    let (vector, tier) = cache.get("education").expect("get").expect("hit");
    assert_eq!(tier, CacheTier::Disk);
    assert_eq!(&*vector, &[0.25, 0.5, 0.75]);

    let (_, tier) = cache.get("education").expect("get").expect("hit");
    assert_eq!(tier, CacheTier::Memory);
}

#[test]
fn test_disk_survives_new_instance() {
    let dir = TempDir::new().expect("temp dir");
    {
        let cache = EmbeddingCache::with_disk("m", 100, dir.path()).expect("cache");
        cache.put("avatar", vec![0.1; 8]);
    }

    let reopened = EmbeddingCache::with_disk("m", 100, dir.path()).expect("cache");
    let (vector, _) = reopened.get("avatar").expect("get").expect("hit");
    assert_eq!(vector.len(), 8);
    assert_eq!(reopened.stats().disk_hits, 1);
}

#[test]
fn test_corrupt_disk_record_is_rewritten() {
    let dir = TempDir::new().expect("temp dir");
    let cache = EmbeddingCache::with_disk("m", 100, dir.path()).expect("cache");
    let key = cache.key("broken");
    let disk = cache.disk().expect("disk tier");

    std::fs::write(disk.entry_path(&key), [3, 0, 0, 0, 1, 2]).expect("write");
    assert!(cache.get("broken").expect("get").is_none());

    cache.put("broken", vec![4.0]);
    assert_eq!(disk.load(&key).expect("load"), Some(vec![4.0]));
}

#[test]
fn test_truncated_disk_record_surfaces_error() {
    let dir = TempDir::new().expect("temp dir");
    let cache = EmbeddingCache::with_disk("m", 100, dir.path()).expect("cache");
    let key = cache.key("tiny");
    let disk = cache.disk().expect("disk tier");

    std::fs::write(disk.entry_path(&key), [1]).expect("write");
    assert!(matches!(
        cache.get("tiny"),
        Err(CacheError::TruncatedHeader { .. })
    ));
    assert_eq!(cache.stats().disk_errors, 1);
}
