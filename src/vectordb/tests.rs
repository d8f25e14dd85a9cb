use std::sync::Arc;
use std::thread;

use super::*;

fn seed(label: &str, vector: &[f32]) -> Candidate {
    Candidate::new(label, Arc::from(vector), CandidateSource::Seed)
}

fn labels(hits: &[Hit<'_>]) -> Vec<String> {
    hits.iter().map(|h| h.candidate.label.clone()).collect()
}

#[test]
fn test_cosine_self_similarity_is_one() {
    for v in [vec![1.0, 2.0, 3.0], vec![-0.5, 0.25], vec![1e-3; 64]] {
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }
}

#[test]
fn test_cosine_is_symmetric() {
    let a = [0.3, -0.7, 0.2, 0.9];
    let b = [0.1, 0.4, -0.6, 0.5];
    assert_eq!(cosine_similarity(&a, &b), cosine_similarity(&b, &a));
}

#[test]
fn test_cosine_zero_norm_is_zero() {
    assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    assert_eq!(cosine_similarity(&[], &[]), 0.0);
}

#[test]
fn test_cosine_orthogonal_and_opposite() {
    assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-7);
    assert!((cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]) + 1.0).abs() < 1e-7);
}

#[test]
fn test_checked_cosine_policies() {
    assert!(matches!(
        checked_cosine(&[1.0, 0.0, 5.0], &[1.0, 0.0], DimensionPolicy::Strict),
        Err(VectorDbError::DimensionMismatch {
            expected: 2,
            actual: 3
        })
    ));

    let truncated = checked_cosine(&[1.0, 0.0, 5.0], &[1.0, 0.0], DimensionPolicy::Truncate)
        .expect("truncate never fails");
    assert!((truncated - 1.0).abs() < 1e-6);
}

#[test]
fn test_dimension_policy_parse() {
    assert_eq!(DimensionPolicy::parse("STRICT"), Some(DimensionPolicy::Strict));
    assert_eq!(
        DimensionPolicy::parse(" truncate "),
        Some(DimensionPolicy::Truncate)
    );
    assert_eq!(DimensionPolicy::parse("loose"), None);
}

#[test]
fn test_search_orders_descending_and_bounds_k() {
    let set = CandidateSet::new(vec![
        seed("low", &[0.0, 1.0]),
        seed("high", &[1.0, 0.0]),
        seed("mid", &[1.0, 1.0]),
    ])
    .expect("valid set");

    let hits = set
        .search(&[1.0, 0.0], 2, DimensionPolicy::Strict)
        .expect("search");
    assert_eq!(labels(&hits), vec!["high", "mid"]);
    assert!(hits[0].score >= hits[1].score);

    let all = set
        .search(&[1.0, 0.0], 10, DimensionPolicy::Strict)
        .expect("search");
    assert_eq!(all.len(), 3);
}

#[test]
fn test_search_ties_break_by_label() {
    let set = CandidateSet::new(vec![
        seed("zeta", &[1.0, 0.0]),
        seed("alpha", &[1.0, 0.0]),
        seed("mu", &[1.0, 0.0]),
    ])
    .expect("valid set");

    let hits = set
        .search(&[2.0, 0.0], 2, DimensionPolicy::Strict)
        .expect("search");
    assert_eq!(labels(&hits), vec!["alpha", "mu"]);
}

#[test]
fn test_search_degenerate_inputs_are_empty() {
    let set = CandidateSet::new(vec![seed("a", &[1.0, 0.0])]).expect("valid set");

    assert!(set.search(&[1.0, 0.0], 0, DimensionPolicy::Strict).expect("k=0").is_empty());
    assert!(set.search(&[], 3, DimensionPolicy::Strict).expect("empty query").is_empty());
    assert!(
        CandidateSet::empty()
            .search(&[1.0], 3, DimensionPolicy::Strict)
            .expect("empty set")
            .is_empty()
    );
}

#[test]
fn test_search_strict_rejects_wrong_dimension() {
    let set = CandidateSet::new(vec![seed("a", &[1.0, 0.0])]).expect("valid set");
    assert!(matches!(
        set.search(&[1.0, 0.0, 0.0], 3, DimensionPolicy::Strict),
        Err(VectorDbError::DimensionMismatch { .. })
    ));
    assert_eq!(
        set.search(&[1.0, 0.0, 0.0], 3, DimensionPolicy::Truncate)
            .expect("truncate")
            .len(),
        1
    );
}

#[test]
fn test_search_heap_matches_full_sort() {
    let candidates: Vec<Candidate> = (0..50)
        .map(|i| {
            let angle = i as f32 * 0.37;
            seed(&format!("label-{i:02}"), &[angle.cos(), angle.sin(), 0.1])
        })
        .collect();
    let set = CandidateSet::new(candidates).expect("valid set");
    let query = [0.6, 0.8, 0.0];

    let top = set.search(&query, 7, DimensionPolicy::Strict).expect("search");
    let full = set.score_all(&query, DimensionPolicy::Strict).expect("score all");

    assert_eq!(labels(&top), labels(&full[..7]));
    assert!(full.windows(2).all(|w| w[0].score >= w[1].score));
}

#[test]
fn test_set_rejects_inconsistent_dimensions() {
    let result = CandidateSet::new(vec![seed("a", &[1.0, 0.0]), seed("b", &[1.0])]);
    assert!(matches!(
        result,
        Err(VectorDbError::InconsistentDimensions { ref label, expected: 2, actual: 1 }) if label == "b"
    ));

    assert!(matches!(
        CandidateSet::new(vec![seed("empty", &[])]),
        Err(VectorDbError::EmptyVector { .. })
    ));
}

#[test]
fn test_candidate_key_is_normalized() {
    let c = seed("  ＶＲ  Space ", &[1.0]);
    assert_eq!(c.key, "vr space");
    assert_eq!(c.label, "  ＶＲ  Space ");
}

#[test]
fn test_store_replace_keeps_old_set_on_error() {
    let store = CandidateStore::new();
    assert!(store.is_empty());

    store
        .replace(vec![seed("a", &[1.0, 0.0]), seed("b", &[0.0, 1.0])])
        .expect("replace");
    let before = store.snapshot();

    assert!(store.replace(vec![seed("c", &[1.0]), seed("d", &[1.0, 2.0])]).is_err());
    assert_eq!(store.len(), 2);
    assert!(Arc::ptr_eq(&before, &store.snapshot()));

    store.clear();
    assert!(store.is_empty());
    assert_eq!(before.len(), 2);
}

#[test]
fn test_store_readers_see_complete_sets() {
    let store = Arc::new(CandidateStore::new());
    let small: Vec<Candidate> = (0..3).map(|i| seed(&format!("s{i}"), &[1.0, i as f32])).collect();
    let large: Vec<Candidate> = (0..9).map(|i| seed(&format!("l{i}"), &[1.0, i as f32])).collect();
    store.replace(small.clone()).expect("replace");

    let writer = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            for round in 0..200 {
                let set = if round % 2 == 0 { large.clone() } else { small.clone() };
                store.replace(set).expect("replace");
            }
        })
    };

    for _ in 0..200 {
        let len = store.snapshot().len();
        assert!(len == 3 || len == 9, "observed partial set of {len}");
    }
    writer.join().expect("writer thread");
}
