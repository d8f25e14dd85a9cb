use std::sync::Arc;

use super::*;
use crate::vectordb::CandidateSource;

fn sug(label: &str, score: f32, vector: &[f32]) -> Suggestion {
    Suggestion::new(label, score, SuggestionSource::Seed).with_vector(Arc::from(vector))
}

fn labels(out: &[Suggestion]) -> Vec<&str> {
    out.iter().map(|s| s.label.as_str()).collect()
}

#[test]
fn test_near_duplicates_merge_with_aliases() {
    let input = vec![
        sug("VR space", 0.9, &[1.0, 0.0]),
        sug("education", 0.7, &[0.0, 1.0]),
        sug("metaverse", 0.8, &[0.99, 0.05]),
        sug("virtual world", 0.6, &[0.98, 0.1]),
    ];

    let out = cluster(input, 0.8);

    assert_eq!(labels(&out), vec!["VR space", "education"]);
    assert_eq!(out[0].aliases, vec!["metaverse", "virtual world"]);
    assert_eq!(
        out[0].display_label(),
        "VR space (similar: metaverse, virtual world)"
    );
    assert!(out[1].aliases.is_empty());
}

#[test]
fn test_higher_scoring_member_becomes_representative() {
    let input = vec![
        sug("metaverse", 0.5, &[1.0, 0.0]),
        sug("VR space", 0.9, &[1.0, 0.01]),
    ];

    let out = cluster(input, 0.9);

    assert_eq!(out.len(), 1);
    assert_eq!(out[0].label, "VR space");
    assert_eq!(out[0].score, 0.9);
    assert_eq!(out[0].aliases, vec!["metaverse"]);
}

#[test]
fn test_equal_scores_keep_first_seen_representative() {
    let input = vec![
        sug("zeta", 0.7, &[1.0, 0.0]),
        sug("alpha", 0.7, &[1.0, 0.0]),
    ];

    let out = cluster(input, 0.9);
    assert_eq!(out[0].label, "zeta");
    assert_eq!(out[0].aliases, vec!["alpha"]);
}

#[test]
fn test_tau_one_never_merges_distinct_vectors() {
    let input = vec![
        sug("a", 0.9, &[1.0, 0.0]),
        sug("b", 0.8, &[0.999, 0.04]),
        sug("c", 0.7, &[0.0, 1.0]),
    ];

    let out = cluster(input, 1.0);
    assert_eq!(out.len(), 3);
    assert!(out.iter().all(|s| s.aliases.is_empty()));
}

#[test]
fn test_non_positive_tau_is_noop() {
    let input = vec![sug("a", 0.9, &[1.0, 0.0]), sug("b", 0.8, &[1.0, 0.0])];

    assert_eq!(cluster(input.clone(), 0.0), input);
    assert_eq!(cluster(input.clone(), -0.5), input);
    assert_eq!(cluster(input.clone(), f32::NAN), input);
}

#[test]
fn test_suggestions_without_vector_stay_singletons() {
    let input = vec![
        sug("VR space", 0.9, &[1.0, 0.0]),
        Suggestion::new("VR space copy", 0.8, SuggestionSource::Seed),
        sug("metaverse", 0.7, &[1.0, 0.0]),
    ];

    let out = cluster(input, 0.5);
    assert_eq!(labels(&out), vec!["VR space", "VR space copy"]);
    assert_eq!(out[0].aliases, vec!["metaverse"]);
}

#[test]
fn test_merged_source_records_both_pools() {
    let input = vec![
        sug("VR space", 0.9, &[1.0, 0.0]),
        Suggestion::new("007 information science", 0.6, SuggestionSource::Taxonomy)
            .with_vector(Arc::from(vec![1.0f32, 0.0])),
    ];

    let out = cluster(input, 0.8);
    assert_eq!(out.len(), 1);
    assert!(out[0].source.contains(CandidateSource::Seed));
    assert!(out[0].source.contains(CandidateSource::Taxonomy));
    assert_eq!(out[0].source.to_string(), "seed,ndc");
}

#[test]
fn test_output_resorted_by_score() {
    let input = vec![
        sug("low", 0.2, &[0.0, 1.0]),
        sug("high", 0.9, &[1.0, 0.0]),
    ];

    let out = cluster(input, 0.95);
    assert_eq!(labels(&out), vec!["high", "low"]);
}
