//! Mode-specific combination of the seed and taxonomy rankings.

use crate::cluster::cluster;
use crate::config::{Mode, RankingConfig};
use crate::scoring::{Suggestion, sort_suggestions};

/// Lists returned to the caller after combination.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Combined {
    pub suggestions: Vec<Suggestion>,
    pub taxonomy_suggestions: Vec<Suggestion>,
}

/// Clusters the whole scored pool when enabled, then sorts and truncates to top-k.
fn finish(mut list: Vec<Suggestion>, config: &RankingConfig) -> Vec<Suggestion> {
    sort_suggestions(&mut list);
    if config.cluster.enabled {
        list = cluster(list, config.cluster.threshold);
        sort_suggestions(&mut list);
    }
    list.truncate(config.top_k);
    list
}

/// Combines seed and taxonomy suggestions according to `config.mode`.
///
/// - Seeded: seeds only.
/// - Mixed: both pools concatenated, then clustered, sorted and truncated as one list.
/// - Split: each pool finished independently; the lists never mix.
pub fn combine(
    config: &RankingConfig,
    seeds: Vec<Suggestion>,
    taxonomy: Vec<Suggestion>,
) -> Combined {
    match config.mode {
        Mode::Seeded => Combined {
            suggestions: finish(seeds, config),
            taxonomy_suggestions: Vec::new(),
        },
        Mode::Mixed => {
            let mut merged = seeds;
            merged.extend(taxonomy);
            Combined {
                suggestions: finish(merged, config),
                taxonomy_suggestions: Vec::new(),
            }
        }
        Mode::Split => Combined {
            suggestions: finish(seeds, config),
            taxonomy_suggestions: finish(taxonomy, config),
        },
    }
}
