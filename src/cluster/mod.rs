//! Greedy online merge of near-duplicate suggestions.
//!
//! Each suggestion is compared with the representative vector of every open cluster,
//! in cluster creation order, and joins the first one within `tau`. The representative
//! is the highest-scoring member; on equal scores the earlier member keeps the role.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use crate::scoring::{Suggestion, SuggestionSource, sort_suggestions};
use crate::vectordb::cosine_similarity;

#[cfg(test)]
mod tests;

struct Cluster {
    representative: Suggestion,
    /// Member labels and carried aliases, in arrival order.
    names: Vec<String>,
    source: SuggestionSource,
}

impl Cluster {
    fn open(suggestion: Suggestion) -> Self {
        let mut names = vec![suggestion.label.clone()];
        names.extend(suggestion.aliases.iter().cloned());
        Self {
            source: suggestion.source.clone(),
            representative: suggestion,
            names,
        }
    }

    fn vector(&self) -> Option<&Arc<[f32]>> {
        self.representative.vector.as_ref()
    }

    fn absorb(&mut self, suggestion: Suggestion) {
        self.source = self.source.merge(&suggestion.source);
        self.names.push(suggestion.label.clone());
        self.names.extend(suggestion.aliases.iter().cloned());
        if suggestion.score > self.representative.score {
            self.representative = suggestion;
        }
    }

    fn finish(self) -> Suggestion {
        let merged = self.names.len() > 1;
        let mut rep = self.representative;
        if !merged {
            return rep;
        }

        let mut seen = HashSet::from([rep.label.clone()]);
        rep.aliases = self
            .names
            .into_iter()
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty() && seen.insert(name.clone()))
            .collect();
        rep.source = self.source;
        rep
    }
}

/// Merges suggestions whose label vectors have cosine similarity `>= tau`.
///
/// `tau <= 0` or NaN returns the input unchanged. Suggestions without a vector always
/// form singleton clusters. The result is sorted by descending score; truncation is
/// left to the caller.
pub fn cluster(suggestions: Vec<Suggestion>, tau: f32) -> Vec<Suggestion> {
    if suggestions.len() <= 1 || tau.is_nan() || tau <= 0.0 {
        return suggestions;
    }

    let input = suggestions.len();
    let mut clusters: Vec<Cluster> = Vec::with_capacity(input);

    for suggestion in suggestions {
        let target = suggestion.vector.as_ref().and_then(|vector| {
            clusters.iter().position(|c| {
                c.vector()
                    .is_some_and(|rep| cosine_similarity(vector, rep) >= tau)
            })
        });

        match target {
            Some(index) => clusters[index].absorb(suggestion),
            None => clusters.push(Cluster::open(suggestion)),
        }
    }

    let mut out: Vec<Suggestion> = clusters.into_iter().map(Cluster::finish).collect();
    sort_suggestions(&mut out);
    debug!(input, clusters = out.len(), tau, "Clustered suggestions");
    out
}
