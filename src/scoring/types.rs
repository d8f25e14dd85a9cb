use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};

use crate::vectordb::CandidateSource;

/// Provenance of a suggestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuggestionSource {
    Seed,
    Taxonomy,
    /// Cluster whose members came from these pools.
    Merged(BTreeSet<CandidateSource>),
}

impl SuggestionSource {
    /// Pools that contributed to this suggestion.
    pub fn tags(&self) -> BTreeSet<CandidateSource> {
        match self {
            SuggestionSource::Seed => BTreeSet::from([CandidateSource::Seed]),
            SuggestionSource::Taxonomy => BTreeSet::from([CandidateSource::Taxonomy]),
            SuggestionSource::Merged(tags) => tags.clone(),
        }
    }

    /// Union of two provenances.
    pub fn merge(&self, other: &SuggestionSource) -> SuggestionSource {
        let mut tags = self.tags();
        tags.extend(other.tags());
        SuggestionSource::Merged(tags)
    }

    pub fn contains(&self, source: CandidateSource) -> bool {
        match self {
            SuggestionSource::Seed => source == CandidateSource::Seed,
            SuggestionSource::Taxonomy => source == CandidateSource::Taxonomy,
            SuggestionSource::Merged(tags) => tags.contains(&source),
        }
    }
}

impl From<CandidateSource> for SuggestionSource {
    fn from(source: CandidateSource) -> Self {
        match source {
            CandidateSource::Seed => SuggestionSource::Seed,
            CandidateSource::Taxonomy => SuggestionSource::Taxonomy,
        }
    }
}

/// Renders as comma-joined tags: `seed`, `ndc`, `seed,ndc`.
impl fmt::Display for SuggestionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, tag) in self.tags().iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            f.write_str(tag.tag())?;
        }
        Ok(())
    }
}

impl Serialize for SuggestionSource {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A scored label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    pub label: String,
    /// Final score in `[0, 1]`.
    pub score: f32,
    pub source: SuggestionSource,
    /// Other labels folded into this one by clustering, in merge order.
    pub aliases: Vec<String>,
    /// Label embedding, used by the clusterer. `None` never merges.
    #[serde(skip)]
    pub vector: Option<Arc<[f32]>>,
}

impl Suggestion {
    pub fn new(label: impl Into<String>, score: f32, source: SuggestionSource) -> Self {
        Self {
            label: label.into(),
            score,
            source,
            aliases: Vec::new(),
            vector: None,
        }
    }

    pub fn with_vector(mut self, vector: Arc<[f32]>) -> Self {
        self.vector = Some(vector);
        self
    }

    /// `"label"`, or `"label (similar: a, b)"` when aliases exist.
    pub fn display_label(&self) -> String {
        if self.aliases.is_empty() {
            self.label.clone()
        } else {
            format!("{} (similar: {})", self.label, self.aliases.join(", "))
        }
    }
}

/// Breakdown of one candidate's final score.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScoreDetail {
    pub label: String,
    /// Cosine similarity floored at 0.
    pub base: f32,
    /// Keyword bonus in `[0, BONUS_CAP]`; 0 when the label has no rules.
    pub bonus: f32,
    pub strong_hits: usize,
    pub weak_hits: usize,
    pub anti_hits: usize,
    pub damped: bool,
    pub final_score: f32,
}

/// Sorts by descending score, ties by ascending label.
pub fn sort_suggestions(suggestions: &mut [Suggestion]) {
    suggestions.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.label.cmp(&b.label)));
}
