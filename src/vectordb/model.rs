use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::text::normalize_key;

/// Pool a candidate label belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidateSource {
    /// User-supplied category.
    Seed,
    /// Built-in NDC dictionary entry.
    Taxonomy,
}

impl CandidateSource {
    /// Short tag used in exports.
    pub fn tag(self) -> &'static str {
        match self {
            CandidateSource::Seed => "seed",
            CandidateSource::Taxonomy => "ndc",
        }
    }
}

impl fmt::Display for CandidateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A label with its embedding. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Display form.
    pub label: String,
    /// Case/width-normalized identity used for dedup, rules and tie-break bias.
    pub key: String,
    pub vector: Arc<[f32]>,
    pub source: CandidateSource,
}

impl Candidate {
    /// Builds a candidate, deriving `key` from `label`.
    pub fn new(label: impl Into<String>, vector: Arc<[f32]>, source: CandidateSource) -> Self {
        let label = label.into();
        let key = normalize_key(&label);
        Self {
            label,
            key,
            vector,
            source,
        }
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.vector.len()
    }
}

/// A candidate scored against a query.
#[derive(Debug, Clone, Copy)]
pub struct Hit<'a> {
    pub candidate: &'a Candidate,
    /// Raw cosine similarity in `[-1, 1]`.
    pub score: f32,
}
