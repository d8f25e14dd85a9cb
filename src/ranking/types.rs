use serde::Serialize;

use crate::scoring::{ScoreDetail, Suggestion};

/// Ranking outcome for one input text.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResultRow {
    /// Input text as given.
    pub text: String,
    /// Seed ranking, or the merged ranking in mixed mode.
    pub suggestions: Vec<Suggestion>,
    /// Taxonomy ranking; populated in split mode only.
    pub taxonomy_suggestions: Vec<Suggestion>,
    pub need_review: bool,
    /// Score breakdown of the top seed candidates.
    pub details: Vec<ScoreDetail>,
}

impl ResultRow {
    /// Row for a text with nothing to rank.
    pub fn needs_review(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            need_review: true,
            ..Self::default()
        }
    }

    pub fn top(&self) -> Option<&Suggestion> {
        self.suggestions.first()
    }
}
