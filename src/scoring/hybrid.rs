//! Cosine similarity blended with keyword rule bonuses.

use tracing::trace;

use super::rules::{RuleBook, RuleHits};
use super::types::{ScoreDetail, Suggestion, SuggestionSource, sort_suggestions};
use crate::constants::{BONUS_BLEND_BETA, BONUS_CAP, COSINE_BLEND_ALPHA, STRONG_HIT_FLOOR};
use crate::hashing::tie_break_bias;
use crate::vectordb::{CandidateSource, Hit};

/// Per-pool weighting applied by [`HybridScorer::score`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceWeighting {
    /// Multiplies the cosine of labels scored without rules.
    pub weight: f32,
    /// Added after weighting.
    pub bias: f32,
}

impl SourceWeighting {
    pub fn new(weight: f32, bias: f32) -> Self {
        Self { weight, bias }
    }
}

/// Output of one scoring pass, both lists sorted the same way.
#[derive(Debug, Clone, Default)]
pub struct ScoredBatch {
    pub suggestions: Vec<Suggestion>,
    pub details: Vec<ScoreDetail>,
}

/// Scores search hits against the rules of a [`RuleBook`].
#[derive(Debug, Clone, Copy)]
pub struct HybridScorer<'r> {
    rules: &'r RuleBook,
}

impl<'r> HybridScorer<'r> {
    pub fn new(rules: &'r RuleBook) -> Self {
        Self { rules }
    }

    /// Scores `hits` for `normalized_text`.
    ///
    /// When the book has rules, every seed blends `alpha * base + beta * bonus / cap`
    /// (bonus 0 for labels without a rule set) and is floored at [`STRONG_HIT_FLOOR`]
    /// on any strong hit. Taxonomy labels, and seeds under an empty book, score
    /// `base * weight`. Each score then gets the bias, the tie-break offset, and
    /// damping, and is clamped to `[0, 1]`.
    pub fn score(
        &self,
        normalized_text: &str,
        hits: &[Hit<'_>],
        weighting: SourceWeighting,
    ) -> ScoredBatch {
        let mut details = Vec::with_capacity(hits.len());
        let mut damping_triggered = false;

        for hit in hits {
            let candidate = hit.candidate;
            let base = hit.score.clamp(0.0, 1.0);
            let blended = candidate.source == CandidateSource::Seed && !self.rules.is_empty();

            let (mut score, hits_found, bonus) = if blended {
                let found = self
                    .rules
                    .get(&candidate.key)
                    .map(|rules| rules.count_hits(normalized_text))
                    .unwrap_or_default();
                let bonus = found.bonus();
                let mut score =
                    COSINE_BLEND_ALPHA * base + BONUS_BLEND_BETA * (bonus / BONUS_CAP);
                if found.strong > 0 {
                    score = score.max(STRONG_HIT_FLOOR);
                }
                (score, found, bonus)
            } else {
                (base * weighting.weight, RuleHits::default(), 0.0)
            };

            score += weighting.bias + tie_break_bias(&candidate.key);
            score = score.clamp(0.0, 1.0);

            if hits_found.strong > 0
                && self
                    .rules
                    .damping()
                    .is_some_and(|d| d.is_signal(&candidate.key))
            {
                damping_triggered = true;
            }

            details.push(ScoreDetail {
                label: candidate.label.clone(),
                base,
                bonus,
                strong_hits: hits_found.strong,
                weak_hits: hits_found.weak,
                anti_hits: hits_found.anti,
                damped: false,
                final_score: score,
            });
        }

        if damping_triggered && let Some(damping) = self.rules.damping() {
            for (hit, detail) in hits.iter().zip(details.iter_mut()) {
                if damping.is_damped(&hit.candidate.key) {
                    detail.final_score = (detail.final_score - damping.amount()).clamp(0.0, 1.0);
                    detail.damped = true;
                }
            }
        }

        let mut suggestions: Vec<Suggestion> = hits
            .iter()
            .zip(&details)
            .map(|(hit, detail)| {
                Suggestion::new(
                    hit.candidate.label.clone(),
                    detail.final_score,
                    SuggestionSource::from(hit.candidate.source),
                )
                .with_vector(hit.candidate.vector.clone())
            })
            .collect();
        sort_suggestions(&mut suggestions);
        details.sort_by(|a, b| {
            b.final_score
                .total_cmp(&a.final_score)
                .then_with(|| a.label.cmp(&b.label))
        });

        trace!(scored = suggestions.len(), damping_triggered, "Hybrid scoring done");
        ScoredBatch {
            suggestions,
            details,
        }
    }
}
