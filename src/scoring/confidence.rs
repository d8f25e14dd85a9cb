//! Need-review decision over a ranked suggestion list.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_REVIEW_MARGIN, DEFAULT_REVIEW_MEAN, DEFAULT_REVIEW_TOP1};

/// Thresholds for [`ReviewPolicy::Full`]; `margin` is also used by
/// [`ReviewPolicy::MarginOnly`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReviewThresholds {
    pub top1: f32,
    pub margin: f32,
    pub mean: f32,
}

impl Default for ReviewThresholds {
    fn default() -> Self {
        Self {
            top1: DEFAULT_REVIEW_TOP1,
            margin: DEFAULT_REVIEW_MARGIN,
            mean: DEFAULT_REVIEW_MEAN,
        }
    }
}

/// Which triggers mark a result for review.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewPolicy {
    /// Empty list, weak top1, narrow top1-top2 margin, or weak mean over the
    /// suggestions present (at most top-k of them).
    #[default]
    Full,
    /// Empty list, or a narrow margin between the first two; a single suggestion never
    /// needs review.
    MarginOnly,
}

impl ReviewPolicy {
    /// Parses `"full"` / `"margin_only"` (also `"margin-only"`, `"margin"`).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "full" => Some(Self::Full),
            "margin_only" | "margin-only" | "margin" => Some(Self::MarginOnly),
            _ => None,
        }
    }

    /// Decides review for `scores`, sorted descending. The mean covers the first
    /// `min(len, top_k)` scores; `top_k == 0` means the whole list.
    pub fn needs_review(self, scores: &[f32], top_k: usize, thresholds: &ReviewThresholds) -> bool {
        let Some(&top1) = scores.first() else {
            return true;
        };

        match self {
            ReviewPolicy::Full => {
                let top2 = scores.get(1).copied().unwrap_or(0.0);
                let slots = if top_k == 0 {
                    scores.len()
                } else {
                    scores.len().min(top_k)
                };
                let mean = scores.iter().take(slots).sum::<f32>() / slots as f32;

                top1 < thresholds.top1 || (top1 - top2) < thresholds.margin || mean < thresholds.mean
            }
            ReviewPolicy::MarginOnly => match scores.get(1) {
                Some(&top2) => (top1 - top2) < thresholds.margin,
                None => false,
            },
        }
    }
}
