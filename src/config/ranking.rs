//! Ranking parameters and their sanitization.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::constants::{
    DEFAULT_CLUSTER_THRESHOLD, DEFAULT_SEED_BIAS, DEFAULT_TOP_K, DEFAULT_WEIGHT_TAXONOMY,
    MAX_SEED_BIAS, MAX_TOP_K, MAX_WEIGHT_TAXONOMY, MIN_SEED_BIAS, MIN_TOP_K, MIN_WEIGHT_TAXONOMY,
};
use crate::scoring::{ReviewPolicy, ReviewThresholds};
use crate::vectordb::DimensionPolicy;

/// How seed and taxonomy rankings are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Seed labels only.
    #[default]
    Seeded,
    /// Seed and taxonomy labels in one list.
    Mixed,
    /// Seed and taxonomy labels in two separate lists.
    Split,
}

impl Mode {
    /// Strict parse, case-insensitive.
    pub fn try_parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "seeded" => Some(Self::Seeded),
            "mixed" => Some(Self::Mixed),
            "split" => Some(Self::Split),
            _ => None,
        }
    }

    /// Lenient parse: unknown or empty values fall back to [`Mode::Seeded`].
    pub fn parse(value: &str) -> Self {
        Self::try_parse(value).unwrap_or_else(|| {
            warn!(value, "Unknown ranking mode, falling back to seeded");
            Self::Seeded
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Seeded => "seeded",
            Mode::Mixed => "mixed",
            Mode::Split => "split",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClusterConfig {
    pub enabled: bool,
    /// Cosine threshold (tau) for merging labels, within `(0, 1)`.
    pub threshold: f32,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            threshold: DEFAULT_CLUSTER_THRESHOLD,
        }
    }
}

/// Snapshot of every parameter a ranking call reads.
///
/// Values coming from outside go through [`sanitized`](Self::sanitized) before use.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankingConfig {
    pub mode: Mode,
    /// Suggestions per list, within `[MIN_TOP_K, MAX_TOP_K]`.
    pub top_k: usize,
    /// Multiplier for taxonomy similarity, within `[0.5, 1.2]`.
    pub weight_taxonomy: f32,
    /// Added to seed scores in mixed mode, within `[0, 0.2]`.
    pub seed_bias: f32,
    /// Ranks the taxonomy pool in mixed mode. Split mode always ranks it.
    pub use_taxonomy: bool,
    pub cluster: ClusterConfig,
    pub review: ReviewThresholds,
    pub review_policy: ReviewPolicy,
    pub dimension_policy: DimensionPolicy,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Seeded,
            top_k: DEFAULT_TOP_K,
            weight_taxonomy: DEFAULT_WEIGHT_TAXONOMY,
            seed_bias: DEFAULT_SEED_BIAS,
            use_taxonomy: true,
            cluster: ClusterConfig::default(),
            review: ReviewThresholds::default(),
            review_policy: ReviewPolicy::default(),
            dimension_policy: DimensionPolicy::default(),
        }
    }
}

fn clamp_or(value: f32, min: f32, max: f32, fallback: f32) -> f32 {
    if value.is_nan() {
        fallback
    } else {
        value.clamp(min, max)
    }
}

fn positive_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        fallback
    }
}

impl RankingConfig {
    /// Returns a copy with every field inside its documented range.
    ///
    /// Numeric ranges are clamped; a cluster threshold outside `(0, 1)` and
    /// non-positive review thresholds are replaced by their defaults.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let review = ReviewThresholds {
            top1: positive_or(self.review.top1, defaults.review.top1),
            margin: positive_or(self.review.margin, defaults.review.margin),
            mean: positive_or(self.review.mean, defaults.review.mean),
        };
        let threshold = if self.cluster.threshold > 0.0 && self.cluster.threshold < 1.0 {
            self.cluster.threshold
        } else {
            DEFAULT_CLUSTER_THRESHOLD
        };

        Self {
            top_k: self.top_k.clamp(MIN_TOP_K, MAX_TOP_K),
            weight_taxonomy: clamp_or(
                self.weight_taxonomy,
                MIN_WEIGHT_TAXONOMY,
                MAX_WEIGHT_TAXONOMY,
                DEFAULT_WEIGHT_TAXONOMY,
            ),
            seed_bias: clamp_or(self.seed_bias, MIN_SEED_BIAS, MAX_SEED_BIAS, DEFAULT_SEED_BIAS),
            cluster: ClusterConfig {
                enabled: self.cluster.enabled,
                threshold,
            },
            review,
            ..self
        }
    }

    /// Whether the taxonomy pool is ranked for this configuration.
    pub fn ranks_taxonomy(&self) -> bool {
        match self.mode {
            Mode::Seeded => false,
            Mode::Mixed => self.use_taxonomy,
            Mode::Split => true,
        }
    }
}
