//! Cross-cutting, shared constants.
//!
//! Ranges documented here are the ones [`RankingConfig::sanitized`] clamps to; keep
//! them in one place so the config layer, the scorer and the tests agree.
//!
//! [`RankingConfig::sanitized`]: crate::config::RankingConfig::sanitized

/// Smallest number of suggestions returned per list.
pub const MIN_TOP_K: usize = 3;
/// Largest number of suggestions returned per list.
pub const MAX_TOP_K: usize = 5;
pub const DEFAULT_TOP_K: usize = 3;

/// Candidates fetched from a store per requested suggestion before scoring.
pub const SEARCH_POOL_FACTOR: usize = 3;

pub const DEFAULT_WEIGHT_TAXONOMY: f32 = 0.85;
pub const MIN_WEIGHT_TAXONOMY: f32 = 0.5;
pub const MAX_WEIGHT_TAXONOMY: f32 = 1.2;

/// Seed candidates always weigh 1.0.
pub const SEED_WEIGHT: f32 = 1.0;

pub const DEFAULT_SEED_BIAS: f32 = 0.03;
pub const MIN_SEED_BIAS: f32 = 0.0;
pub const MAX_SEED_BIAS: f32 = 0.2;

pub const DEFAULT_CLUSTER_THRESHOLD: f32 = 0.80;

pub const DEFAULT_REVIEW_TOP1: f32 = 0.45;
pub const DEFAULT_REVIEW_MARGIN: f32 = 0.03;
pub const DEFAULT_REVIEW_MEAN: f32 = 0.50;

/// Upper bound of the deterministic tie-break offset added to every score.
pub const TIE_BREAK_SCALE: f32 = 1e-6;

// Lexical hybrid bonus.
pub const STRONG_KEYWORD_WEIGHT: f32 = 1.0;
pub const WEAK_KEYWORD_WEIGHT: f32 = 0.25;
pub const ANTI_KEYWORD_WEIGHT: f32 = 1.0;
pub const STRONG_HIT_CAP: usize = 3;
pub const WEAK_HIT_CAP: usize = 5;
pub const BONUS_CAP: f32 = 4.0;
pub const COSINE_BLEND_ALPHA: f32 = 0.80;
pub const BONUS_BLEND_BETA: f32 = 0.20;
pub const STRONG_HIT_FLOOR: f32 = 0.60;
pub const DEFAULT_DAMPING: f32 = 0.03;

/// Keywords of at most this many ASCII alphanumerics only match on word boundaries.
pub const SHORT_KEYWORD_MAX_LEN: usize = 3;

pub const DEFAULT_L1_CAPACITY: u64 = 50_000;
pub const DEFAULT_STUB_EMBEDDING_DIM: usize = 256;
