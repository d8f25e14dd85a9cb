use serde::{Deserialize, Serialize};

use super::error::{VectorDbError, VectorDbResult};

/// How to compare vectors whose lengths differ.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DimensionPolicy {
    /// Reject the comparison with [`VectorDbError::DimensionMismatch`].
    #[default]
    Strict,
    /// Compare over the shorter common prefix.
    Truncate,
}

impl DimensionPolicy {
    /// Parses `"strict"` / `"truncate"` case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "strict" => Some(Self::Strict),
            "truncate" => Some(Self::Truncate),
            _ => None,
        }
    }
}

/// Cosine similarity over the common prefix of `a` and `b`.
///
/// Accumulates in `f64`. Returns 0 when either side has zero norm or the inputs are
/// empty, and never returns NaN.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let n = a.len().min(b.len());
    if n == 0 {
        return 0.0;
    }

    let (mut dot, mut norm_a, mut norm_b) = (0.0f64, 0.0f64, 0.0f64);
    for (&x, &y) in a[..n].iter().zip(&b[..n]) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let cos = dot / (norm_a.sqrt() * norm_b.sqrt());
    if cos.is_nan() {
        0.0
    } else {
        cos.clamp(-1.0, 1.0) as f32
    }
}

/// [`cosine_similarity`] that enforces `policy` on a length mismatch.
pub fn checked_cosine(a: &[f32], b: &[f32], policy: DimensionPolicy) -> VectorDbResult<f32> {
    if policy == DimensionPolicy::Strict && a.len() != b.len() {
        return Err(VectorDbError::DimensionMismatch {
            expected: b.len(),
            actual: a.len(),
        });
    }
    Ok(cosine_similarity(a, b))
}
