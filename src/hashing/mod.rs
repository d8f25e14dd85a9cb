use blake3::Hasher;

use crate::constants::TIE_BREAK_SCALE;

/// Cache key for an embedding: BLAKE3 over the model id and the normalized text.
///
/// The model id is hashed first with a separator, so switching encoders moves every
/// lookup into a fresh key namespace instead of reusing stale vectors.
#[inline]
pub fn hash_embedding_key(model_id: &str, normalized_text: &str) -> [u8; 32] {
    let mut hasher = Hasher::new();
    hasher.update(model_id.as_bytes());
    hasher.update(b"|");
    hasher.update(normalized_text.as_bytes());
    *hasher.finalize().as_bytes()
}

/// Lowercase hex rendering of a key, used as the on-disk file stem.
pub fn key_to_hex(key: &[u8; 32]) -> String {
    use std::fmt::Write;

    key.iter().fold(String::with_capacity(64), |mut out, b| {
        let _ = write!(out, "{b:02x}");
        out
    })
}

/// Computes a 64-bit hash of the input data using BLAKE3, truncated from 256 bits.
///
/// Feeds the stub embedder's feature hashing and [`tie_break_bias`]; never used for
/// cache identity, so collisions are harmless.
#[inline]
pub fn hash_to_u64(data: &[u8]) -> u64 {
    let hash = blake3::hash(data);
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[..8]);
    u64::from_le_bytes(bytes)
}

/// Stable offset in `[0, TIE_BREAK_SCALE]` derived from a candidate key.
///
/// Added to final scores so equal scores resolve the same way on every run, no matter
/// in which order candidates were inserted.
#[inline]
pub fn tie_break_bias(key: &str) -> f32 {
    if key.is_empty() {
        return 0.0;
    }
    let fraction = (hash_to_u64(key.as_bytes()) >> 40) as f32 / (1u64 << 24) as f32;
    fraction * TIE_BREAK_SCALE
}
