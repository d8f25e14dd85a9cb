//! Text normalization shared by the cache keys, the candidate stores and the scorer.
//!
//! Every text that reaches the embedder goes through [`normalize_text`], so the cache
//! key, the encoder input and the keyword matcher all see the same string.

use std::collections::HashSet;

use unicode_normalization::UnicodeNormalization;

#[cfg(test)]
mod tests;

/// NFKC-normalizes, drops control characters and collapses whitespace runs.
///
/// Case is preserved; this is the display form of a label.
pub fn normalize(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let composed: String = trimmed
        .nfkc()
        .filter(|c| c.is_whitespace() || !c.is_control())
        .collect();

    let mut out = String::with_capacity(composed.len());
    for word in composed.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

/// Deduplication identity of a label: [`normalize`] plus lowercasing.
pub fn normalize_key(input: &str) -> String {
    normalize(input).to_lowercase()
}

/// Form of a text handed to the embedder and the keyword matcher.
///
/// Identical to [`normalize_key`]; kept as a separate name because the two serve
/// different contracts and may diverge.
pub fn normalize_text(input: &str) -> String {
    normalize_key(input)
}

/// Normalizes labels, dropping empties and later duplicates of the same key.
///
/// The first display form seen for a key wins.
pub fn unique_normalized<I, S>(labels: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for label in labels {
        let display = normalize(label.as_ref());
        if display.is_empty() {
            continue;
        }
        if seen.insert(display.to_lowercase()) {
            out.push(display);
        }
    }
    out
}

/// Splits a free-form seed list on newlines, commas and semicolons.
pub fn parse_seed_list(data: &str) -> Vec<String> {
    unique_normalized(data.split(['\n', '\r', ',', ';']))
}
