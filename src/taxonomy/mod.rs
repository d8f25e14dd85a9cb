//! NDC (Nippon Decimal Classification) dictionary entries.

use serde::{Deserialize, Serialize};

use crate::text::normalize;

/// One dictionary entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyEntry {
    pub code: String,
    pub label: String,
}

impl TaxonomyEntry {
    pub fn new(code: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            label: label.into(),
        }
    }

    /// `"{code} {label}"`, normalized. Used both as the display label and as the text
    /// handed to the embedder.
    pub fn embed_text(&self) -> String {
        normalize(&format!("{} {}", self.code, self.label))
    }
}

const DEFAULT_ENTRIES: &[(&str, &str)] = &[
    ("000", "General works"),
    ("100", "Philosophy"),
    ("200", "History"),
    ("300", "Social sciences"),
    ("400", "Natural sciences"),
    ("500", "Technology and engineering"),
    ("600", "Industry and commerce"),
    ("700", "Arts"),
    ("800", "Language"),
    ("900", "Literature"),
    ("007", "Information science"),
    ("336", "Business management"),
    ("657", "Accounting"),
    ("910", "Japanese literature"),
    ("913", "Japanese fiction"),
    ("930", "English and American literature"),
    ("320", "Law"),
    ("360", "Social problems"),
    ("610", "Agriculture"),
    ("620", "Manufacturing"),
    ("830", "English language"),
    ("910.26", "Modern Japanese literature"),
];

/// Built-in dictionary: the ten main classes plus representative subdivisions.
pub fn default_entries() -> Vec<TaxonomyEntry> {
    DEFAULT_ENTRIES
        .iter()
        .map(|(code, label)| TaxonomyEntry::new(*code, *label))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_embed_text_joins_code_and_label() {
        let entry = TaxonomyEntry::new(" 007 ", "Information　science");
        assert_eq!(entry.embed_text(), "007 Information science");
    }

    #[test]
    fn test_default_entries_cover_main_classes() {
        let entries = default_entries();
        let codes: HashSet<&str> = entries.iter().map(|e| e.code.as_str()).collect();

        assert_eq!(codes.len(), entries.len());
        for class in ["000", "100", "200", "300", "400", "500", "600", "700", "800", "900"] {
            assert!(codes.contains(class), "missing main class {class}");
        }
    }
}
