//! Per-category keyword rules used by the lexical half of the hybrid score.
//!
//! A rules document maps a category label to strong, weak and anti keywords and may
//! declare one damping rule. Documents compile once into an immutable [`RuleBook`];
//! the service swaps whole books, it never edits one.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::error::{RulesError, RulesResult};
use crate::constants::{
    ANTI_KEYWORD_WEIGHT, BONUS_CAP, DEFAULT_DAMPING, SHORT_KEYWORD_MAX_LEN, STRONG_HIT_CAP,
    STRONG_KEYWORD_WEIGHT, WEAK_HIT_CAP, WEAK_KEYWORD_WEIGHT,
};
use crate::text::{normalize_key, normalize_text};

const BUILTIN_RULES: &str = include_str!("default_rules.json");

/// Raw keyword lists for one category, as written in a rules document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordRuleSet {
    #[serde(default)]
    pub strong: Vec<String>,
    #[serde(default)]
    pub weak: Vec<String>,
    #[serde(default)]
    pub anti: Vec<String>,
}

/// A strong hit in any `signal` category lowers every `damped` category by `amount`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DampingRule {
    pub signal: Vec<String>,
    pub damped: Vec<String>,
    #[serde(default = "default_damping_amount")]
    pub amount: f32,
}

fn default_damping_amount() -> f32 {
    DEFAULT_DAMPING
}

/// Serialized form of a rule book.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RulesDocument {
    #[serde(default)]
    pub categories: BTreeMap<String, KeywordRuleSet>,
    #[serde(default)]
    pub damping: Option<DampingRule>,
}

impl RulesDocument {
    /// Parses the document embedded in the binary.
    pub fn builtin() -> RulesResult<Self> {
        serde_json::from_str(BUILTIN_RULES).map_err(|source| RulesError::Parse { path: None, source })
    }

    /// Overlays `overrides`: categories are replaced label by label, and the damping
    /// rule is replaced when the override declares one.
    pub fn merged_with(mut self, overrides: RulesDocument) -> Self {
        self.categories.extend(overrides.categories);
        if overrides.damping.is_some() {
            self.damping = overrides.damping;
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Keyword {
    text: String,
    whole_word: bool,
}

impl Keyword {
    fn compile(raw: &str) -> Option<Self> {
        let text = normalize_text(raw);
        if text.is_empty() {
            return None;
        }
        let whole_word = text.len() <= SHORT_KEYWORD_MAX_LEN
            && text.chars().all(|c| c.is_ascii_alphanumeric());
        Some(Self { text, whole_word })
    }

    fn matches(&self, text: &str) -> bool {
        if self.whole_word {
            contains_word(text, &self.text)
        } else {
            text.contains(self.text.as_str())
        }
    }
}

/// `true` if `word` occurs in `text` with no letter or digit on either side.
fn contains_word(text: &str, word: &str) -> bool {
    text.match_indices(word).any(|(start, _)| {
        let before = text[..start].chars().next_back();
        let after = text[start + word.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

fn compile_keywords(raw: &[String]) -> Vec<Keyword> {
    let mut seen = HashSet::new();
    raw.iter()
        .filter_map(|kw| Keyword::compile(kw))
        .filter(|kw| seen.insert(kw.text.clone()))
        .collect()
}

/// Keyword lists of one category after normalization and dedup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompiledRuleSet {
    strong: Vec<Keyword>,
    weak: Vec<Keyword>,
    anti: Vec<Keyword>,
}

impl CompiledRuleSet {
    fn compile(set: &KeywordRuleSet) -> Self {
        Self {
            strong: compile_keywords(&set.strong),
            weak: compile_keywords(&set.weak),
            anti: compile_keywords(&set.anti),
        }
    }

    /// Counts distinct keywords of each kind present in `normalized_text`.
    pub fn count_hits(&self, normalized_text: &str) -> RuleHits {
        let count = |kws: &[Keyword]| kws.iter().filter(|kw| kw.matches(normalized_text)).count();
        RuleHits {
            strong: count(&self.strong),
            weak: count(&self.weak),
            anti: count(&self.anti),
        }
    }

    pub fn keyword_count(&self) -> usize {
        self.strong.len() + self.weak.len() + self.anti.len()
    }
}

/// Keyword hit counts for one category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuleHits {
    pub strong: usize,
    pub weak: usize,
    pub anti: usize,
}

impl RuleHits {
    /// Capped, weighted bonus in `[0, BONUS_CAP]`.
    pub fn bonus(&self) -> f32 {
        let strong = self.strong.min(STRONG_HIT_CAP) as f32;
        let weak = self.weak.min(WEAK_HIT_CAP) as f32;
        let raw = STRONG_KEYWORD_WEIGHT * strong + WEAK_KEYWORD_WEIGHT * weak
            - ANTI_KEYWORD_WEIGHT * self.anti as f32;
        raw.clamp(0.0, BONUS_CAP)
    }
}

/// Damping rule with category labels reduced to keys.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledDamping {
    signal: HashSet<String>,
    damped: HashSet<String>,
    amount: f32,
}

impl CompiledDamping {
    pub fn is_signal(&self, key: &str) -> bool {
        self.signal.contains(key)
    }

    pub fn is_damped(&self, key: &str) -> bool {
        self.damped.contains(key)
    }

    pub fn amount(&self) -> f32 {
        self.amount
    }
}

/// Immutable, compiled keyword rules keyed by category key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleBook {
    rules: HashMap<String, CompiledRuleSet>,
    damping: Option<CompiledDamping>,
}

impl RuleBook {
    /// A book with no rules: every label scores on similarity alone.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Compiles the built-in rules.
    pub fn builtin() -> RulesResult<Self> {
        Self::from_document(&RulesDocument::builtin()?)
    }

    pub fn from_document(doc: &RulesDocument) -> RulesResult<Self> {
        let rules = doc
            .categories
            .iter()
            .filter_map(|(label, set)| {
                let key = normalize_key(label);
                (!key.is_empty()).then(|| (key, CompiledRuleSet::compile(set)))
            })
            .collect();

        let damping = match &doc.damping {
            Some(rule) => {
                if !rule.amount.is_finite() || !(0.0..=1.0).contains(&rule.amount) {
                    return Err(RulesError::InvalidDamping {
                        amount: rule.amount,
                    });
                }
                let keys = |labels: &[String]| {
                    labels
                        .iter()
                        .map(|l| normalize_key(l))
                        .filter(|k| !k.is_empty())
                        .collect::<HashSet<_>>()
                };
                Some(CompiledDamping {
                    signal: keys(&rule.signal),
                    damped: keys(&rule.damped),
                    amount: rule.amount,
                })
            }
            None => None,
        };

        Ok(Self { rules, damping })
    }

    pub fn from_json_str(json: &str) -> RulesResult<Self> {
        let doc: RulesDocument =
            serde_json::from_str(json).map_err(|source| RulesError::Parse { path: None, source })?;
        Self::from_document(&doc)
    }

    /// Built-in rules overlaid with the document at `path`.
    ///
    /// No path gives the built-in rules. A path that does not exist is logged and also
    /// gives the built-in rules; unreadable or malformed files are errors.
    pub fn load(path: Option<&Path>) -> RulesResult<Self> {
        let defaults = RulesDocument::builtin()?;
        let Some(path) = path else {
            return Self::from_document(&defaults);
        };

        let data = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "Rules file not found, using built-in rules");
                return Self::from_document(&defaults);
            }
            Err(source) => {
                return Err(RulesError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let overrides: RulesDocument =
            serde_json::from_str(&data).map_err(|source| RulesError::Parse {
                path: Some(path.to_path_buf()),
                source,
            })?;
        debug!(
            path = %path.display(),
            categories = overrides.categories.len(),
            "Merging rule overrides"
        );

        let book = Self::from_document(&defaults.merged_with(overrides))?;
        info!(categories = book.len(), "Keyword rules loaded");
        Ok(book)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules for a category key (see [`normalize_key`]).
    pub fn get(&self, key: &str) -> Option<&CompiledRuleSet> {
        self.rules.get(key)
    }

    pub fn damping(&self) -> Option<&CompiledDamping> {
        self.damping.as_ref()
    }
}
