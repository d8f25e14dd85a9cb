//! Hybrid scoring and the need-review classifier.
//!
//! [`HybridScorer`] turns cosine hits into bounded [`Suggestion`]s, optionally lifting
//! seed labels whose keyword rules fire in the text. [`ReviewPolicy`] then decides
//! whether the seed ranking is confident enough to accept unattended.

pub mod confidence;
pub mod error;
pub mod hybrid;
pub mod rules;
pub mod types;


pub use confidence::{ReviewPolicy, ReviewThresholds};
pub use error::{RulesError, RulesResult};
pub use hybrid::{HybridScorer, ScoredBatch, SourceWeighting};
pub use rules::{
    CompiledDamping, CompiledRuleSet, DampingRule, KeywordRuleSet, RuleBook, RuleHits,
    RulesDocument,
};
pub use types::{ScoreDetail, Suggestion, SuggestionSource, sort_suggestions};
