//! Categorizer library crate (used by the CLI binary and integration tests).
//!
//! Ranks short texts against two label pools: user-supplied seed labels and a
//! built-in NDC taxonomy. The pipeline per text is normalize, embed (through a
//! two-tier cache), cosine search, hybrid keyword scoring, mode-specific combination,
//! optional clustering, and a review flag.
//!
//! # Public API Surface
//!
//! ## Orchestration
//! - [`RankingService`], [`ResultRow`], [`CancellationToken`] - ranking entry point
//! - [`Config`], [`RankingConfig`], [`Mode`] - configuration
//!
//! ## Building Blocks
//! - [`Embedder`], [`StubEmbedder`] - text encoders
//! - [`EmbeddingCache`] - memory + disk embedding cache
//! - [`CandidateStore`], [`CandidateSet`] - label vectors and top-k search
//! - [`RuleBook`], [`HybridScorer`], [`ReviewPolicy`] - scoring
//! - [`cluster()`](cluster::cluster) - near-duplicate label merging
//! - [`ExportLayout`], [`write_csv`](export::write_csv) - tabular output
//!
//! ## Test/Mock Support
//! [`MockEmbedder`](embedding::MockEmbedder) is available behind
//! `#[cfg(any(test, feature = "mock"))]`.

pub mod cache;
pub mod cluster;
pub mod config;
pub mod constants;
pub mod embedding;
pub mod export;
pub mod hashing;
pub mod ranking;
pub mod scoring;
pub mod taxonomy;
pub mod text;
pub mod vectordb;

pub use cache::{CacheError, CacheStats, CacheTier, DiskTier, EmbeddingCache, L1Cache};
pub use config::{ClusterConfig, Config, ConfigError, Mode, RankingConfig};
#[cfg(any(test, feature = "mock"))]
pub use embedding::MockEmbedder;
pub use embedding::{Embedder, EmbeddingError, StubEmbedder};
pub use export::{ExportLayout, write_csv};
pub use hashing::{hash_embedding_key, hash_to_u64, key_to_hex};
pub use ranking::{CancellationToken, RankingError, RankingResult, RankingService, ResultRow};
pub use scoring::{
    HybridScorer, ReviewPolicy, ReviewThresholds, RuleBook, RulesError, ScoreDetail, Suggestion,
    SuggestionSource,
};
pub use taxonomy::TaxonomyEntry;
pub use text::{normalize, normalize_key, normalize_text, parse_seed_list};
pub use vectordb::{Candidate, CandidateSet, CandidateSource, CandidateStore, DimensionPolicy};
