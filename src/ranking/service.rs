//! Ranking orchestration over the seed and taxonomy candidate stores.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::RwLock;
use rayon::prelude::*;
use tracing::{debug, info, instrument, trace, warn};

use super::cancel::CancellationToken;
use super::error::{RankingError, RankingResult};
use super::modes::combine;
use super::types::ResultRow;
use crate::cache::EmbeddingCache;
use crate::config::{Mode, RankingConfig};
use crate::constants::{SEARCH_POOL_FACTOR, SEED_WEIGHT};
use crate::embedding::{Embedder, EmbeddingError, validate_batch};
use crate::scoring::{HybridScorer, RuleBook, SourceWeighting};
use crate::taxonomy::{TaxonomyEntry, default_entries};
use crate::text::{normalize_text, unique_normalized};
use crate::vectordb::{Candidate, CandidateSource, CandidateStore};

/// Ranks texts against seed and taxonomy labels.
///
/// Configuration and rules are immutable snapshots swapped under a lock; candidate
/// stores are replaced wholesale on reload. Ranking a text only reads shared state,
/// so one service can serve many threads.
pub struct RankingService<E: Embedder> {
    embedder: E,
    cache: EmbeddingCache,
    config: RwLock<RankingConfig>,
    rules: RwLock<Arc<RuleBook>>,
    seeds: CandidateStore,
    taxonomy: CandidateStore,
}

impl<E: Embedder> std::fmt::Debug for RankingService<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RankingService")
            .field("model_id", &self.embedder.model_id())
            .field("config", &*self.config.read())
            .field("seeds", &self.seeds.len())
            .field("taxonomy", &self.taxonomy.len())
            .finish()
    }
}

impl<E: Embedder> RankingService<E> {
    /// Creates a service with empty candidate stores. `config` is sanitized.
    pub fn new(embedder: E, cache: EmbeddingCache, config: RankingConfig, rules: RuleBook) -> Self {
        if cache.model_id() != embedder.model_id() {
            warn!(
                cache_model = cache.model_id(),
                embedder_model = embedder.model_id(),
                "Embedding cache namespace differs from the embedder model id"
            );
        }
        Self {
            embedder,
            cache,
            config: RwLock::new(config.sanitized()),
            rules: RwLock::new(Arc::new(rules)),
            seeds: CandidateStore::new(),
            taxonomy: CandidateStore::new(),
        }
    }

    pub fn embedder(&self) -> &E {
        &self.embedder
    }

    pub fn cache(&self) -> &EmbeddingCache {
        &self.cache
    }

    pub fn config(&self) -> RankingConfig {
        *self.config.read()
    }

    /// Stores the sanitized form of `config` and returns it.
    pub fn update_config(&self, config: RankingConfig) -> RankingConfig {
        let sanitized = config.sanitized();
        *self.config.write() = sanitized;
        debug!(?sanitized, "Ranking config updated");
        sanitized
    }

    pub fn rules(&self) -> Arc<RuleBook> {
        Arc::clone(&self.rules.read())
    }

    /// Replaces the keyword rules. Rankings already running keep the previous book.
    pub fn set_rules(&self, rules: RuleBook) {
        info!(categories = rules.len(), "Keyword rules replaced");
        *self.rules.write() = Arc::new(rules);
    }

    pub fn seed_count(&self) -> usize {
        self.seeds.len()
    }

    pub fn taxonomy_count(&self) -> usize {
        self.taxonomy.len()
    }

    /// Returns the vector for already-normalized text, calling the embedder on a miss.
    pub fn embed_cached(&self, normalized_text: &str) -> RankingResult<Arc<[f32]>> {
        if let Some((vector, tier)) = self.cache.get(normalized_text)? {
            trace!(?tier, "Embedding cache hit");
            return Ok(vector);
        }

        let vectors = self.embedder.embed(&[normalized_text])?;
        validate_batch(1, &vectors)?;
        let vector = vectors
            .into_iter()
            .next()
            .ok_or(EmbeddingError::CountMismatch {
                expected: 1,
                actual: 0,
            })?;
        Ok(self.cache.put(normalized_text, vector))
    }

    /// Embeds distinct normalized texts with one embedder call for all cache misses.
    fn embed_all(&self, texts: &[String]) -> RankingResult<Vec<Arc<[f32]>>> {
        let mut vectors: Vec<Option<Arc<[f32]>>> = Vec::with_capacity(texts.len());
        let mut misses = Vec::new();
        for (index, text) in texts.iter().enumerate() {
            match self.cache.get(text)? {
                Some((vector, _)) => vectors.push(Some(vector)),
                None => {
                    vectors.push(None);
                    misses.push(index);
                }
            }
        }

        if !misses.is_empty() {
            let batch: Vec<&str> = misses.iter().map(|&i| texts[i].as_str()).collect();
            let embedded = self.embedder.embed(&batch)?;
            validate_batch(batch.len(), &embedded)?;
            for (&index, vector) in misses.iter().zip(embedded) {
                vectors[index] = Some(self.cache.put(&texts[index], vector));
            }
        }

        debug!(total = texts.len(), embedded = misses.len(), "Embedded label batch");
        Ok(vectors.into_iter().flatten().collect())
    }

    fn build_candidates(
        &self,
        labels: Vec<String>,
        source: CandidateSource,
    ) -> RankingResult<Vec<Candidate>> {
        let texts: Vec<String> = labels.iter().map(|l| normalize_text(l)).collect();
        let vectors = self.embed_all(&texts)?;
        Ok(labels
            .into_iter()
            .zip(vectors)
            .map(|(label, vector)| Candidate::new(label, vector, source))
            .collect())
    }

    /// Replaces the seed labels. Labels are normalized and deduplicated; an empty
    /// input clears the store. Returns the number of seeds loaded.
    #[instrument(skip(self, labels))]
    pub fn load_seeds<I, S>(&self, labels: I) -> RankingResult<usize>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let labels = unique_normalized(labels);
        if labels.is_empty() {
            self.seeds.clear();
            info!("Seed store cleared");
            return Ok(0);
        }

        let candidates = self.build_candidates(labels, CandidateSource::Seed)?;
        let count = self.seeds.replace(candidates)?;
        info!(count, "Seeds loaded");
        Ok(count)
    }

    /// Replaces the taxonomy labels with `entries`.
    #[instrument(skip(self, entries), fields(entries = entries.len()))]
    pub fn load_taxonomy(&self, entries: &[TaxonomyEntry]) -> RankingResult<usize> {
        let labels = unique_normalized(entries.iter().map(TaxonomyEntry::embed_text));
        if labels.is_empty() {
            self.taxonomy.clear();
            return Ok(0);
        }

        let candidates = self.build_candidates(labels, CandidateSource::Taxonomy)?;
        let count = self.taxonomy.replace(candidates)?;
        info!(count, "Taxonomy loaded");
        Ok(count)
    }

    /// Loads the built-in NDC dictionary.
    pub fn load_default_taxonomy(&self) -> RankingResult<usize> {
        self.load_taxonomy(&default_entries())
    }

    /// Ranks one text under the current configuration and rules.
    ///
    /// Text that normalizes to nothing gives an empty row flagged for review. Embedder
    /// and cache failures are returned; there is no degraded result.
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    pub fn rank_one(&self, text: &str) -> RankingResult<ResultRow> {
        let normalized = normalize_text(text);
        if normalized.is_empty() {
            debug!("Empty text after normalization");
            return Ok(ResultRow::needs_review(text));
        }

        let query = self.embed_cached(&normalized)?;
        let config = self.config();
        let rules = self.rules();
        let scorer = HybridScorer::new(&rules);

        let seeds = self.seeds.snapshot();
        // Rules and damping need every seed scored, not just the nearest ones.
        let seed_pool = if rules.is_empty() {
            config.top_k * SEARCH_POOL_FACTOR
        } else {
            seeds.len()
        };
        let seed_hits = seeds.search(&query, seed_pool, config.dimension_policy)?;
        let seed_bias = match config.mode {
            Mode::Mixed => config.seed_bias,
            Mode::Seeded | Mode::Split => 0.0,
        };
        let seed_batch = scorer.score(
            &normalized,
            &seed_hits,
            SourceWeighting::new(SEED_WEIGHT, seed_bias),
        );

        let taxonomy_suggestions = if config.ranks_taxonomy() {
            let taxonomy = self.taxonomy.snapshot();
            let hits = taxonomy.search(
                &query,
                config.top_k * SEARCH_POOL_FACTOR,
                config.dimension_policy,
            )?;
            scorer
                .score(
                    &normalized,
                    &hits,
                    SourceWeighting::new(config.weight_taxonomy, 0.0),
                )
                .suggestions
        } else {
            Vec::new()
        };

        let review_scores: Vec<f32> = seed_batch
            .suggestions
            .iter()
            .take(config.top_k)
            .map(|s| s.score)
            .collect();
        let need_review =
            config
                .review_policy
                .needs_review(&review_scores, config.top_k, &config.review);

        let mut details = seed_batch.details;
        details.truncate(config.top_k);

        let combined = combine(&config, seed_batch.suggestions, taxonomy_suggestions);
        trace!(
            mode = %config.mode,
            suggestions = combined.suggestions.len(),
            taxonomy = combined.taxonomy_suggestions.len(),
            need_review,
            "Ranked text"
        );

        Ok(ResultRow {
            text: text.to_string(),
            suggestions: combined.suggestions,
            taxonomy_suggestions: combined.taxonomy_suggestions,
            need_review,
            details,
        })
    }

    /// Ranks every text in parallel. Output order matches input order; each item has
    /// its own result, and items not started before `cancel` fires are
    /// [`RankingError::Cancelled`].
    pub fn classify_batch<S>(
        &self,
        texts: &[S],
        cancel: &CancellationToken,
    ) -> Vec<RankingResult<ResultRow>>
    where
        S: AsRef<str> + Sync,
    {
        self.classify_batch_with_progress(texts, cancel, |_, _| {})
    }

    /// [`classify_batch`](Self::classify_batch) reporting `(done, total)` after each
    /// item. Calls may come from several threads.
    #[instrument(skip_all, fields(total = texts.len()))]
    pub fn classify_batch_with_progress<S, F>(
        &self,
        texts: &[S],
        cancel: &CancellationToken,
        progress: F,
    ) -> Vec<RankingResult<ResultRow>>
    where
        S: AsRef<str> + Sync,
        F: Fn(usize, usize) + Sync,
    {
        let total = texts.len();
        let done = AtomicUsize::new(0);

        let results: Vec<RankingResult<ResultRow>> = texts
            .par_iter()
            .map(|text| {
                let result = if cancel.is_cancelled() {
                    Err(RankingError::Cancelled)
                } else {
                    self.rank_one(text.as_ref())
                };
                progress(done.fetch_add(1, Ordering::Relaxed) + 1, total);
                result
            })
            .collect();

        let failed = results.iter().filter(|r| r.is_err()).count();
        if failed > 0 {
            warn!(total, failed, cancelled = cancel.is_cancelled(), "Batch finished with failures");
        } else {
            info!(total, "Batch classified");
        }
        results
    }
}
