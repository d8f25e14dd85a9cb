//! Categorizer CLI entrypoint.
//!
//! Reads one text per line from the file named by the first argument (or stdin),
//! ranks every line and writes CSV to stdout. Configuration comes from
//! `CATEGORIZER_*` environment variables; logs go to stderr.

use std::fs;
use std::io::{self, BufWriter, Read};
use std::sync::Arc;

use mimalloc::MiMalloc;
use tokio::signal;

use categorizer::cache::EmbeddingCache;
use categorizer::config::Config;
use categorizer::embedding::{Embedder, StubEmbedder};
use categorizer::export::{ExportLayout, write_csv};
use categorizer::ranking::{CancellationToken, RankingError, RankingService, ResultRow};
use categorizer::scoring::RuleBook;
use categorizer::text::parse_seed_list;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let config = Config::from_env()?;
    config.validate()?;

    tracing::info!(
        mode = %config.ranking.mode,
        top_k = config.ranking.top_k,
        cache_dir = ?config.cache_dir,
        "Categorizer starting"
    );

    let embedder = StubEmbedder::new(config.embedding_dim)?;
    let cache = match &config.cache_dir {
        Some(dir) => match EmbeddingCache::with_disk(embedder.model_id(), config.l1_capacity, dir.clone()) {
            Ok(cache) => cache,
            Err(e) => {
                tracing::warn!(error = %e, "Disk cache unavailable, using memory only");
                EmbeddingCache::memory_only(embedder.model_id(), config.l1_capacity)
            }
        },
        None => EmbeddingCache::memory_only(embedder.model_id(), config.l1_capacity),
    };
    let rules = RuleBook::load(config.rules_path.as_deref())?;

    let service = Arc::new(RankingService::new(embedder, cache, config.ranking, rules));

    if service.config().ranks_taxonomy() {
        service.load_default_taxonomy()?;
    }
    if let Some(path) = &config.seeds_path {
        let seeds = parse_seed_list(&fs::read_to_string(path)?);
        service.load_seeds(&seeds)?;
    }
    if service.seed_count() == 0 {
        tracing::warn!("No seed labels loaded; seed suggestions will be empty");
    }

    let texts = read_input()?;
    let cancel = CancellationToken::new();

    let worker = {
        let service = Arc::clone(&service);
        let cancel = cancel.clone();
        tokio::task::spawn_blocking(move || {
            let results = service.classify_batch_with_progress(&texts, &cancel, |done, total| {
                tracing::debug!(done, total, "Progress");
            });
            (texts, results)
        })
    };
    tokio::pin!(worker);

    let (texts, results) = tokio::select! {
        joined = &mut worker => joined?,
        _ = signal::ctrl_c() => {
            tracing::info!("Interrupt received, cancelling remaining items");
            cancel.cancel();
            worker.await?
        }
    };

    let rows: Vec<ResultRow> = texts
        .iter()
        .zip(results)
        .map(|(text, result)| match result {
            Ok(row) => row,
            Err(RankingError::Cancelled) => ResultRow::needs_review(text.as_str()),
            Err(e) => {
                tracing::warn!(error = %e, text = %text, "Failed to rank text");
                ResultRow::needs_review(text.as_str())
            }
        })
        .collect();

    let layout = ExportLayout::for_config(&service.config());
    let mut out = BufWriter::new(io::stdout().lock());
    write_csv(&mut out, &layout, &rows)?;

    let stats = service.cache().stats();
    tracing::info!(
        rows = rows.len(),
        memory_hits = stats.memory_hits,
        disk_hits = stats.disk_hits,
        misses = stats.misses,
        "Categorizer finished"
    );
    Ok(())
}

/// Non-blank input lines, from the file named by the first argument or stdin.
fn read_input() -> io::Result<Vec<String>> {
    let data = match std::env::args().nth(1) {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut data = String::new();
            io::stdin().read_to_string(&mut data)?;
            data
        }
    };
    Ok(data
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect())
}
