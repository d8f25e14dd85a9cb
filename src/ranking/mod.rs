//! Ranking orchestration: embed, search, score, combine by mode, flag for review.
//!
//! [`RankingService`] is the entry point. It owns the embedding cache and the two
//! candidate stores; everything it calls is synchronous, and batch classification
//! parallelizes per text with rayon.

pub mod cancel;
pub mod error;
pub mod modes;
pub mod service;
pub mod types;


pub use cancel::CancellationToken;
pub use error::{RankingError, RankingResult};
pub use modes::{Combined, combine};
pub use service::RankingService;
pub use types::ResultRow;
