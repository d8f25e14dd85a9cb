//! Candidate label vectors and brute-force cosine search.
//!
//! A [`CandidateStore`] holds one pool (seed or taxonomy) as an immutable
//! [`CandidateSet`]; search is exhaustive, which is fine for label pools in the
//! hundreds.

pub mod error;
pub mod model;
pub mod similarity;
pub mod store;

#[cfg(test)]
mod tests;

pub use error::{VectorDbError, VectorDbResult};
pub use model::{Candidate, CandidateSource, Hit};
pub use similarity::{DimensionPolicy, checked_cosine, cosine_similarity};
pub use store::{CandidateSet, CandidateStore};
