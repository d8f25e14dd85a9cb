use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use super::error::{VectorDbError, VectorDbResult};
use super::model::{Candidate, Hit};
use super::similarity::{DimensionPolicy, cosine_similarity};

/// Ranking order: higher score first, then ascending label, then insertion index.
#[inline]
fn rank_cmp(a: (f32, &str, usize), b: (f32, &str, usize)) -> Ordering {
    b.0.total_cmp(&a.0)
        .then_with(|| a.1.cmp(b.1))
        .then_with(|| a.2.cmp(&b.2))
}

/// Heap entry whose maximum is the worst-ranked element, so the heap root is evicted
/// first.
struct HeapEntry<'a> {
    score: f32,
    label: &'a str,
    index: usize,
}

impl HeapEntry<'_> {
    #[inline]
    fn key(&self) -> (f32, &str, usize) {
        (self.score, self.label, self.index)
    }
}

impl PartialEq for HeapEntry<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HeapEntry<'_> {}

impl PartialOrd for HeapEntry<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        rank_cmp(self.key(), other.key())
    }
}

/// Immutable set of candidates sharing one dimension.
#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    candidates: Vec<Candidate>,
    dim: Option<usize>,
}

impl CandidateSet {
    /// Validates that every candidate has the same, non-zero dimension.
    pub fn new(candidates: Vec<Candidate>) -> VectorDbResult<Self> {
        let mut dim = None;
        for candidate in &candidates {
            if candidate.vector.is_empty() {
                return Err(VectorDbError::EmptyVector {
                    label: candidate.label.clone(),
                });
            }
            match dim {
                None => dim = Some(candidate.dim()),
                Some(expected) if expected != candidate.dim() => {
                    return Err(VectorDbError::InconsistentDimensions {
                        label: candidate.label.clone(),
                        expected,
                        actual: candidate.dim(),
                    });
                }
                Some(_) => {}
            }
        }
        Ok(Self { candidates, dim })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Shared dimension, `None` for an empty set.
    #[inline]
    pub fn dim(&self) -> Option<usize> {
        self.dim
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
        self.candidates.iter()
    }

    /// Brute-force cosine top-`k`, sorted by descending score with ties broken by
    /// ascending label.
    ///
    /// `k == 0`, an empty query or an empty set give an empty result. Under
    /// [`DimensionPolicy::Strict`] a query of the wrong dimension is an error.
    pub fn search(
        &self,
        query: &[f32],
        k: usize,
        policy: DimensionPolicy,
    ) -> VectorDbResult<Vec<Hit<'_>>> {
        if k == 0 || query.is_empty() || self.candidates.is_empty() {
            return Ok(Vec::new());
        }

        if policy == DimensionPolicy::Strict
            && let Some(expected) = self.dim
            && expected != query.len()
        {
            return Err(VectorDbError::DimensionMismatch {
                expected,
                actual: query.len(),
            });
        }

        let mut heap: BinaryHeap<HeapEntry<'_>> = BinaryHeap::with_capacity(k.min(self.len()));
        for (index, candidate) in self.candidates.iter().enumerate() {
            let entry = HeapEntry {
                score: cosine_similarity(query, &candidate.vector),
                label: &candidate.label,
                index,
            };

            if heap.len() < k {
                heap.push(entry);
            } else if let Some(worst) = heap.peek()
                && entry < *worst
            {
                heap.pop();
                heap.push(entry);
            }
        }

        let mut ranked = heap.into_vec();
        ranked.sort();

        Ok(ranked
            .into_iter()
            .map(|entry| Hit {
                candidate: &self.candidates[entry.index],
                score: entry.score,
            })
            .collect())
    }

    /// Scores every candidate, same order as [`search`](Self::search).
    pub fn score_all(&self, query: &[f32], policy: DimensionPolicy) -> VectorDbResult<Vec<Hit<'_>>> {
        self.search(query, self.len(), policy)
    }
}

/// Many-reader store replaced wholesale on reload.
///
/// Readers take an [`Arc`] snapshot and search it without holding the lock, so they
/// see either the previous or the new complete set.
#[derive(Debug, Default)]
pub struct CandidateStore {
    current: RwLock<Arc<CandidateSet>>,
}

impl CandidateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current set.
    #[inline]
    pub fn snapshot(&self) -> Arc<CandidateSet> {
        Arc::clone(&self.current.read())
    }

    /// Validates `candidates` and swaps them in. On error the previous set is kept.
    pub fn replace(&self, candidates: Vec<Candidate>) -> VectorDbResult<usize> {
        let set = CandidateSet::new(candidates)?;
        let count = set.len();
        let dim = set.dim();
        *self.current.write() = Arc::new(set);
        debug!(count, ?dim, "Candidate set replaced");
        Ok(count)
    }

    pub fn clear(&self) {
        *self.current.write() = Arc::new(CandidateSet::empty());
    }

    pub fn len(&self) -> usize {
        self.current.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.read().is_empty()
    }
}
