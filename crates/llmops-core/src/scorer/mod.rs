//! Scorer adapter.
//!
//! Wraps a pluggable [`SimilarityScorer`] backend behind the fixed numeric
//! contract the decision engine relies on: aligned corpora in, one
//! [`ScoreTriple`] out. The adapter owns alignment checking, averaging and
//! sanity checks on whatever the backend returns.

pub mod greedy;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::{Corpus, GateError, Result, ScoreTriple};

pub use greedy::{GreedyMatchScorer, HashedTrigramEmbedder, TokenEmbedder};

/// Scores of a single (hypothesis, reference) pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PairScore {
    pub precision: f64,
    pub recall: f64,
    pub f_measure: f64,
}

impl PairScore {
    fn in_range(&self) -> bool {
        [self.precision, self.recall, self.f_measure]
            .iter()
            .all(|v| v.is_finite() && (0.0..=1.0).contains(v))
    }
}

/// Failure inside a scoring backend.
#[derive(Debug, thiserror::Error)]
#[error("{backend}: {reason}")]
pub struct ScorerError {
    pub backend: String,
    pub reason: String,
}

/// A semantic-similarity scorer comparing texts pairwise.
///
/// Implementations must be deterministic: the same inputs always produce the
/// same scores. They may be expensive; callers run them on blocking threads.
pub trait SimilarityScorer: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Score `hypotheses[i]` against `references[i]` for every `i`.
    ///
    /// Callers guarantee both slices have the same, non-zero length.
    fn score_pairs(
        &self,
        hypotheses: &[String],
        references: &[String],
    ) -> std::result::Result<Vec<PairScore>, ScorerError>;
}

/// Corpus-level scoring with the contract checks applied.
#[derive(Clone)]
pub struct ScorerAdapter {
    backend: Arc<dyn SimilarityScorer>,
}

impl ScorerAdapter {
    pub fn new(backend: impl SimilarityScorer + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    pub fn from_shared(backend: Arc<dyn SimilarityScorer>) -> Self {
        Self { backend }
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Score `hypotheses` against `references`.
    ///
    /// Fails with [`GateError::Alignment`] when the corpora differ in length
    /// and with [`GateError::InternalScoring`] when the backend errors or
    /// breaks its contract.
    pub fn score(&self, hypotheses: &Corpus, references: &Corpus) -> Result<ScoreTriple> {
        if hypotheses.len() != references.len() {
            return Err(GateError::Alignment {
                hypotheses: hypotheses.len(),
                references: references.len(),
            });
        }

        let pairs = self
            .backend
            .score_pairs(hypotheses.texts(), references.texts())
            .map_err(|e| GateError::InternalScoring(e.to_string()))?;

        if pairs.len() != hypotheses.len() {
            return Err(GateError::InternalScoring(format!(
                "{} returned {} pair scores for {} pairs",
                self.backend.name(),
                pairs.len(),
                hypotheses.len()
            )));
        }
        if let Some(index) = pairs.iter().position(|p| !p.in_range()) {
            return Err(GateError::InternalScoring(format!(
                "{} returned out-of-range score {:?} for pair {index}",
                self.backend.name(),
                pairs[index]
            )));
        }

        let n = pairs.len() as f64;
        let mean = |f: fn(&PairScore) -> f64| pairs.iter().map(f).sum::<f64>() / n;
        ScoreTriple::new(
            mean(|p| p.precision).clamp(0.0, 1.0),
            mean(|p| p.recall).clamp(0.0, 1.0),
            mean(|p| p.f_measure).clamp(0.0, 1.0),
        )
    }
}

impl Default for ScorerAdapter {
    fn default() -> Self {
        Self::new(GreedyMatchScorer::<HashedTrigramEmbedder>::default())
    }
}

impl std::fmt::Debug for ScorerAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScorerAdapter")
            .field("backend", &self.backend.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Constant(PairScore);

    impl SimilarityScorer for Constant {
        fn name(&self) -> &str {
            "constant"
        }

        fn score_pairs(
            &self,
            hypotheses: &[String],
            _references: &[String],
        ) -> std::result::Result<Vec<PairScore>, ScorerError> {
            Ok(vec![self.0; hypotheses.len()])
        }
    }

    struct Short;

    impl SimilarityScorer for Short {
        fn name(&self) -> &str {
            "short"
        }

        fn score_pairs(
            &self,
            _hypotheses: &[String],
            _references: &[String],
        ) -> std::result::Result<Vec<PairScore>, ScorerError> {
            Ok(Vec::new())
        }
    }

    fn corpus(n: usize) -> Corpus {
        Corpus::from_texts((0..n).map(|i| format!("text {i}"))).unwrap()
    }

    #[test]
    fn test_misaligned_corpora() {
        let adapter = ScorerAdapter::default();
        let err = adapter.score(&corpus(9), &corpus(10)).unwrap_err();
        assert!(matches!(
            err,
            GateError::Alignment {
                hypotheses: 9,
                references: 10
            }
        ));
    }

    #[test]
    fn test_means_backend_scores() {
        let adapter = ScorerAdapter::new(Constant(PairScore {
            precision: 0.5,
            recall: 0.25,
            f_measure: 0.75,
        }));
        let triple = adapter.score(&corpus(3), &corpus(3)).unwrap();
        assert_eq!(triple.precision(), 0.5);
        assert_eq!(triple.recall(), 0.25);
        assert_eq!(triple.f_measure(), 0.75);
    }

    #[test]
    fn test_backend_contract_violations() {
        let adapter = ScorerAdapter::new(Short);
        let err = adapter.score(&corpus(2), &corpus(2)).unwrap_err();
        assert!(matches!(err, GateError::InternalScoring(_)));

        let adapter = ScorerAdapter::new(Constant(PairScore {
            precision: 1.5,
            recall: 0.5,
            f_measure: 0.5,
        }));
        let err = adapter.score(&corpus(2), &corpus(2)).unwrap_err();
        assert!(matches!(err, GateError::InternalScoring(_)));
    }
}
