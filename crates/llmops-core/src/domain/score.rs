//! Corpus-level score triples.

use serde::{Deserialize, Serialize};

use super::error::GateError;

/// Precision, recall and F-measure of one candidate corpus against a
/// reference corpus.
///
/// # Invariants
///
/// Every component is finite and within `[0.0, 1.0]`. Only `f_measure` takes
/// part in the promotion decision; precision and recall are reported.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawScoreTriple")]
pub struct ScoreTriple {
    precision: f64,
    recall: f64,
    f_measure: f64,
}

#[derive(Deserialize)]
struct RawScoreTriple {
    precision: f64,
    recall: f64,
    f_measure: f64,
}

impl TryFrom<RawScoreTriple> for ScoreTriple {
    type Error = GateError;

    fn try_from(raw: RawScoreTriple) -> Result<Self, Self::Error> {
        Self::new(raw.precision, raw.recall, raw.f_measure)
    }
}

impl ScoreTriple {
    /// Create a triple, rejecting values outside `[0.0, 1.0]` as an internal
    /// scoring error.
    pub fn new(precision: f64, recall: f64, f_measure: f64) -> Result<Self, GateError> {
        for (name, value) in [
            ("precision", precision),
            ("recall", recall),
            ("f_measure", f_measure),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(GateError::InternalScoring(format!(
                    "{name} {value} outside [0, 1]"
                )));
            }
        }
        Ok(Self {
            precision,
            recall,
            f_measure,
        })
    }

    pub fn precision(&self) -> f64 {
        self.precision
    }

    pub fn recall(&self) -> f64 {
        self.recall
    }

    pub fn f_measure(&self) -> f64 {
        self.f_measure
    }
}

impl std::fmt::Display for ScoreTriple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.precision, self.recall, self.f_measure)
    }
}
