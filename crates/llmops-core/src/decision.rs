//! Promotion decision engine.
//!
//! Compares the corpus-level F-measure of a customized model against its base
//! model and produces a [`PromotionOutcome`]. The customized model must score
//! strictly higher, so a tie is a rejection. There is no tolerance band.

use crate::domain::{PromotionOutcome, Result, ScoreTriple, ValidationError};

/// Require a non-blank model identifier.
///
/// The evaluation handler calls this before any I/O.
pub fn require_model_identifier(model_identifier: Option<&str>) -> Result<&str> {
    match model_identifier.map(str::trim) {
        Some(id) if !id.is_empty() => Ok(id),
        _ => Err(ValidationError::MissingModelIdentifier.into()),
    }
}

/// Decide whether the customized model is promoted.
///
/// `custom.f_measure() > base.f_measure()` promotes; anything else rejects.
/// Fails with [`ValidationError::MissingModelIdentifier`] for a blank
/// identifier.
pub fn decide(
    base: ScoreTriple,
    custom: ScoreTriple,
    model_identifier: &str,
) -> Result<PromotionOutcome> {
    let model_identifier = require_model_identifier(Some(model_identifier))?;

    if custom.f_measure() > base.f_measure() {
        Ok(PromotionOutcome::Promote {
            base_score: base,
            custom_score: custom,
            model_identifier: model_identifier.to_string(),
        })
    } else {
        Ok(PromotionOutcome::Reject {
            base_score: base,
            custom_score: custom,
        })
    }
}
