//! Promotion outcomes.

use serde::{Deserialize, Serialize};

use super::notification::NotificationKind;
use super::score::ScoreTriple;

/// The decision taken for one evaluation invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PromotionOutcome {
    /// The customized model measurably beat the base model.
    Promote {
        base_score: ScoreTriple,
        custom_score: ScoreTriple,
        model_identifier: String,
    },
    /// No measurable improvement (ties included).
    Reject {
        base_score: ScoreTriple,
        custom_score: ScoreTriple,
    },
}

impl PromotionOutcome {
    pub fn is_promote(&self) -> bool {
        matches!(self, Self::Promote { .. })
    }

    /// Whether the temporary evaluation capacity may be released.
    ///
    /// Promoted models keep their capacity; rejected ones do not need it.
    pub fn teardown_signal(&self) -> bool {
        matches!(self, Self::Reject { .. })
    }

    pub fn base_score(&self) -> ScoreTriple {
        match self {
            Self::Promote { base_score, .. } | Self::Reject { base_score, .. } => *base_score,
        }
    }

    pub fn custom_score(&self) -> ScoreTriple {
        match self {
            Self::Promote { custom_score, .. } | Self::Reject { custom_score, .. } => {
                *custom_score
            }
        }
    }

    pub fn label(&self) -> &'static str {
        self.notification_kind().as_str()
    }

    /// The notification that reports this outcome.
    pub fn notification_kind(&self) -> NotificationKind {
        match self {
            Self::Promote { .. } => NotificationKind::Promote,
            Self::Reject { .. } => NotificationKind::Reject,
        }
    }
}
