//! External JSON responses returned by the handlers.
//!
//! Every response carries an HTTP-style `statusCode`. Failures share one
//! shape: `{"statusCode", "errorKind", "message"}`, plus
//! `deleteProvisionedThroughput` when an evaluation decided before failing.

use serde::Serialize;

use crate::domain::{ErrorKind, GateError};
use crate::evaluation::EvaluationCompleted;
use crate::launcher::LaunchReport;

/// Failure response for any handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub status_code: u16,
    pub error_kind: ErrorKind,
    pub message: String,
    /// Set when an evaluation decided before failing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete_provisioned_throughput: Option<bool>,
}

impl From<&GateError> for ErrorResponse {
    fn from(err: &GateError) -> Self {
        let kind = err.kind();
        Self {
            status_code: kind.status_code(),
            error_kind: kind,
            message: err.to_string(),
            delete_provisioned_throughput: err.teardown_signal(),
        }
    }
}

/// Response of the evaluation handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum EvaluationResponse {
    #[serde(rename_all = "camelCase")]
    Completed {
        status_code: u16,
        /// Whether the provisioned evaluation capacity may be deleted.
        delete_provisioned_throughput: bool,
    },
    Failed(ErrorResponse),
}

impl EvaluationResponse {
    pub fn from_result(result: &Result<EvaluationCompleted, GateError>) -> Self {
        match result {
            Ok(done) => Self::Completed {
                status_code: 200,
                delete_provisioned_throughput: done.teardown_signal,
            },
            Err(err) => Self::Failed(err.into()),
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            Self::Completed { status_code, .. } => *status_code,
            Self::Failed(err) => err.status_code,
        }
    }
}

/// Response of the approval-gate notifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ApprovalResponse {
    #[serde(rename_all = "camelCase")]
    Sent { status_code: u16, message: String },
    Failed(ErrorResponse),
}

impl ApprovalResponse {
    pub const SENT_MESSAGE: &'static str = "Email sent successfully";

    pub fn from_result<T>(result: &Result<T, GateError>) -> Self {
        match result {
            Ok(_) => Self::Sent {
                status_code: 200,
                message: Self::SENT_MESSAGE.to_string(),
            },
            Err(err) => Self::Failed(err.into()),
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            Self::Sent { status_code, .. } => *status_code,
            Self::Failed(err) => err.status_code,
        }
    }
}

/// Response of the workflow launcher.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LaunchResponse {
    #[serde(rename_all = "camelCase")]
    Launched {
        status_code: u16,
        #[serde(flatten)]
        report: LaunchReport,
    },
    Failed(ErrorResponse),
}

impl LaunchResponse {
    pub fn from_result(result: &Result<LaunchReport, GateError>) -> Self {
        match result {
            Ok(report) => Self::Launched {
                status_code: report.status_code(),
                report: report.clone(),
            },
            Err(err) => Self::Failed(err.into()),
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            Self::Launched { status_code, .. } => *status_code,
            Self::Failed(err) => err.status_code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use llmops_io::EmailError;

    use crate::domain::{NotificationKind, PromotionOutcome, ScoreTriple, ValidationError};

    fn rejected() -> EvaluationCompleted {
        let score = ScoreTriple::new(0.5, 0.5, 0.5).unwrap();
        EvaluationCompleted {
            outcome: PromotionOutcome::Reject {
                base_score: score,
                custom_score: score,
            },
            teardown_signal: true,
            payload_digest: String::new(),
            message_id: "memory-1".to_string(),
        }
    }

    #[test]
    fn test_evaluation_success_shape() {
        let json = serde_json::to_value(EvaluationResponse::from_result(&Ok(rejected()))).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"statusCode": 200, "deleteProvisionedThroughput": true})
        );
    }

    #[test]
    fn test_failure_shape() {
        let err: GateError = ValidationError::MissingModelIdentifier.into();
        let response = EvaluationResponse::from_result(&Err(err));
        assert_eq!(response.status_code(), 400);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["errorKind"], "validation");
        assert!(json["message"]
            .as_str()
            .unwrap()
            .contains("model identifier"));
        assert!(json.get("deleteProvisionedThroughput").is_none());
    }

    #[test]
    fn test_notification_failure_keeps_teardown_signal() {
        let err = GateError::Notification {
            kind: NotificationKind::Reject,
            source: EmailError::Send("throttled".to_string()),
        };
        let json = serde_json::to_value(EvaluationResponse::from_result(&Err(err))).unwrap();
        assert_eq!(json["statusCode"], 502);
        assert_eq!(json["errorKind"], "notification");
        assert_eq!(json["deleteProvisionedThroughput"], true);
    }

    #[test]
    fn test_approval_success_message() {
        let json = serde_json::to_value(ApprovalResponse::from_result(&Ok::<_, GateError>(())))
            .unwrap();
        assert_eq!(
            json,
            serde_json::json!({"statusCode": 200, "message": "Email sent successfully"})
        );
    }
}
