//! Domain-level error taxonomy for the promotion gate.

use llmops_io::{EmailError, StorageError, WorkflowError};
use serde::Serialize;

use super::notification::NotificationKind;

/// Errors produced by trigger payload validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("model identifier is required but was not provided")]
    MissingModelIdentifier,

    #[error("event missing required field: {field}")]
    MissingField { field: String },

    #[error("event contains no records")]
    EmptyEvent,

    #[error("corpus must contain at least one example")]
    EmptyCorpus,

    #[error("malformed event: {0}")]
    MalformedEvent(String),

    #[error("api base URL must be an http(s) URL: {value}")]
    InvalidApiBaseUrl { value: String },
}

/// Failures reported by an external collaborator, sub-typed by collaborator.
#[derive(Debug, thiserror::Error)]
pub enum CollaboratorError {
    #[error("storage: {0}")]
    Storage(#[from] StorageError),

    #[error("workflow: {0}")]
    Workflow(#[from] WorkflowError),
}

/// Stable, machine-readable classification of a [`GateError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Alignment,
    CorpusFormat,
    Collaborator,
    Notification,
    InternalScoring,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Alignment => "alignment",
            Self::CorpusFormat => "corpus_format",
            Self::Collaborator => "collaborator",
            Self::Notification => "notification",
            Self::InternalScoring => "internal_scoring",
        }
    }

    /// HTTP-style status reported to the caller for this kind.
    pub fn status_code(self) -> u16 {
        match self {
            Self::Validation => 400,
            Self::Alignment | Self::CorpusFormat => 422,
            Self::Collaborator | Self::Notification => 502,
            Self::InternalScoring => 500,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Promotion gate errors.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("corpus misaligned: {hypotheses} hypotheses vs {references} references")]
    Alignment { hypotheses: usize, references: usize },

    #[error("malformed corpus at {location}: {reason}")]
    CorpusFormat { location: String, reason: String },

    #[error("collaborator error: {0}")]
    Collaborator(#[from] CollaboratorError),

    /// The decision (or request) was made but the email never left.
    #[error("{kind} notification was not sent: {source}")]
    Notification {
        kind: NotificationKind,
        #[source]
        source: EmailError,
    },

    #[error("internal scoring error: {0}")]
    InternalScoring(String),
}

impl GateError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Alignment { .. } => ErrorKind::Alignment,
            Self::CorpusFormat { .. } => ErrorKind::CorpusFormat,
            Self::Collaborator(_) => ErrorKind::Collaborator,
            Self::Notification { .. } => ErrorKind::Notification,
            Self::InternalScoring(_) => ErrorKind::InternalScoring,
        }
    }

    /// Teardown signal of an evaluation whose decision was made before the
    /// failure. `None` when no decision was reached.
    pub fn teardown_signal(&self) -> Option<bool> {
        match self {
            Self::Notification {
                kind: NotificationKind::Promote,
                ..
            } => Some(false),
            Self::Notification {
                kind: NotificationKind::Reject,
                ..
            } => Some(true),
            _ => None,
        }
    }
}

impl From<StorageError> for GateError {
    fn from(err: StorageError) -> Self {
        GateError::Collaborator(CollaboratorError::Storage(err))
    }
}

impl From<WorkflowError> for GateError {
    fn from(err: WorkflowError) -> Self {
        GateError::Collaborator(CollaboratorError::Workflow(err))
    }
}

/// Result type for promotion gate operations.
pub type Result<T> = std::result::Result<T, GateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_is_collaborator_kind() {
        let err: GateError = StorageError::NotFound {
            bucket: "b".to_string(),
            key: "k".to_string(),
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::Collaborator);
        assert!(err.to_string().contains("b/k"));
    }

    #[test]
    fn test_notification_error_names_kind() {
        let err = GateError::Notification {
            kind: NotificationKind::Promote,
            source: EmailError::Send("throttled".to_string()),
        };
        assert_eq!(err.kind(), ErrorKind::Notification);
        assert_eq!(err.teardown_signal(), Some(false));
        let msg = err.to_string();
        assert!(msg.contains("promote"));
        assert!(msg.contains("throttled"));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ErrorKind::Validation.status_code(), 400);
        assert_eq!(ErrorKind::Alignment.status_code(), 422);
        assert_eq!(ErrorKind::Collaborator.status_code(), 502);
        assert_eq!(ErrorKind::InternalScoring.status_code(), 500);
    }
}
