//! Collaborator trait definitions for the promotion gate
//!
//! These traits define the external systems the gate talks to:
//! - `BlobStore`: Object storage reads (`get(bucket, key) -> bytes`)
//! - `EmailSender`: Transactional email dispatch
//! - `WorkflowStarter`: Starts a named training/evaluation workflow execution
//!
//! All traits are async and backend-agnostic. In-memory fakes are provided
//! for testing via the `fakes` module.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EmailError, StorageError, WorkflowError};

/// Result type for blob store operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;

// ---------------------------------------------------------------------------
// BlobStore: object storage
// ---------------------------------------------------------------------------

/// A `(bucket, key)` pair naming one object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlobLocation {
    pub bucket: String,
    pub key: String,
}

impl BlobLocation {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }
}

impl std::fmt::Display for BlobLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.bucket, self.key)
    }
}

/// Read-only object store.
///
/// Guarantees:
/// - `get` returns the exact bytes stored at `bucket/key`.
/// - A missing object yields `StorageError::NotFound`, never empty bytes.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Fetch the object at `bucket/key`.
    async fn get(&self, bucket: &str, key: &str) -> StorageResult<Vec<u8>>;

    /// Fetch the object named by `location`.
    async fn get_location(&self, location: &BlobLocation) -> StorageResult<Vec<u8>> {
        self.get(&location.bucket, &location.key).await
    }
}

// ---------------------------------------------------------------------------
// EmailSender: transactional email
// ---------------------------------------------------------------------------

/// A fully rendered email ready for dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailMessage {
    pub sender: String,
    pub recipient: String,
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
}

/// Acknowledgement returned by the email provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendReceipt {
    /// Provider-assigned message id
    pub message_id: String,
}

/// Transactional email sender.
///
/// A successful return means the provider accepted the message; delivery is
/// not confirmed. Sends are not deduplicated.
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> std::result::Result<SendReceipt, EmailError>;
}

// ---------------------------------------------------------------------------
// WorkflowStarter: workflow execution
// ---------------------------------------------------------------------------

/// Request to start one workflow execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowRequest {
    /// Identifier of the workflow definition (state machine ARN or equivalent)
    pub workflow_id: String,
    /// Execution name, unique per run
    pub execution_name: String,
    /// JSON input handed to the first workflow step
    pub input: serde_json::Value,
}

/// Handle to a started execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionHandle {
    pub execution_id: String,
    pub started_at: DateTime<Utc>,
}

/// Starts workflow executions.
#[async_trait]
pub trait WorkflowStarter: Send + Sync {
    async fn start(
        &self,
        request: &WorkflowRequest,
    ) -> std::result::Result<ExecutionHandle, WorkflowError>;
}
