//! Error types for llmops-io

use thiserror::Error;

/// Errors raised by a [`BlobStore`](crate::BlobStore).
#[derive(Error, Debug)]
pub enum StorageError {
    /// No object exists at the requested location
    #[error("Object not found: {bucket}/{key}")]
    NotFound { bucket: String, key: String },

    /// Caller is not allowed to read the object
    #[error("Access denied: {bucket}/{key}")]
    AccessDenied { bucket: String, key: String },

    /// Backend-specific failure (transport, unexpected status, ...)
    #[error("Storage backend failed: {0}")]
    Backend(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by an [`EmailSender`](crate::EmailSender).
#[derive(Error, Debug)]
pub enum EmailError {
    /// The provider refused or failed to accept the message
    #[error("Email send failed: {0}")]
    Send(String),

    /// The message was rejected before it reached the provider
    #[error("Invalid email message: {0}")]
    InvalidMessage(String),
}

/// Errors raised by a [`WorkflowStarter`](crate::WorkflowStarter).
#[derive(Error, Debug)]
pub enum WorkflowError {
    /// The workflow engine refused to start the execution
    #[error("Workflow start failed: {0}")]
    Start(String),

    /// An execution with the same name already exists
    #[error("Execution already exists: {0}")]
    AlreadyExists(String),

    /// JSON error while encoding the execution input
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<reqwest::Error> for StorageError {
    fn from(err: reqwest::Error) -> Self {
        StorageError::Backend(err.to_string())
    }
}

impl From<reqwest::Error> for EmailError {
    fn from(err: reqwest::Error) -> Self {
        EmailError::Send(err.to_string())
    }
}

impl From<reqwest::Error> for WorkflowError {
    fn from(err: reqwest::Error) -> Self {
        WorkflowError::Start(err.to_string())
    }
}
