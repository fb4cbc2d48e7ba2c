//! In-memory fakes for collaborator traits (testing only)
//!
//! Provides `MemoryBlobStore`, `MemoryEmailSender`, and `MemoryWorkflowStarter`
//! that satisfy the trait contracts without any network access. Each fake can
//! be told to fail so error paths can be exercised.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::collaborators::*;
use crate::error::{EmailError, StorageError, WorkflowError};

// ---------------------------------------------------------------------------
// MemoryBlobStore
// ---------------------------------------------------------------------------

/// In-memory object store backed by a `HashMap<(bucket, key), bytes>`.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    objects: Mutex<HashMap<(String, String), Vec<u8>>>,
    denied: Mutex<HashSet<(String, String)>>,
    reads: AtomicUsize,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `data` at `bucket/key`, replacing any previous object.
    pub fn insert(&self, bucket: &str, key: &str, data: impl Into<Vec<u8>>) {
        let mut objects = self.objects.lock().unwrap();
        objects.insert((bucket.to_string(), key.to_string()), data.into());
    }

    /// Make every read of `bucket/key` fail with `AccessDenied`.
    pub fn deny(&self, bucket: &str, key: &str) {
        let mut denied = self.denied.lock().unwrap();
        denied.insert((bucket.to_string(), key.to_string()));
    }

    /// Number of `get` calls served (successful or not).
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn get(&self, bucket: &str, key: &str) -> StorageResult<Vec<u8>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let id = (bucket.to_string(), key.to_string());

        if self.denied.lock().unwrap().contains(&id) {
            return Err(StorageError::AccessDenied {
                bucket: id.0,
                key: id.1,
            });
        }

        let objects = self.objects.lock().unwrap();
        objects
            .get(&id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound {
                bucket: id.0.clone(),
                key: id.1.clone(),
            })
    }
}

// ---------------------------------------------------------------------------
// MemoryEmailSender
// ---------------------------------------------------------------------------

/// Email sender that records every accepted message.
#[derive(Debug, Default)]
pub struct MemoryEmailSender {
    sent: Mutex<Vec<EmailMessage>>,
    fail_with: Mutex<Option<String>>,
}

impl MemoryEmailSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sender whose every `send` fails with `EmailError::Send(reason)`.
    pub fn failing(reason: &str) -> Self {
        let sender = Self::default();
        *sender.fail_with.lock().unwrap() = Some(reason.to_string());
        sender
    }

    /// Snapshot of all accepted messages, in send order.
    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmailSender for MemoryEmailSender {
    async fn send(&self, message: &EmailMessage) -> std::result::Result<SendReceipt, EmailError> {
        if let Some(reason) = self.fail_with.lock().unwrap().clone() {
            return Err(EmailError::Send(reason));
        }
        if message.recipient.trim().is_empty() {
            return Err(EmailError::InvalidMessage("recipient is empty".to_string()));
        }

        let mut sent = self.sent.lock().unwrap();
        sent.push(message.clone());
        Ok(SendReceipt {
            message_id: format!("memory-{}", sent.len()),
        })
    }
}

// ---------------------------------------------------------------------------
// MemoryWorkflowStarter
// ---------------------------------------------------------------------------

/// Workflow starter that records requests and rejects duplicate execution names.
#[derive(Debug, Default)]
pub struct MemoryWorkflowStarter {
    started: Mutex<Vec<WorkflowRequest>>,
    fail_when_input_contains: Mutex<Vec<String>>,
}

impl MemoryWorkflowStarter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail any request whose serialized input contains `needle`.
    pub fn fail_when_input_contains(&self, needle: &str) {
        let mut needles = self.fail_when_input_contains.lock().unwrap();
        needles.push(needle.to_string());
    }

    /// Snapshot of all started requests, in start order.
    pub fn started(&self) -> Vec<WorkflowRequest> {
        self.started.lock().unwrap().clone()
    }
}

#[async_trait]
impl WorkflowStarter for MemoryWorkflowStarter {
    async fn start(
        &self,
        request: &WorkflowRequest,
    ) -> std::result::Result<ExecutionHandle, WorkflowError> {
        let input = serde_json::to_string(&request.input)?;
        let needles = self.fail_when_input_contains.lock().unwrap().clone();
        if let Some(needle) = needles.iter().find(|n| input.contains(n.as_str())) {
            return Err(WorkflowError::Start(format!(
                "injected failure for input containing '{needle}'"
            )));
        }

        let mut started = self.started.lock().unwrap();
        if started.iter().any(|r| {
            r.workflow_id == request.workflow_id && r.execution_name == request.execution_name
        }) {
            return Err(WorkflowError::AlreadyExists(request.execution_name.clone()));
        }
        started.push(request.clone());

        Ok(ExecutionHandle {
            execution_id: format!("{}:{}", request.workflow_id, request.execution_name),
            started_at: Utc::now(),
        })
    }
}
