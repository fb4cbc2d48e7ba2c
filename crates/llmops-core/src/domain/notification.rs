//! Rendered operator notifications.

use llmops_io::EmailMessage;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Which message a notification carries. Each kind has its own template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Promote,
    Reject,
    ApprovalRequest,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Promote => "promote",
            Self::Reject => "reject",
            Self::ApprovalRequest => "approval_request",
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Subject and bodies of one notification email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPayload {
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
}

impl NotificationPayload {
    /// SHA-256 over subject and both bodies, hex encoded.
    ///
    /// Identical payloads share a digest, which lets duplicate sends from
    /// re-invocations be correlated in the logs.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        for part in [&self.subject, &self.html_body, &self.text_body] {
            hasher.update((part.len() as u64).to_le_bytes());
            hasher.update(part.as_bytes());
        }
        hex::encode(hasher.finalize())
    }

    /// Address the payload.
    pub fn into_message(self, sender: &str, recipient: &str) -> EmailMessage {
        EmailMessage {
            sender: sender.to_string(),
            recipient: recipient.to_string(),
            subject: self.subject,
            html_body: self.html_body,
            text_body: self.text_body,
        }
    }
}
