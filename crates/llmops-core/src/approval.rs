//! Approval-gate notifier.
//!
//! When a model package lands in the registry awaiting review, mails the
//! operator a request carrying approve/reject links for that package
//! version.

use std::sync::Arc;

use llmops_io::{EmailSender, SendReceipt};
use serde::{Deserialize, Serialize};

use crate::config::ApprovalConfig;
use crate::domain::{GateError, NotificationKind, NotificationPayload, Result, ValidationError};
use crate::metrics::METRICS;
use crate::notify::{escape_html, percent_encode, NotificationComposer};
use crate::obs;

/// Registry state-change event: `{"detail": {...}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageEvent {
    #[serde(default)]
    pub detail: PackageDetail,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PackageDetail {
    #[serde(default)]
    pub model_package_group_name: Option<String>,
    #[serde(default)]
    pub model_package_arn: Option<String>,
    #[serde(default, deserialize_with = "version_as_string")]
    pub model_package_version: Option<String>,
}

/// Registries report the version as a number; accept strings as well.
fn version_as_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

impl PackageEvent {
    pub fn from_value(value: serde_json::Value) -> std::result::Result<Self, ValidationError> {
        serde_json::from_value(value).map_err(|e| ValidationError::MalformedEvent(e.to_string()))
    }
}

/// A validated package awaiting review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingPackage {
    pub group_name: String,
    pub arn: String,
    pub version: String,
}

impl TryFrom<&PackageEvent> for PendingPackage {
    type Error = ValidationError;

    fn try_from(event: &PackageEvent) -> std::result::Result<Self, Self::Error> {
        fn field(value: &Option<String>, name: &str) -> std::result::Result<String, ValidationError> {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .ok_or_else(|| ValidationError::MissingField {
                    field: name.to_string(),
                })
        }

        let detail = &event.detail;
        Ok(Self {
            group_name: field(&detail.model_package_group_name, "detail.ModelPackageGroupName")?,
            arn: field(&detail.model_package_arn, "detail.ModelPackageArn")?,
            version: detail
                .model_package_version
                .as_deref()
                .map(str::trim)
                .unwrap_or_default()
                .to_string(),
        })
    }
}

/// `{api}/{action}?arn=..&version=..` with query values percent-encoded.
pub fn decision_link(api_base_url: &str, action: &str, package: &PendingPackage) -> String {
    format!(
        "{}/{}?arn={}&version={}",
        api_base_url.trim_end_matches('/'),
        action,
        percent_encode(&package.arn),
        percent_encode(&package.version)
    )
}

/// Subject line of an approval request.
pub fn approval_subject(group_name: &str) -> String {
    format!("Model Approval Required - {group_name}")
}

/// Mails approval requests for pending model packages.
#[derive(Clone)]
pub struct ApprovalNotifier {
    email: Arc<dyn EmailSender>,
    composer: NotificationComposer,
    config: ApprovalConfig,
}

impl ApprovalNotifier {
    pub fn new(email: Arc<dyn EmailSender>, config: ApprovalConfig) -> Self {
        Self {
            email,
            composer: NotificationComposer::default(),
            config,
        }
    }

    pub fn with_composer(mut self, composer: NotificationComposer) -> Self {
        self.composer = composer;
        self
    }

    /// Render the request for `package`.
    pub fn compose(&self, package: &PendingPackage) -> NotificationPayload {
        let approve = decision_link(&self.config.api_base_url, "approve", package);
        let reject = decision_link(&self.config.api_base_url, "reject", package);
        let group = escape_html(&package.group_name);
        let version = escape_html(&package.version);
        let approve = escape_html(&approve);
        let reject = escape_html(&reject);

        self.composer.render(
            NotificationKind::ApprovalRequest,
            &approval_subject(&package.group_name),
            &[
                ("model_package_group_name", group.as_str()),
                ("model_package_version", version.as_str()),
                ("approve_url", approve.as_str()),
                ("reject_url", reject.as_str()),
            ],
        )
    }

    /// Validate the event and send the request.
    pub async fn notify(&self, event: &PackageEvent) -> Result<SendReceipt> {
        let package = PendingPackage::try_from(event)?;
        METRICS.inc_approval_requests();
        let kind = NotificationKind::ApprovalRequest;
        let payload = self.compose(&package);
        let digest = payload.digest();

        let message = payload.into_message(&self.config.sender, &self.config.recipient);
        match self.email.send(&message).await {
            Ok(receipt) => {
                obs::emit_approval_requested(&package.group_name, &package.version);
                obs::emit_notification_sent(kind, &receipt.message_id, &digest);
                Ok(receipt)
            }
            Err(source) => {
                METRICS.inc_notification_failures();
                obs::emit_notification_failed(kind, &source);
                Err(GateError::Notification { kind, source })
            }
        }
    }
}

impl std::fmt::Debug for ApprovalNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApprovalNotifier")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
