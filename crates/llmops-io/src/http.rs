//! HTTP clients for remote collaborators
//!
//! Thin `reqwest` adapters that speak JSON to an object-storage gateway, a
//! transactional email API and a workflow engine API. Authentication is a
//! single optional bearer token per client.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::collaborators::*;
use crate::error::{EmailError, StorageError, WorkflowError};

const USER_AGENT: &str = concat!("llmops-io/", env!("CARGO_PKG_VERSION"));

fn build_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder().user_agent(USER_AGENT).build()
}

fn with_token(builder: reqwest::RequestBuilder, token: &Option<String>) -> reqwest::RequestBuilder {
    match token {
        Some(token) => builder.bearer_auth(token),
        None => builder,
    }
}

// ---------------------------------------------------------------------------
// HttpBlobStore
// ---------------------------------------------------------------------------

/// Object store reached through an HTTP gateway: `GET {base}/{bucket}/{key}`.
pub struct HttpBlobStore {
    base_url: Url,
    token: Option<String>,
    client: reqwest::Client,
}

impl HttpBlobStore {
    pub fn new(base_url: &str) -> StorageResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| StorageError::Backend(format!("invalid base url '{base_url}': {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(StorageError::Backend(format!(
                "base url '{base_url}' cannot carry a path"
            )));
        }
        Ok(Self {
            base_url,
            token: None,
            client: build_client()?,
        })
    }

    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    fn object_url(&self, bucket: &str, key: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(bucket).extend(key.split('/'));
        }
        url
    }
}

#[async_trait]
impl BlobStore for HttpBlobStore {
    async fn get(&self, bucket: &str, key: &str) -> StorageResult<Vec<u8>> {
        let url = self.object_url(bucket, key);
        debug!(%url, "fetching object");

        let response = with_token(self.client.get(url), &self.token).send().await?;
        match response.status() {
            status if status.is_success() => Ok(response.bytes().await?.to_vec()),
            StatusCode::NOT_FOUND => Err(StorageError::NotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            }),
            StatusCode::FORBIDDEN | StatusCode::UNAUTHORIZED => Err(StorageError::AccessDenied {
                bucket: bucket.to_string(),
                key: key.to_string(),
            }),
            status => Err(StorageError::Backend(format!(
                "unexpected status {status} for {bucket}/{key}"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// HttpEmailSender
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SendEmailResponse {
    message_id: String,
}

/// Email sender for a JSON transactional-email API.
pub struct HttpEmailSender {
    endpoint: Url,
    token: Option<String>,
    client: reqwest::Client,
}

impl HttpEmailSender {
    pub fn new(endpoint: &str) -> Result<Self, EmailError> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| EmailError::Send(format!("invalid endpoint '{endpoint}': {e}")))?;
        Ok(Self {
            endpoint,
            token: None,
            client: build_client()?,
        })
    }

    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    fn request_body(message: &EmailMessage) -> serde_json::Value {
        json!({
            "FromEmailAddress": message.sender,
            "Destination": { "ToAddresses": [message.recipient] },
            "Content": {
                "Simple": {
                    "Subject": { "Data": message.subject },
                    "Body": {
                        "Html": { "Data": message.html_body, "Charset": "UTF-8" },
                        "Text": { "Data": message.text_body, "Charset": "UTF-8" }
                    }
                }
            }
        })
    }
}

#[async_trait]
impl EmailSender for HttpEmailSender {
    async fn send(&self, message: &EmailMessage) -> std::result::Result<SendReceipt, EmailError> {
        let response = with_token(self.client.post(self.endpoint.clone()), &self.token)
            .json(&Self::request_body(message))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(EmailError::Send(format!("provider returned {status}: {detail}")));
        }

        let body: SendEmailResponse = response.json().await?;
        Ok(SendReceipt {
            message_id: body.message_id,
        })
    }
}

// ---------------------------------------------------------------------------
// HttpWorkflowStarter
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StartExecutionRequest<'a> {
    state_machine_arn: &'a str,
    name: &'a str,
    input: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StartExecutionResponse {
    execution_arn: String,
    start_date: Option<DateTime<Utc>>,
}

/// Workflow starter for a JSON state-machine API.
pub struct HttpWorkflowStarter {
    endpoint: Url,
    token: Option<String>,
    client: reqwest::Client,
}

impl HttpWorkflowStarter {
    pub fn new(endpoint: &str) -> Result<Self, WorkflowError> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| WorkflowError::Start(format!("invalid endpoint '{endpoint}': {e}")))?;
        Ok(Self {
            endpoint,
            token: None,
            client: build_client()?,
        })
    }

    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }
}

#[async_trait]
impl WorkflowStarter for HttpWorkflowStarter {
    async fn start(
        &self,
        request: &WorkflowRequest,
    ) -> std::result::Result<ExecutionHandle, WorkflowError> {
        let body = StartExecutionRequest {
            state_machine_arn: &request.workflow_id,
            name: &request.execution_name,
            input: serde_json::to_string(&request.input)?,
        };

        let response = with_token(self.client.post(self.endpoint.clone()), &self.token)
            .json(&body)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {
                let body: StartExecutionResponse = response.json().await?;
                Ok(ExecutionHandle {
                    execution_id: body.execution_arn,
                    started_at: body.start_date.unwrap_or_else(Utc::now),
                })
            }
            StatusCode::CONFLICT => Err(WorkflowError::AlreadyExists(
                request.execution_name.clone(),
            )),
            status => {
                let detail = response.text().await.unwrap_or_default();
                Err(WorkflowError::Start(format!(
                    "workflow engine returned {status}: {detail}"
                )))
            }
        }
    }
}
