//! Evaluation handler.
//!
//! One invocation runs a single pass:
//!
//! 1. validate the trigger (no I/O before this succeeds)
//! 2. load the reference, base and custom corpora
//! 3. score base and custom against the references on blocking threads
//! 4. decide
//! 5. compose and send the notification
//!
//! Any failure ends the invocation. Nothing is retried.

use std::sync::Arc;

use llmops_io::{BlobStore, EmailSender};
use serde::{Deserialize, Serialize};

use crate::config::EvaluationConfig;
use crate::decision::{decide, require_model_identifier};
use crate::domain::{Corpus, GateError, PromotionOutcome, Result, ScoreTriple, ValidationError};
use crate::loader::CorpusLoader;
use crate::metrics::METRICS;
use crate::notify::{is_http_url, NotificationComposer};
use crate::obs;
use crate::scorer::ScorerAdapter;

// ---------------------------------------------------------------------------
// Trigger
// ---------------------------------------------------------------------------

/// Payload that starts an evaluation.
///
/// Accepts either `{"modelIdentifier": "...", "apiBaseUrl": "..."}` or the
/// workflow-state shape `{"input": {"ProvisionedModelArn": "..."}}`, or both;
/// top-level fields win. A blank or absent identifier is kept as-is and
/// rejected by the handler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawTrigger", rename_all = "camelCase")]
pub struct EvaluationTrigger {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_identifier: Option<String>,
    /// Overrides the configured approval API base URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,
}

impl EvaluationTrigger {
    pub fn new(model_identifier: impl Into<String>) -> Self {
        Self {
            model_identifier: Some(model_identifier.into()),
            api_base_url: None,
        }
    }

    pub fn with_api_base_url(mut self, api_base_url: impl Into<String>) -> Self {
        self.api_base_url = Some(api_base_url.into());
        self
    }

    /// The API base URL override, if one was given. A blank override counts
    /// as absent; anything else must be an http(s) URL.
    pub fn api_base_url_override(&self) -> Result<Option<&str>> {
        match self.api_base_url.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(url) if is_http_url(url) => Ok(Some(url)),
            Some(url) => Err(ValidationError::InvalidApiBaseUrl {
                value: url.to_string(),
            }
            .into()),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTrigger {
    #[serde(default)]
    model_identifier: Option<String>,
    #[serde(default)]
    api_base_url: Option<String>,
    #[serde(default)]
    input: Option<WorkflowStateInput>,
}

#[derive(Deserialize)]
struct WorkflowStateInput {
    #[serde(rename = "ProvisionedModelArn", default)]
    provisioned_model_arn: Option<String>,
    #[serde(rename = "apiBaseUrl", default)]
    api_base_url: Option<String>,
}

/// Top-level fields win over their `input` counterparts.
impl From<RawTrigger> for EvaluationTrigger {
    fn from(raw: RawTrigger) -> Self {
        let (input_identifier, input_api_base_url) = match raw.input {
            Some(input) => (input.provisioned_model_arn, input.api_base_url),
            None => (None, None),
        };
        Self {
            model_identifier: raw.model_identifier.or(input_identifier),
            api_base_url: raw.api_base_url.or(input_api_base_url),
        }
    }
}

// ---------------------------------------------------------------------------
// Handler
// ---------------------------------------------------------------------------

/// Result of a completed evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationCompleted {
    pub outcome: PromotionOutcome,
    /// `true` when the evaluation capacity may be released.
    pub teardown_signal: bool,
    /// Digest of the notification that was sent.
    pub payload_digest: String,
    pub message_id: String,
}

/// Scores a customized model against its base and notifies the operator.
///
/// Collaborators are injected; the handler holds no state across
/// invocations and can be shared between concurrent ones.
#[derive(Clone)]
pub struct EvaluationHandler {
    loader: CorpusLoader,
    email: Arc<dyn EmailSender>,
    scorer: ScorerAdapter,
    composer: NotificationComposer,
    config: EvaluationConfig,
}

impl EvaluationHandler {
    /// Handler with the default scorer and built-in templates.
    pub fn new(
        store: Arc<dyn BlobStore>,
        email: Arc<dyn EmailSender>,
        config: EvaluationConfig,
    ) -> Self {
        Self {
            loader: CorpusLoader::new(store),
            email,
            scorer: ScorerAdapter::default(),
            composer: NotificationComposer::default(),
            config,
        }
    }

    pub fn with_scorer(mut self, scorer: ScorerAdapter) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn with_composer(mut self, composer: NotificationComposer) -> Self {
        self.composer = composer;
        self
    }

    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    pub async fn handle(&self, trigger: &EvaluationTrigger) -> Result<EvaluationCompleted> {
        let model_identifier = require_model_identifier(trigger.model_identifier.as_deref())?;
        let api_base_url = trigger
            .api_base_url_override()?
            .unwrap_or(self.config.api_base_url.as_str());
        METRICS.inc_evaluations();
        obs::emit_evaluation_started(model_identifier);

        let reference = self.loader.load(&self.config.reference).await?;
        let base = self.loader.load(&self.config.base).await?;
        let custom = self.loader.load(&self.config.custom).await?;

        let (base_score, custom_score) = tokio::try_join!(
            self.score_blocking("base", base, reference.clone()),
            self.score_blocking("custom", custom, reference),
        )?;

        let outcome = decide(base_score, custom_score, model_identifier)?;
        METRICS.record_decision(outcome.is_promote());
        obs::emit_decision_made(&outcome);

        let payload = self.composer.compose(&outcome, api_base_url);
        let payload_digest = payload.digest();
        let kind = outcome.notification_kind();

        let message = payload.into_message(&self.config.sender, &self.config.recipient);
        let receipt = match self.email.send(&message).await {
            Ok(receipt) => receipt,
            Err(source) => {
                METRICS.inc_notification_failures();
                obs::emit_notification_failed(kind, &source);
                return Err(GateError::Notification { kind, source });
            }
        };
        obs::emit_notification_sent(kind, &receipt.message_id, &payload_digest);

        Ok(EvaluationCompleted {
            teardown_signal: outcome.teardown_signal(),
            outcome,
            payload_digest,
            message_id: receipt.message_id,
        })
    }

    /// Score on a blocking thread. A panicked or cancelled task is an
    /// internal scoring error.
    async fn score_blocking(
        &self,
        role: &'static str,
        hypotheses: Corpus,
        references: Corpus,
    ) -> Result<ScoreTriple> {
        let scorer = self.scorer.clone();
        let score = tokio::task::spawn_blocking(move || scorer.score(&hypotheses, &references))
            .await
            .map_err(|e| GateError::InternalScoring(format!("{role} scoring task failed: {e}")))??;
        obs::emit_corpus_scored(role, self.scorer.backend_name(), score);
        Ok(score)
    }
}

impl std::fmt::Debug for EvaluationHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvaluationHandler")
            .field("scorer", &self.scorer)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
