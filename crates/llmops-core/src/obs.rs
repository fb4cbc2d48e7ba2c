//! Structured observability hooks for gate invocations.
//!
//! This module provides:
//! - Invocation-scoped tracing spans via the `InvocationSpan` RAII guard
//! - Emission functions for the lifecycle of each handler
//!
//! Events are emitted at `info!` level, failures at `warn!`. Filtering and
//! JSON output are configured through [`crate::telemetry::init_tracing`].

use tracing::{info, warn};

use crate::domain::{NotificationKind, PromotionOutcome, ScoreTriple};

/// RAII guard that enters an invocation-scoped span for its lifetime.
///
/// ```ignore
/// let _span = InvocationSpan::enter("evaluate", "a1b2c3");
/// // every event below carries handler=evaluate invocation_id=a1b2c3
/// ```
pub struct InvocationSpan {
    _span: tracing::span::EnteredSpan,
}

impl InvocationSpan {
    pub fn enter(handler: &str, invocation_id: &str) -> Self {
        let span = tracing::info_span!(
            "llmops.invocation",
            handler = %handler,
            invocation_id = %invocation_id
        );
        Self {
            _span: span.entered(),
        }
    }
}

/// Emit event: evaluation started for a model.
pub fn emit_evaluation_started(model_identifier: &str) {
    info!(event = "evaluation.started", model_identifier = %model_identifier);
}

/// Emit event: a corpus was fetched and parsed.
pub fn emit_corpus_loaded(location: &str, examples: usize) {
    info!(event = "corpus.loaded", location = %location, examples = examples);
}

/// Emit event: a hypothesis corpus was scored against the references.
pub fn emit_corpus_scored(role: &str, backend: &str, score: ScoreTriple) {
    info!(
        event = "corpus.scored",
        role = %role,
        backend = %backend,
        precision = score.precision(),
        recall = score.recall(),
        f_measure = score.f_measure(),
    );
}

/// Emit event: promotion decision taken.
pub fn emit_decision_made(outcome: &PromotionOutcome) {
    info!(
        event = "decision.made",
        outcome = outcome.label(),
        base_f1 = outcome.base_score().f_measure(),
        custom_f1 = outcome.custom_score().f_measure(),
        teardown = outcome.teardown_signal(),
    );
}

/// Emit event: a notification left.
pub fn emit_notification_sent(kind: NotificationKind, message_id: &str, digest: &str) {
    info!(
        event = "notification.sent",
        kind = %kind,
        message_id = %message_id,
        digest = %digest,
    );
}

/// Emit event: a notification could not be sent (warning level).
pub fn emit_notification_failed(kind: NotificationKind, error: &dyn std::fmt::Display) {
    warn!(event = "notification.failed", kind = %kind, error = %error);
}

/// Emit event: a workflow execution was started.
pub fn emit_workflow_launched(execution_name: &str, execution_id: &str, training_key: &str) {
    info!(
        event = "workflow.launched",
        execution_name = %execution_name,
        execution_id = %execution_id,
        training_key = %training_key,
    );
}

/// Emit event: starting a workflow execution failed (warning level).
pub fn emit_workflow_launch_failed(training_key: &str, error: &dyn std::fmt::Display) {
    warn!(event = "workflow.launch_failed", training_key = %training_key, error = %error);
}

/// Emit event: an approval request was mailed for a model package.
pub fn emit_approval_requested(group: &str, version: &str) {
    info!(event = "approval.requested", group = %group, version = %version);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invocation_span_create() {
        let _span = InvocationSpan::enter("evaluate", "test-invocation");
    }
}
