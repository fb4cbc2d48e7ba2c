//! Observability tests for gate lifecycle tracing.
//!
//! These verify that the structured events are emitted with the expected
//! event names while handlers run.

use std::sync::Arc;

use llmops_core::{
    emit_approval_requested, emit_corpus_loaded, emit_notification_failed,
    emit_workflow_launch_failed, EvaluationConfig, EvaluationHandler, EvaluationTrigger,
    InvocationSpan, NotificationKind, METRICS,
};
use llmops_io::fakes::{MemoryBlobStore, MemoryEmailSender};
use llmops_io::BlobLocation;
use tracing_test::traced_test;

#[traced_test]
#[test]
fn test_emit_corpus_loaded_logs_location() {
    emit_corpus_loaded("validation/reference.json", 10);
    assert!(logs_contain("corpus.loaded"));
    assert!(logs_contain("validation/reference.json"));
}

#[traced_test]
#[test]
fn test_failures_log_at_warn() {
    emit_notification_failed(NotificationKind::Reject, &"throttled");
    emit_workflow_launch_failed("training/a.jsonl", &"state machine missing");
    assert!(logs_contain("WARN"));
    assert!(logs_contain("notification.failed"));
    assert!(logs_contain("workflow.launch_failed"));
}

#[traced_test]
#[test]
fn test_invocation_span_tags_events() {
    let span = InvocationSpan::enter("request-approval", "inv-001");
    emit_approval_requested("summarizer", "7");
    drop(span);
    assert!(logs_contain("llmops.invocation"));
    assert!(logs_contain("inv-001"));
}

#[traced_test]
#[tokio::test]
async fn test_evaluation_emits_lifecycle_events() {
    let store = MemoryBlobStore::new();
    for (bucket, key) in [
        ("validation", "reference.json"),
        ("inference", "base.json"),
        ("inference", "custom.json"),
    ] {
        store.insert(bucket, key, br#"["the cat sat", "the dog ran"]"#.to_vec());
    }
    let config = EvaluationConfig {
        reference: BlobLocation::new("validation", "reference.json"),
        base: BlobLocation::new("inference", "base.json"),
        custom: BlobLocation::new("inference", "custom.json"),
        sender: "gate@example.com".to_string(),
        recipient: "owner@example.com".to_string(),
        api_base_url: "https://api.example.com".to_string(),
    };
    let handler = EvaluationHandler::new(
        Arc::new(store),
        Arc::new(MemoryEmailSender::new()),
        config,
    );

    let before = METRICS.evaluations();
    handler
        .handle(&EvaluationTrigger::new("model-42"))
        .await
        .unwrap();
    assert!(METRICS.evaluations() > before);

    for event in [
        "evaluation.started",
        "corpus.loaded",
        "corpus.scored",
        "decision.made",
        "notification.sent",
    ] {
        assert!(logs_contain(event), "missing {event}");
    }
}
