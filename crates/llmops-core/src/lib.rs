//! LLMOps promotion gate
//!
//! Decides whether a fine-tuned model replaces its base model, tells a human
//! about it, and runs the neighbouring steps of the pipeline: launching
//! fine-tuning workflows and requesting registry approvals.

pub mod approval;
pub mod config;
pub mod decision;
pub mod domain;
pub mod evaluation;
pub mod launcher;
pub mod loader;
pub mod metrics;
pub mod notify;
pub mod obs;
pub mod response;
pub mod scorer;
pub mod telemetry;

pub use approval::{ApprovalNotifier, PackageEvent, PendingPackage};

pub use config::{ApprovalConfig, ConfigError, EvaluationConfig, LauncherConfig};

pub use decision::{decide, require_model_identifier};

pub use domain::{
    CollaboratorError, Corpus, ErrorKind, GateError, NotificationKind, NotificationPayload,
    PromotionOutcome, Result, RunIdentity, ScoreTriple, ValidationError,
};

pub use evaluation::{EvaluationCompleted, EvaluationHandler, EvaluationTrigger};

pub use launcher::{
    HyperParameters, LaunchFailure, LaunchReport, LaunchedRun, StorageEvent, TrainingInput,
    WorkflowLauncher, DEFAULT_BASE_MODEL_IDENTIFIER,
};

pub use loader::CorpusLoader;

pub use notify::{approval_link, NotificationComposer, Template, TemplateError, TemplateSet};

pub use response::{ApprovalResponse, ErrorResponse, EvaluationResponse, LaunchResponse};

pub use scorer::{
    GreedyMatchScorer, HashedTrigramEmbedder, PairScore, ScorerAdapter, ScorerError,
    SimilarityScorer, TokenEmbedder,
};

pub use metrics::METRICS;
pub use obs::{
    emit_approval_requested, emit_corpus_loaded, emit_corpus_scored, emit_decision_made,
    emit_evaluation_started, emit_notification_failed, emit_notification_sent,
    emit_workflow_launch_failed, emit_workflow_launched, InvocationSpan,
};
pub use telemetry::{init_tracing, LogFormat};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
