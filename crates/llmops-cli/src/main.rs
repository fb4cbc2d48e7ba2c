//! LLMOps promotion gate CLI
//!
//! The `llmops` command runs one gate invocation per call. Each subcommand
//! reads an event document (a file, or `-` for stdin), runs the matching
//! handler and prints its JSON response on stdout.
//!
//! ## Commands
//!
//! - `evaluate`: Score a customized model and notify the operator
//! - `launch`: Start fine-tuning workflows for new training data
//! - `request-approval`: Mail an approval request for a model package
//!
//! Handler settings come from the environment (`S3_BUCKET_VALIDATION`,
//! `SENDER_EMAIL`, `STEPFUNCTION_ARN`, ...); collaborator endpoints from the
//! flags below or their `LLMOPS_*` variables.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use tracing::{info, Level};

use llmops_core::{
    ApprovalConfig, ApprovalNotifier, ApprovalResponse, EvaluationConfig, EvaluationHandler,
    EvaluationResponse, EvaluationTrigger, GateError, InvocationSpan, LaunchResponse,
    LauncherConfig, LogFormat, NotificationComposer, PackageEvent, StorageEvent, TemplateSet,
    ValidationError, WorkflowLauncher, METRICS,
};
use llmops_io::{
    BlobStore, EmailSender, FsBlobStore, HttpBlobStore, HttpEmailSender, HttpWorkflowStarter,
    WorkflowStarter,
};

#[derive(Parser)]
#[command(name = "llmops")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "LLMOps promotion gate", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(flatten)]
    endpoints: Endpoints,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a customized model and send the promotion notification
    Evaluate {
        /// Trigger document (`-` for stdin)
        #[arg(short, long, default_value = "-")]
        event: PathBuf,
    },

    /// Start one fine-tuning workflow per stored training file
    Launch {
        /// Storage notification document (`-` for stdin)
        #[arg(short, long, default_value = "-")]
        event: PathBuf,
    },

    /// Mail an approval request for a pending model package
    RequestApproval {
        /// Registry event document (`-` for stdin)
        #[arg(short, long, default_value = "-")]
        event: PathBuf,
    },
}

/// Where the collaborators live.
#[derive(Args, Debug, Default)]
struct Endpoints {
    /// Read corpora from `<root>/<bucket>/<key>` on the local filesystem
    #[arg(long, global = true, env = "LLMOPS_BLOB_ROOT", conflicts_with = "blob_endpoint")]
    blob_root: Option<PathBuf>,

    /// Read corpora from an HTTP object gateway
    #[arg(long, global = true, env = "LLMOPS_BLOB_ENDPOINT")]
    blob_endpoint: Option<String>,

    /// Transactional email API endpoint
    #[arg(long, global = true, env = "LLMOPS_EMAIL_ENDPOINT")]
    email_endpoint: Option<String>,

    /// Workflow API endpoint
    #[arg(long, global = true, env = "LLMOPS_WORKFLOW_ENDPOINT")]
    workflow_endpoint: Option<String>,

    /// Bearer token sent to the HTTP endpoints
    #[arg(long, global = true, env = "LLMOPS_API_TOKEN", hide_env_values = true)]
    api_token: Option<String>,

    /// Directory with notification templates overriding the built-in ones
    #[arg(long, global = true, env = "LLMOPS_TEMPLATE_DIR")]
    template_dir: Option<PathBuf>,
}

impl Endpoints {
    fn blob_store(&self) -> Result<Arc<dyn BlobStore>> {
        if let Some(root) = &self.blob_root {
            return Ok(Arc::new(FsBlobStore::new(root)));
        }
        let Some(endpoint) = &self.blob_endpoint else {
            bail!("no blob store configured: set --blob-root or --blob-endpoint");
        };
        let mut store = HttpBlobStore::new(endpoint).context("Invalid blob endpoint")?;
        if let Some(token) = &self.api_token {
            store = store.with_token(token);
        }
        Ok(Arc::new(store))
    }

    fn email_sender(&self) -> Result<Arc<dyn EmailSender>> {
        let endpoint = self
            .email_endpoint
            .as_deref()
            .context("no email endpoint configured: set --email-endpoint")?;
        let mut sender = HttpEmailSender::new(endpoint).context("Invalid email endpoint")?;
        if let Some(token) = &self.api_token {
            sender = sender.with_token(token);
        }
        Ok(Arc::new(sender))
    }

    fn workflow_starter(&self) -> Result<Arc<dyn WorkflowStarter>> {
        let endpoint = self
            .workflow_endpoint
            .as_deref()
            .context("no workflow endpoint configured: set --workflow-endpoint")?;
        let mut starter = HttpWorkflowStarter::new(endpoint).context("Invalid workflow endpoint")?;
        if let Some(token) = &self.api_token {
            starter = starter.with_token(token);
        }
        Ok(Arc::new(starter))
    }

    fn composer(&self) -> Result<NotificationComposer> {
        let templates = match &self.template_dir {
            Some(dir) => TemplateSet::from_dir(dir)
                .with_context(|| format!("Failed to load templates from {}", dir.display()))?,
            None => TemplateSet::builtin(),
        };
        Ok(NotificationComposer::new(templates))
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    llmops_core::init_tracing(LogFormat::from_json_flag(cli.json), level);

    let invocation_id = uuid::Uuid::new_v4().to_string();
    let (status, body) = match &cli.command {
        Commands::Evaluate { event } => {
            let _span = InvocationSpan::enter("evaluate", &invocation_id);
            let config = EvaluationConfig::from_env().context("Invalid evaluation settings")?;
            let handler = EvaluationHandler::new(
                cli.endpoints.blob_store()?,
                cli.endpoints.email_sender()?,
                config,
            )
            .with_composer(cli.endpoints.composer()?);
            let response = cmd_evaluate(&handler, read_event(event)?).await;
            (response.status_code(), serde_json::to_string_pretty(&response)?)
        }
        Commands::Launch { event } => {
            let _span = InvocationSpan::enter("launch", &invocation_id);
            let config = LauncherConfig::from_env().context("Invalid launcher settings")?;
            let launcher = WorkflowLauncher::new(cli.endpoints.workflow_starter()?, config);
            let response = cmd_launch(&launcher, read_event(event)?).await;
            (response.status_code(), serde_json::to_string_pretty(&response)?)
        }
        Commands::RequestApproval { event } => {
            let _span = InvocationSpan::enter("request-approval", &invocation_id);
            let config = ApprovalConfig::from_env().context("Invalid approval settings")?;
            let notifier = ApprovalNotifier::new(cli.endpoints.email_sender()?, config)
                .with_composer(cli.endpoints.composer()?);
            let response = cmd_request_approval(&notifier, read_event(event)?).await;
            (response.status_code(), serde_json::to_string_pretty(&response)?)
        }
    };

    println!("{body}");
    METRICS.flush();
    info!(invocation_id = %invocation_id, status, "invocation finished");

    Ok(if status < 400 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Read a JSON document from `path`, or stdin for `-`.
fn read_event(path: &Path) -> Result<Value> {
    let text = if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read event from stdin")?;
        text
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read event file {}", path.display()))?
    };
    serde_json::from_str(&text).context("Event is not valid JSON")
}

fn malformed(err: serde_json::Error) -> GateError {
    ValidationError::MalformedEvent(err.to_string()).into()
}

async fn cmd_evaluate(handler: &EvaluationHandler, event: Value) -> EvaluationResponse {
    let result = match serde_json::from_value::<EvaluationTrigger>(event) {
        Ok(trigger) => handler.handle(&trigger).await,
        Err(err) => Err(malformed(err)),
    };
    if let Err(err) = &result {
        tracing::error!(error_kind = %err.kind(), error = %err, "evaluation failed");
    }
    EvaluationResponse::from_result(&result)
}

async fn cmd_launch(launcher: &WorkflowLauncher, event: Value) -> LaunchResponse {
    let result = match StorageEvent::from_value(event) {
        Ok(event) => launcher.launch(&event).await,
        Err(err) => Err(err.into()),
    };
    if let Err(err) = &result {
        tracing::error!(error_kind = %err.kind(), error = %err, "launch failed");
    }
    LaunchResponse::from_result(&result)
}

async fn cmd_request_approval(notifier: &ApprovalNotifier, event: Value) -> ApprovalResponse {
    let result = match PackageEvent::from_value(event) {
        Ok(event) => notifier.notify(&event).await,
        Err(err) => Err(err.into()),
    };
    if let Err(err) = &result {
        tracing::error!(error_kind = %err.kind(), error = %err, "approval request failed");
    }
    ApprovalResponse::from_result(&result)
}
