//! Workflow launcher.
//!
//! Reacts to training data landing in storage by starting one fine-tuning
//! workflow execution per new object. Each execution gets a fresh
//! [`RunIdentity`] naming its job and output model.

use std::sync::Arc;

use llmops_io::{BlobLocation, WorkflowError, WorkflowRequest, WorkflowStarter};
use serde::{Deserialize, Serialize};

use crate::config::LauncherConfig;
use crate::domain::{Result, RunIdentity, ValidationError};
use crate::metrics::METRICS;
use crate::obs;

/// Foundation model customized when none is configured.
pub const DEFAULT_BASE_MODEL_IDENTIFIER: &str = "cohere.command-light-text-v14:7:4k";

// ---------------------------------------------------------------------------
// Storage event
// ---------------------------------------------------------------------------

/// Object-created notification: `{"Records": [{"s3": {...}}]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageEvent {
    #[serde(rename = "Records", default)]
    pub records: Vec<StorageRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageRecord {
    pub s3: StorageEntity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageEntity {
    pub bucket: NamedBucket,
    pub object: StoredObject,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedBucket {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredObject {
    pub key: String,
}

impl StorageEvent {
    pub fn from_value(value: serde_json::Value) -> std::result::Result<Self, ValidationError> {
        serde_json::from_value(value).map_err(|e| ValidationError::MalformedEvent(e.to_string()))
    }

    /// Event for a single object; handy for manual launches.
    pub fn single(location: &BlobLocation) -> Self {
        Self {
            records: vec![StorageRecord {
                s3: StorageEntity {
                    bucket: NamedBucket {
                        name: location.bucket.clone(),
                    },
                    object: StoredObject {
                        key: location.key.clone(),
                    },
                },
            }],
        }
    }
}

impl StorageRecord {
    /// Object keys are used as delivered, without URL-decoding.
    pub fn location(&self) -> BlobLocation {
        BlobLocation::new(&self.s3.bucket.name, &self.s3.object.key)
    }
}

// ---------------------------------------------------------------------------
// Workflow input
// ---------------------------------------------------------------------------

/// Fine-tuning hyper-parameters, passed to the workflow as strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HyperParameters {
    pub eval_percentage: String,
    pub epoch_count: String,
    pub batch_size: String,
    pub early_stopping_patience: String,
    pub early_stopping_threshold: String,
    pub learning_rate: String,
}

impl Default for HyperParameters {
    fn default() -> Self {
        Self {
            eval_percentage: "20.0".to_string(),
            epoch_count: "1".to_string(),
            batch_size: "8".to_string(),
            early_stopping_patience: "6".to_string(),
            early_stopping_threshold: "0.01".to_string(),
            learning_rate: "0.00001".to_string(),
        }
    }
}

/// Input document of one fine-tuning execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TrainingInput {
    pub training_data_bucket: String,
    pub training_data_file_name: String,
    pub base_model_identifier: String,
    pub custom_model_name: String,
    pub job_name: String,
    pub hyper_parameters: HyperParameters,
}

impl TrainingInput {
    pub fn new(location: &BlobLocation, identity: RunIdentity, config: &LauncherConfig) -> Self {
        Self {
            training_data_bucket: location.bucket.clone(),
            training_data_file_name: location.key.clone(),
            base_model_identifier: config.base_model_identifier.clone(),
            custom_model_name: identity.custom_model_name(),
            job_name: identity.job_name(),
            hyper_parameters: config.hyper_parameters.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Launcher
// ---------------------------------------------------------------------------

/// An execution that was started.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchedRun {
    pub training_data: BlobLocation,
    pub execution_name: String,
    pub execution_id: String,
    pub custom_model_name: String,
}

/// A record whose execution could not be started.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchFailure {
    pub training_data: BlobLocation,
    pub error: String,
}

/// Per-record results of one launcher invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LaunchReport {
    pub launched: Vec<LaunchedRun>,
    pub failures: Vec<LaunchFailure>,
}

impl LaunchReport {
    /// 200 when every record launched, 500 when none did, 207 otherwise.
    pub fn status_code(&self) -> u16 {
        match (self.launched.is_empty(), self.failures.is_empty()) {
            (_, true) => 200,
            (true, false) => 500,
            (false, false) => 207,
        }
    }
}

/// Starts fine-tuning workflows for newly stored training data.
#[derive(Clone)]
pub struct WorkflowLauncher {
    starter: Arc<dyn WorkflowStarter>,
    config: LauncherConfig,
}

impl WorkflowLauncher {
    pub fn new(starter: Arc<dyn WorkflowStarter>, config: LauncherConfig) -> Self {
        Self { starter, config }
    }

    pub fn config(&self) -> &LauncherConfig {
        &self.config
    }

    /// Start one execution per record.
    ///
    /// A failure for one record is recorded in the report and the remaining
    /// records are still processed. An event without records is a
    /// validation error.
    pub async fn launch(&self, event: &StorageEvent) -> Result<LaunchReport> {
        if event.records.is_empty() {
            return Err(ValidationError::EmptyEvent.into());
        }

        let mut report = LaunchReport::default();
        for record in &event.records {
            let location = record.location();
            match self.launch_one(&location).await {
                Ok(run) => {
                    METRICS.inc_runs_launched();
                    obs::emit_workflow_launched(
                        &run.execution_name,
                        &run.execution_id,
                        &location.to_string(),
                    );
                    report.launched.push(run);
                }
                Err(err) => {
                    METRICS.inc_launch_failures();
                    obs::emit_workflow_launch_failed(&location.to_string(), &err);
                    report.failures.push(LaunchFailure {
                        training_data: location,
                        error: err.to_string(),
                    });
                }
            }
        }
        Ok(report)
    }

    async fn launch_one(&self, location: &BlobLocation) -> Result<LaunchedRun> {
        let identity = RunIdentity::new();
        let input = TrainingInput::new(location, identity, &self.config);
        let request = WorkflowRequest {
            workflow_id: self.config.workflow_id.clone(),
            execution_name: identity.job_name(),
            input: serde_json::to_value(&input).map_err(WorkflowError::from)?,
        };

        let handle = self.starter.start(&request).await?;
        Ok(LaunchedRun {
            training_data: location.clone(),
            execution_name: request.execution_name,
            execution_id: handle.execution_id,
            custom_model_name: input.custom_model_name,
        })
    }
}

impl std::fmt::Debug for WorkflowLauncher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowLauncher")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_storage_event() {
        let event = StorageEvent::from_value(serde_json::json!({
            "Records": [
                {"s3": {"bucket": {"name": "training"}, "object": {"key": "data/train+1.jsonl"}}}
            ]
        }))
        .unwrap();
        assert_eq!(
            event.records[0].location(),
            BlobLocation::new("training", "data/train+1.jsonl")
        );
    }

    #[test]
    fn test_malformed_event() {
        let err = StorageEvent::from_value(serde_json::json!({"Records": [{"s3": {}}]}))
            .unwrap_err();
        assert!(matches!(err, ValidationError::MalformedEvent(_)));
        assert!(StorageEvent::from_value(serde_json::json!({}))
            .unwrap()
            .records
            .is_empty());
    }

    #[test]
    fn test_training_input_shape() {
        let config = LauncherConfig {
            workflow_id: "arn:sfn:fine-tune".to_string(),
            base_model_identifier: DEFAULT_BASE_MODEL_IDENTIFIER.to_string(),
            hyper_parameters: HyperParameters::default(),
        };
        let identity = RunIdentity::new();
        let input = TrainingInput::new(&BlobLocation::new("b", "k.jsonl"), identity, &config);
        let json = serde_json::to_value(&input).unwrap();

        assert_eq!(json["TrainingDataBucket"], "b");
        assert_eq!(json["TrainingDataFileName"], "k.jsonl");
        assert_eq!(json["BaseModelIdentifier"], DEFAULT_BASE_MODEL_IDENTIFIER);
        assert_eq!(
            json["CustomModelName"],
            format!("custom-model-{identity}")
        );
        assert_eq!(json["JobName"], format!("custom-job-{identity}"));
        assert_eq!(
            json["HyperParameters"],
            serde_json::json!({
                "evalPercentage": "20.0",
                "epochCount": "1",
                "batchSize": "8",
                "earlyStoppingPatience": "6",
                "earlyStoppingThreshold": "0.01",
                "learningRate": "0.00001"
            })
        );
    }

    #[test]
    fn test_report_status_codes() {
        let run = LaunchedRun {
            training_data: BlobLocation::new("b", "k"),
            execution_name: "n".to_string(),
            execution_id: "id".to_string(),
            custom_model_name: "m".to_string(),
        };
        let failure = LaunchFailure {
            training_data: BlobLocation::new("b", "k"),
            error: "boom".to_string(),
        };

        let mut report = LaunchReport {
            launched: vec![run],
            failures: Vec::new(),
        };
        assert_eq!(report.status_code(), 200);
        report.failures.push(failure);
        assert_eq!(report.status_code(), 207);
        report.launched.clear();
        assert_eq!(report.status_code(), 500);
    }
}
