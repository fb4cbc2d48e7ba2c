//! Environment-backed configuration.
//!
//! Each component reads its own settings. Bucket/key pairs, addresses and
//! URLs have no sensible default and are required; launcher hyper-parameters
//! fall back to the standard fine-tuning configuration.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::ConfigError;

use llmops_io::BlobLocation;

use crate::launcher::{HyperParameters, DEFAULT_BASE_MODEL_IDENTIFIER};
use crate::notify::is_http_url;

/// Source of configuration values, keyed by variable name.
pub trait ConfigSource {
    fn get(&self, name: &str) -> Option<String>;
}

/// Reads the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl ConfigSource for ProcessEnv {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl<F> ConfigSource for F
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, name: &str) -> Option<String> {
        self(name)
    }
}

fn required(source: &impl ConfigSource, name: &'static str) -> Result<String, ConfigError> {
    match source.get(name) {
        Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(ConfigError::MissingEnvVar { name }),
    }
}

fn optional(source: &impl ConfigSource, name: &str) -> Option<String> {
    source
        .get(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Settings for the evaluation handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationConfig {
    /// Reference (ground-truth) corpus.
    pub reference: BlobLocation,
    /// Base-model hypotheses.
    pub base: BlobLocation,
    /// Custom-model hypotheses.
    pub custom: BlobLocation,
    pub sender: String,
    pub recipient: String,
    /// Default approval API base URL when the trigger carries none.
    pub api_base_url: String,
}

impl EvaluationConfig {
    const ENV_VALIDATION_BUCKET: &'static str = "S3_BUCKET_VALIDATION";
    const ENV_REFERENCE_KEY: &'static str = "REFERENCE_INFERENCE";
    const ENV_INFERENCE_BUCKET: &'static str = "S3_BUCKET_INFERENCE";
    const ENV_BASE_KEY: &'static str = "BASE_MODEL_INFERENCE";
    const ENV_CUSTOM_KEY: &'static str = "CUSTOM_MODEL_INFERENCE";

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(&ProcessEnv)
    }

    pub fn from_source(source: &impl ConfigSource) -> Result<Self, ConfigError> {
        let validation_bucket = required(source, Self::ENV_VALIDATION_BUCKET)?;
        let inference_bucket = required(source, Self::ENV_INFERENCE_BUCKET)?;
        let notify = NotifyTarget::from_source(source)?;

        Ok(Self {
            reference: BlobLocation::new(
                validation_bucket,
                required(source, Self::ENV_REFERENCE_KEY)?,
            ),
            base: BlobLocation::new(
                inference_bucket.clone(),
                required(source, Self::ENV_BASE_KEY)?,
            ),
            custom: BlobLocation::new(inference_bucket, required(source, Self::ENV_CUSTOM_KEY)?),
            sender: notify.sender,
            recipient: notify.recipient,
            api_base_url: notify.api_base_url,
        })
    }
}

/// Settings for the approval-gate notifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalConfig {
    pub sender: String,
    pub recipient: String,
    pub api_base_url: String,
}

impl ApprovalConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(&ProcessEnv)
    }

    pub fn from_source(source: &impl ConfigSource) -> Result<Self, ConfigError> {
        let notify = NotifyTarget::from_source(source)?;
        Ok(Self {
            sender: notify.sender,
            recipient: notify.recipient,
            api_base_url: notify.api_base_url,
        })
    }
}

struct NotifyTarget {
    sender: String,
    recipient: String,
    api_base_url: String,
}

impl NotifyTarget {
    const ENV_SENDER: &'static str = "SENDER_EMAIL";
    const ENV_RECIPIENT: &'static str = "RECIPIENT_EMAIL";
    const ENV_API_URL: &'static str = "API_GATEWAY_URL";

    fn from_source(source: &impl ConfigSource) -> Result<Self, ConfigError> {
        let api_base_url = required(source, Self::ENV_API_URL)?;
        if !is_http_url(&api_base_url) {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_API_URL,
                value: api_base_url,
                reason: "expected an http(s) URL".to_string(),
            });
        }
        Ok(Self {
            sender: required(source, Self::ENV_SENDER)?,
            recipient: required(source, Self::ENV_RECIPIENT)?,
            api_base_url,
        })
    }
}

/// Settings for the workflow launcher.
#[derive(Debug, Clone, PartialEq)]
pub struct LauncherConfig {
    /// Workflow definition to start (state machine ARN).
    pub workflow_id: String,
    pub base_model_identifier: String,
    pub hyper_parameters: HyperParameters,
}

impl LauncherConfig {
    const ENV_WORKFLOW: &'static str = "STEPFUNCTION_ARN";
    const ENV_BASE_MODEL: &'static str = "BASE_MODEL_IDENTIFIER";

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(&ProcessEnv)
    }

    pub fn from_source(source: &impl ConfigSource) -> Result<Self, ConfigError> {
        let defaults = HyperParameters::default();
        let hyper_parameters = HyperParameters {
            eval_percentage: number(source, "EVAL_PERCENTAGE", defaults.eval_percentage)?,
            epoch_count: integer(source, "EPOCH_COUNT", defaults.epoch_count)?,
            batch_size: integer(source, "BATCH_SIZE", defaults.batch_size)?,
            early_stopping_patience: integer(
                source,
                "EARLY_STOPPING_PATIENCE",
                defaults.early_stopping_patience,
            )?,
            early_stopping_threshold: number(
                source,
                "EARLY_STOPPING_THRESHOLD",
                defaults.early_stopping_threshold,
            )?,
            learning_rate: number(source, "LEARNING_RATE", defaults.learning_rate)?,
        };

        Ok(Self {
            workflow_id: required(source, Self::ENV_WORKFLOW)?,
            base_model_identifier: optional(source, Self::ENV_BASE_MODEL)
                .unwrap_or_else(|| DEFAULT_BASE_MODEL_IDENTIFIER.to_string()),
            hyper_parameters,
        })
    }
}

/// Non-negative decimal, kept in its textual form.
fn number(
    source: &impl ConfigSource,
    name: &'static str,
    default: String,
) -> Result<String, ConfigError> {
    let Some(value) = optional(source, name) else {
        return Ok(default);
    };
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(value),
        _ => Err(ConfigError::InvalidValue {
            name,
            value,
            reason: "expected a non-negative number".to_string(),
        }),
    }
}

/// Positive integer, kept in its textual form.
fn integer(
    source: &impl ConfigSource,
    name: &'static str,
    default: String,
) -> Result<String, ConfigError> {
    let Some(value) = optional(source, name) else {
        return Ok(default);
    };
    match value.parse::<u32>() {
        Ok(v) if v > 0 => Ok(value),
        _ => Err(ConfigError::InvalidValue {
            name,
            value,
            reason: "expected a positive integer".to_string(),
        }),
    }
}
