use std::collections::HashMap;

use serial_test::serial;

use super::*;

fn source(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name: &str| map.get(name).cloned()
}

const EVALUATION_VARS: &[(&str, &str)] = &[
    ("S3_BUCKET_VALIDATION", "validation-bucket"),
    ("REFERENCE_INFERENCE", "reference.json"),
    ("S3_BUCKET_INFERENCE", "inference-bucket"),
    ("BASE_MODEL_INFERENCE", "base.json"),
    ("CUSTOM_MODEL_INFERENCE", "custom.json"),
    ("API_GATEWAY_URL", "https://api.example.com/prod"),
    ("SENDER_EMAIL", "gate@example.com"),
    ("RECIPIENT_EMAIL", "owner@example.com"),
];

#[test]
fn evaluation_config_maps_buckets_and_keys() {
    let config = EvaluationConfig::from_source(&source(EVALUATION_VARS)).unwrap();
    assert_eq!(
        config.reference,
        BlobLocation::new("validation-bucket", "reference.json")
    );
    assert_eq!(config.base, BlobLocation::new("inference-bucket", "base.json"));
    assert_eq!(
        config.custom,
        BlobLocation::new("inference-bucket", "custom.json")
    );
    assert_eq!(config.sender, "gate@example.com");
    assert_eq!(config.api_base_url, "https://api.example.com/prod");
}

#[test]
fn blank_values_count_as_missing() {
    let mut vars = EVALUATION_VARS.to_vec();
    vars.retain(|(k, _)| *k != "RECIPIENT_EMAIL");
    vars.push(("RECIPIENT_EMAIL", "   "));

    let err = EvaluationConfig::from_source(&source(&vars)).unwrap_err();
    assert_eq!(
        err,
        ConfigError::MissingEnvVar {
            name: "RECIPIENT_EMAIL"
        }
    );
}

#[test]
fn api_url_must_be_http() {
    let err = ApprovalConfig::from_source(&source(&[
        ("API_GATEWAY_URL", "ftp://nope"),
        ("SENDER_EMAIL", "a@example.com"),
        ("RECIPIENT_EMAIL", "b@example.com"),
    ]))
    .unwrap_err();
    assert!(matches!(
        err,
        ConfigError::InvalidValue {
            name: "API_GATEWAY_URL",
            ..
        }
    ));
}

#[test]
fn launcher_defaults() {
    let config =
        LauncherConfig::from_source(&source(&[("STEPFUNCTION_ARN", "arn:sfn:fine-tune")])).unwrap();
    assert_eq!(config.workflow_id, "arn:sfn:fine-tune");
    assert_eq!(config.base_model_identifier, DEFAULT_BASE_MODEL_IDENTIFIER);
    assert_eq!(config.hyper_parameters, HyperParameters::default());
}

#[test]
fn launcher_overrides_are_validated() {
    let config = LauncherConfig::from_source(&source(&[
        ("STEPFUNCTION_ARN", "arn:sfn:fine-tune"),
        ("EPOCH_COUNT", "3"),
        ("LEARNING_RATE", "0.0001"),
    ]))
    .unwrap();
    assert_eq!(config.hyper_parameters.epoch_count, "3");
    assert_eq!(config.hyper_parameters.learning_rate, "0.0001");
    assert_eq!(config.hyper_parameters.batch_size, "8");

    let err = LauncherConfig::from_source(&source(&[
        ("STEPFUNCTION_ARN", "arn:sfn:fine-tune"),
        ("BATCH_SIZE", "0"),
    ]))
    .unwrap_err();
    assert!(matches!(
        err,
        ConfigError::InvalidValue {
            name: "BATCH_SIZE",
            ..
        }
    ));
}

#[test]
fn launcher_requires_workflow() {
    let err = LauncherConfig::from_source(&source(&[])).unwrap_err();
    assert_eq!(
        err,
        ConfigError::MissingEnvVar {
            name: "STEPFUNCTION_ARN"
        }
    );
}

#[test]
#[serial]
fn from_env_reads_process_environment() {
    std::env::set_var("STEPFUNCTION_ARN", "arn:sfn:from-env");
    std::env::set_var("EARLY_STOPPING_PATIENCE", "4");
    let config = LauncherConfig::from_env().unwrap();
    std::env::remove_var("STEPFUNCTION_ARN");
    std::env::remove_var("EARLY_STOPPING_PATIENCE");

    assert_eq!(config.workflow_id, "arn:sfn:from-env");
    assert_eq!(config.hyper_parameters.early_stopping_patience, "4");
}

#[test]
#[serial]
fn from_env_reports_missing_variable() {
    std::env::remove_var("STEPFUNCTION_ARN");
    assert_eq!(
        LauncherConfig::from_env().unwrap_err(),
        ConfigError::MissingEnvVar {
            name: "STEPFUNCTION_ARN"
        }
    );
}
