//! Per-run identities for launched workflows.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Collision-resistant token naming one training job and the model it
/// produces. A fresh identity is generated for every triggering file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunIdentity(Uuid);

impl RunIdentity {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }

    pub fn custom_model_name(&self) -> String {
        format!("custom-model-{}", self.0)
    }

    pub fn job_name(&self) -> String {
        format!("custom-job-{}", self.0)
    }
}

impl Default for RunIdentity {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
