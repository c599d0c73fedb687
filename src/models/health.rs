//! Health and readiness models

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
    pub model_version: String,
    /// Reason the service is not ready
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl HealthResponse {
    pub fn new(status: &str, model_loaded: bool, model_version: &str) -> Self {
        Self {
            status: status.to_string(),
            model_loaded,
            model_version: model_version.to_string(),
            detail: None,
        }
    }
}

/// Service description served at `/`
#[derive(Debug, Clone, Serialize)]
pub struct ServiceInfo {
    pub service: &'static str,
    pub version: &'static str,
    pub model: Option<ModelInfo>,
    pub endpoints: Endpoints,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub kind: &'static str,
    pub version: String,
    pub features: &'static [&'static str],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
    pub loaded_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Endpoints {
    pub predict: &'static str,
    pub health: &'static str,
    pub ready: &'static str,
    pub metrics: &'static str,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            predict: "/predict",
            health: "/health",
            ready: "/ready",
            metrics: "/metrics",
        }
    }
}
