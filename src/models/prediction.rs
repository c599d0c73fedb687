//! Prediction request/response models

use serde::{Deserialize, Serialize};

use crate::inference::PredictionResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRequest {
    /// Feature vector for prediction
    pub features: Vec<f64>,
    /// Optional request ID for tracking
    #[serde(default)]
    pub request_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResponse {
    /// Predicted class
    pub prediction: usize,
    /// Prediction confidence
    pub confidence: f64,
    /// Model version used
    pub model_version: String,
    /// Request tracking ID, echoed from the request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl PredictionResponse {
    pub fn new(result: PredictionResult, model_version: &str, request_id: Option<String>) -> Self {
        Self {
            prediction: result.predicted_class,
            confidence: result.confidence,
            model_version: model_version.to_string(),
            request_id,
        }
    }
}
