//! Service information

use axum::{extract::State, Json};

use crate::inference::FEATURE_LAYOUT;
use crate::models::{Endpoints, ModelInfo, ServiceInfo};
use crate::AppState;

pub async fn info(State(state): State<AppState>) -> Json<ServiceInfo> {
    let model = state.provider.current().map(|h| ModelInfo {
        kind: h.model().kind(),
        version: h.version().to_string(),
        features: &FEATURE_LAYOUT,
        sha256: h.digest().map(str::to_string),
        loaded_at: h.loaded_at(),
    });

    Json(ServiceInfo {
        service: "ML Inference Service",
        version: env!("CARGO_PKG_VERSION"),
        model,
        endpoints: Endpoints::default(),
    })
}
