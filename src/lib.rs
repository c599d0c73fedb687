//! ML Inference Service
//!
//! REST API serving class predictions from a pre-trained model.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   ML INFERENCE SERVICE                      │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐  ┌───────────────┐  ┌─────────────────────┐  │
//! │  │  HTTP API │  │  Scorer       │  │  Metrics            │  │
//! │  │  (Axum)   │─▶│  validate +   │─▶│  (Prometheus)       │  │
//! │  │           │  │  predict      │  │                     │  │
//! │  └───────────┘  └───────┬───────┘  └─────────────────────┘  │
//! │                         ▼                                   │
//! │                 ┌───────────────┐                           │
//! │                 │ Model Provider│                           │
//! │                 └───────────────┘                           │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod inference;
pub mod metrics;
pub mod middleware;
pub mod models;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
    middleware as axum_middleware,
};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};

pub use config::Config;
pub use error::{AppError, AppResult};
pub use metrics::Metrics;

use inference::{FileModelProvider, ModelHandle, ModelLoadError, ModelProvider};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn ModelProvider>,
    pub metrics: Arc<Metrics>,
    pub config: Config,
}

impl AppState {
    pub fn new(provider: Arc<dyn ModelProvider>, metrics: Arc<Metrics>, config: Config) -> Self {
        metrics.set_model_loaded(provider.current().is_some());
        Self { provider, metrics, config }
    }
}

/// Re-read the model artifact and mark the model as loaded on success.
///
/// A failed reload leaves both the served model and the gauge untouched.
pub fn reload_model(
    provider: &FileModelProvider,
    metrics: &Metrics,
) -> Result<Arc<ModelHandle>, ModelLoadError> {
    let handle = provider.reload()?;
    metrics.set_model_loaded(true);
    Ok(handle)
}

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root::info))
        .route("/health", get(handlers::health::check))
        .route("/ready", get(handlers::health::ready))
        .route("/predict", post(handlers::predict::predict))
        .route("/metrics", get(handlers::metrics::export))
        .layer(axum_middleware::from_fn(middleware::request_log::log_requests))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}
