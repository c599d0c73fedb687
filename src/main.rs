//! ML Inference Service - server entry point

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use iris_inference::{
    create_router,
    inference::FileModelProvider,
    reload_model,
    AppState, Config, Metrics,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    // Initialize logging
    init_tracing(config.log_json || config.is_production());

    tracing::info!("ML Inference Service v{} starting...", env!("CARGO_PKG_VERSION"));

    let metrics = Arc::new(Metrics::new().context("Failed to register metrics")?);

    // Load model
    let provider = Arc::new(FileModelProvider::new(&config.model_path, config.model_version.clone()));
    if let Err(e) = provider.load() {
        if config.model_required {
            return Err(anyhow::Error::new(e).context("Failed to load model"));
        }
        tracing::error!("Failed to load model: {} - serving without a model", e);
    }

    spawn_reload_on_hangup(provider.clone(), metrics.clone());

    // Build application state
    let state = AppState::new(provider, metrics, config.clone());

    // Build router
    let app = create_router(state);

    // Start server
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("🚀 Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Shutting down inference service...");
    Ok(())
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "iris_inference=info,tower_http=info".into());

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(|| tracing_subscriber::fmt::layer()))
        .init();
}

/// Reload the model artifact on SIGHUP
#[cfg(unix)]
fn spawn_reload_on_hangup(provider: Arc<FileModelProvider>, metrics: Arc<Metrics>) {
    use tokio::signal::unix::{signal, SignalKind};

    tokio::spawn(async move {
        let mut hangup = match signal(SignalKind::hangup()) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!("Failed to install SIGHUP handler: {}", e);
                return;
            }
        };

        while hangup.recv().await.is_some() {
            tracing::info!(path = %provider.path().display(), "SIGHUP received, reloading model");
            let (p, m) = (provider.clone(), metrics.clone());
            if let Err(e) = tokio::task::spawn_blocking(move || reload_model(&p, &m)).await {
                tracing::error!("Model reload task failed: {}", e);
            }
        }
    });
}

#[cfg(not(unix))]
fn spawn_reload_on_hangup(_provider: Arc<FileModelProvider>, _metrics: Arc<Metrics>) {}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
