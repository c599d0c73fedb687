//! Request logging middleware

use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};

/// Log method, path, status and duration of every request
pub async fn log_requests(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(req).await;

    tracing::info!(
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        duration_secs = start.elapsed().as_secs_f64(),
        "request completed"
    );

    response
}
