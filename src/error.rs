//! Error handling

use axum::{
    extract::rejection::JsonRejection,
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use serde_json::json;

use crate::inference::ScoreError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    // Client errors
    ValidationError(String),

    // Service state
    ModelUnavailable,

    // Generic errors
    InternalError(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::ModelUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match &self {
            AppError::ValidationError(msg) => msg.as_str(),
            AppError::ModelUnavailable => "Model not loaded",
            // Logged by the caller; never echoed to the client
            AppError::InternalError(_) => "Internal server error",
        };

        let body = Json(json!({
            "detail": detail,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<ScoreError> for AppError {
    fn from(err: ScoreError) -> Self {
        match err {
            ScoreError::Validation(e) => AppError::ValidationError(e.to_string()),
            ScoreError::ModelUnavailable => AppError::ModelUnavailable,
            ScoreError::Internal(msg) => AppError::InternalError(msg),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::ValidationError(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::ValidationError;

    #[test]
    fn test_score_error_mapping() {
        let err: AppError = ScoreError::Validation(ValidationError::WrongLength { expected: 4, actual: 2 }).into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(matches!(err, AppError::ValidationError(ref m) if m == "Expected 4 features, got 2"));

        let err: AppError = ScoreError::ModelUnavailable.into();
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);

        let err: AppError = ScoreError::Internal("boom".to_string()).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_internal_detail_is_not_leaked() {
        let response = AppError::InternalError("secret stack trace".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["detail"], "Internal server error");
        assert_eq!(body["status"], 500);
        assert!(!String::from_utf8_lossy(&bytes).contains("secret"));
    }
}
