use axum::response::IntoResponse;
use axum::Json;
use http::StatusCode;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Llm(#[from] LlmError),
}

/// Failures talking to the completion service.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("LLM provider is not configured")]
    Disabled,
    #[error("Request to LLM provider timed out")]
    Timeout,
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Rate limited by LLM provider")]
    RateLimited,
    #[error("LLM API error: {0}")]
    ApiError(String),
    #[error("Invalid LLM response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),
    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Llm(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(value: axum::extract::rejection::JsonRejection) -> Self {
        AppError::Validation(value.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_bad_request() {
        let err = AppError::Validation("Missing 'scenario' text".to_string());
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Missing 'scenario' text");
    }

    #[test]
    fn test_llm_error_maps_to_internal_error_with_message() {
        let err: AppError = LlmError::NetworkError("connection refused".to_string()).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Network error: connection refused");
    }
}
