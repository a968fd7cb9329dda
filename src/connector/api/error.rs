//! HTTP error responses.
//!
//! Every failure leaves the API as `{"success": false, "detail", "error",
//! "request_id"}` with a 4xx or 5xx status.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::AnalysisError;

const NOT_CONFIGURED: &str = "AI service is not properly configured. Please check API keys.";

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    /// Human-readable message (the field the frontend displays).
    pub detail: String,
    /// Stable error kind.
    pub error: String,
    pub request_id: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("AI service is not properly configured. Please check API keys.")]
    CredentialCheckFailed,

    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::Analysis(AnalysisError::Validation(_)) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::CredentialCheckFailed | ApiError::Analysis(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "bad_request",
            ApiError::CredentialCheckFailed => "configuration_error",
            ApiError::Analysis(e) => e.kind(),
        }
    }

    pub fn detail(&self) -> String {
        match self {
            ApiError::BadRequest(msg) => msg.clone(),
            ApiError::CredentialCheckFailed => NOT_CONFIGURED.to_string(),
            ApiError::Analysis(e) => match e {
                AnalysisError::Validation(msg) => msg.clone(),
                AnalysisError::Configuration(_) => NOT_CONFIGURED.to_string(),
                AnalysisError::Upstream(_) => e.to_string(),
                AnalysisError::MalformedResponse { .. } => format!("AI analysis failed: {e}"),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_type = self.kind();

        tracing::error!(
            error_type = error_type,
            status = status.as_u16(),
            message = %self,
            "API error"
        );

        let body = ErrorResponse {
            success: false,
            detail: self.detail(),
            error: error_type.to_string(),
            request_id: Uuid::new_v4().to_string(),
        };

        (status, Json(body)).into_response()
    }
}
