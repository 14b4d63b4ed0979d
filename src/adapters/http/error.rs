//! Error responses.
//!
//! Every failure leaves the service as a non-2xx status with a
//! `{"detail", "code"}` body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};

use crate::domain::errors::ChatApiError;
use crate::services::QueryError;

/// Error response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
    pub code: String,
}

/// An error ready to be sent to the caller.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, detail: impl Into<String>) -> Self {
        Self {
            status,
            code,
            detail: detail.into(),
        }
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", "Invalid or missing API key")
    }

    pub fn auth_not_configured() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "AUTH_NOT_CONFIGURED",
            "Server API key is not configured",
        )
    }

    pub fn invalid_request(status: StatusCode, detail: impl Into<String>) -> Self {
        Self::new(status, "INVALID_REQUEST", detail)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            detail: self.detail,
            code: self.code.to_string(),
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::InvalidRequest(detail) => {
                Self::invalid_request(StatusCode::BAD_REQUEST, detail)
            }
            QueryError::Retrieval(e) => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "RETRIEVAL_FAILED",
                e.to_string(),
            ),
            QueryError::Generation(e) => Self::from(e),
        }
    }
}

impl From<ChatApiError> for ApiError {
    fn from(err: ChatApiError) -> Self {
        let detail = err.to_string();
        match err {
            ChatApiError::MissingApiKey | ChatApiError::InvalidRequest(_) => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "LLM_NOT_CONFIGURED",
                detail,
            ),
            ChatApiError::Status { .. } => Self::new(StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", detail),
            ChatApiError::InvalidResponse(_) => Self::new(
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_INVALID_RESPONSE",
                detail,
            ),
            ChatApiError::Timeout
            | ChatApiError::Connection(_)
            | ChatApiError::RetriesExhausted { .. } => Self::new(
                StatusCode::GATEWAY_TIMEOUT,
                "UPSTREAM_UNAVAILABLE",
                detail,
            ),
        }
    }
}
