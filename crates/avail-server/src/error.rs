//! HTTP error mapping for the availability API.
//!
//! Engine errors map onto the wire contract: validation problems become 400,
//! unknown tenants/services become 404, and everything internal becomes a
//! generic 500 with details kept in the logs. The caller never receives a
//! partially computed response.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use avail_engine::EngineError;
use chrono::Utc;
use serde::Serialize;
use tracing::{debug, error};

#[derive(Debug)]
pub enum ApiError {
    /// Missing/invalid request parameters — HTTP 400.
    Validation(String),
    /// Unknown company or service — HTTP 404.
    NotFound { resource: String, id: String },
    /// Engine invariant violation or other internal failure — HTTP 500.
    Internal(String),
}

/// Consistent JSON body for every error response.
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error_code: String,
    pub message: String,
    pub timestamp: String,
}

impl ApiError {
    fn to_error_response(&self) -> (StatusCode, ErrorResponse) {
        let timestamp = Utc::now().to_rfc3339();
        match self {
            ApiError::Validation(message) => {
                debug!("validation error: {message}");
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        error_code: "VALIDATION_ERROR".to_string(),
                        message: message.clone(),
                        timestamp,
                    },
                )
            }
            ApiError::NotFound { resource, id } => {
                debug!("{resource} {id} not found");
                (
                    StatusCode::NOT_FOUND,
                    ErrorResponse {
                        error_code: "NOT_FOUND".to_string(),
                        message: format!("{resource} with id {id} not found"),
                        timestamp,
                    },
                )
            }
            ApiError::Internal(detail) => {
                // Log the detail, return a generic message to the client.
                error!("internal error: {detail}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error_code: "INTERNAL_ERROR".to_string(),
                        message: "An internal server error occurred".to_string(),
                        timestamp,
                    },
                )
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = self.to_error_response();
        (status, Json(body)).into_response()
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Validation(msg) => ApiError::Validation(msg),
            EngineError::InvalidTimezone(tz) => {
                ApiError::Validation(format!("invalid timezone: {tz}"))
            }
            EngineError::NotFound { resource, id } => ApiError::NotFound { resource, id },
            other => ApiError::Internal(other.to_string()),
        }
    }
}
