use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::selection::SelectionError;

/// Every way a request can fail.
///
/// All variants except [`AppError::Internal`] are the caller's fault and map to
/// `400 Bad Request`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidNumber { field: String, reason: String },

    #[error("Invalid PDF document: {0}")]
    InvalidDocument(String),

    #[error("{0}")]
    OutOfRange(String),

    #[error("No pages selected: firstPages and lastPages resolve to zero pages")]
    NoPagesSelected,

    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    #[error("Request body too large: {0}")]
    PayloadTooLarge(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<SelectionError> for AppError {
    fn from(err: SelectionError) -> Self {
        match err {
            SelectionError::ZeroCount { field } => AppError::InvalidNumber {
                field: field.to_string(),
                reason: "must be a positive integer".to_string(),
            },
            SelectionError::OutOfRange { .. } => AppError::OutOfRange(err.to_string()),
            SelectionError::NoPagesSelected => AppError::NoPagesSelected,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            AppError::Internal(e) => {
                tracing::error!(error = %format!("{e:#}"), "request failed");
                ErrorResponse {
                    success: false,
                    error: "Internal error".to_string(),
                    details: Some(format!("{e:#}")),
                }
            }
            other => {
                tracing::warn!(error = %other, "request rejected");
                ErrorResponse {
                    success: false,
                    error: other.to_string(),
                    details: None,
                }
            }
        };

        (status, Json(body)).into_response()
    }
}
