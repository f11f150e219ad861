//! API error responses.
//!
//! Every failure is caught at the handler boundary and mapped to a JSON
//! `{"error": ...}` body; nothing propagates to the client as a bare
//! failure. Validation errors map to 400, everything else to 500.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use super::types::ErrorResponse;
use crate::ScanHubError;

/// Error type returned by API handlers.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    source: ScanHubError,
}

impl ApiError {
    /// A client error (HTTP 400).
    pub fn validation(source: ScanHubError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            source,
        }
    }

    /// A server-side error (HTTP 500).
    pub fn internal(source: ScanHubError) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            source,
        }
    }

    /// HTTP status this error maps to.
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<ScanHubError> for ApiError {
    fn from(err: ScanHubError) -> Self {
        match err {
            ScanHubError::Validation { .. } => Self::validation(err),
            _ => Self::internal(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.source.to_string(),
        };

        if self.status.is_server_error() {
            tracing::error!(status = %self.status, error = %self.source, "request failed");
        } else {
            tracing::debug!(status = %self.status, error = %self.source, "request rejected");
        }

        (self.status, Json(body)).into_response()
    }
}
