//! API error type and its JSON rendering.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use super::types::ErrorResponse;
use crate::engine::{NoFacilityFound, RequestError};

/// Errors a handler can return.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Body is not valid JSON or does not match the request schema.
    #[error("malformed request body: {0}")]
    BadRequest(String),
    /// Request is well-formed but outside what the service accepts.
    #[error(transparent)]
    InvalidRequest(#[from] RequestError),
    /// No station near the requested position.
    #[error(transparent)]
    NotFound(#[from] NoFacilityFound),
}

impl ApiError {
    /// HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    /// Stable error kind for clients.
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::InvalidRequest(RequestError::InvalidCoordinate { .. }) => "invalid_coordinate",
            Self::InvalidRequest(RequestError::InvalidPower(_)) => "invalid_power",
            Self::NotFound(_) => "no_facility_found",
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::NotFound(_) => tracing::info!(error = %self, "no facility for request"),
            _ => tracing::debug!(error = %self, "client error"),
        }

        let body = ErrorResponse {
            error: self.error_type().to_string(),
            message: self.to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}
