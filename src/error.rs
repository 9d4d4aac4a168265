//! Error taxonomy for the HTTP proxy surface.

use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur in service layer operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Invalid input provided by the client.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The redirect URI is not on the allow-list.
    #[error("invalid redirect_uri")]
    DisallowedRedirect,
    /// The upstream token endpoint rejected the request.
    #[error("{message}")]
    Upstream {
        /// Status returned by the upstream endpoint.
        status: u16,
        /// Upstream error description.
        message: String,
    },
    /// The upstream endpoint could not be reached or answered garbage.
    #[error("upstream request failed: {0}")]
    Network(String),
}

/// Application-level errors converted to HTTP responses with an `{error}` body.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad request with invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),
    /// Upstream failure surfaced with its original status code.
    #[error("{message}")]
    Upstream {
        /// Upstream status code to mirror.
        status: u16,
        /// Upstream error description.
        message: String,
    },
    /// Service unavailable.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidInput(message) => AppError::BadRequest(message),
            ServiceError::DisallowedRedirect => {
                AppError::BadRequest("Invalid redirect_uri".into())
            }
            ServiceError::Upstream { status, message } => AppError::Upstream { status, message },
            ServiceError::Network(message) => AppError::Internal(message),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let payload = Json(ErrorBody {
            error: match self {
                AppError::Upstream { message, .. } => message,
                other => other.to_string(),
            },
        });

        (status, payload).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_errors_mirror_their_status() {
        let response = AppError::from(ServiceError::Upstream {
            status: 403,
            message: "Token exchange failed".into(),
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn disallowed_redirect_is_a_bad_request() {
        let response = AppError::from(ServiceError::DisallowedRedirect).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn network_failures_are_internal() {
        let response = AppError::from(ServiceError::Network("connection refused".into()))
            .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
