//! Request-time errors and the terminal error-handling contract.
//!
//! Handlers return [`RequestError`]. Converting it into a response only
//! tags the response with the error; the error stage at the outer edge of
//! the pipeline hands every tagged response to the configured
//! [`ErrorHandler`], which owns the client-visible body.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::http::{Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;
use bsvalias_core::PaymailError;
use serde_json::json;

/// Errors produced while serving a single request.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error(transparent)]
    InvalidPaymail(#[from] PaymailError),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("invalid request body: {message}")]
    InvalidBody { status: StatusCode, message: String },
    #[error("not found: {0}")]
    NotFound(String),
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl RequestError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidPaymail(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::InvalidBody { status, .. } => *status,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code used in error bodies.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidPaymail(_) => "invalid-paymail",
            Self::BadRequest(_) => "bad-request",
            Self::InvalidBody { .. } => "invalid-body",
            Self::NotFound(_) => "not-found",
            Self::Unauthorized(_) => "unauthorized",
            Self::Internal(_) => "internal-error",
        }
    }
}

impl From<JsonRejection> for RequestError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidBody {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

/// Response extension carrying the error a handler failed with.
#[derive(Debug, Clone)]
pub(crate) struct ErrorSlot(pub(crate) Arc<RequestError>);

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        let mut response = self.status().into_response();
        response.extensions_mut().insert(ErrorSlot(Arc::new(self)));
        response
    }
}

/// What the error handler gets to know about the failed request.
#[derive(Debug, Clone)]
pub struct RequestInfo {
    pub method: Method,
    pub uri: Uri,
    pub request_id: Option<String>,
}

/// Terminal error-handling stage. Must always produce a response.
pub trait ErrorHandler: Send + Sync {
    fn handle(&self, error: &RequestError, request: &RequestInfo) -> Response;
}

/// Default handler: `{ "code": ..., "message": ... }` with the error's status.
///
/// Internal errors are reported without their cause.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonErrorHandler;

impl ErrorHandler for JsonErrorHandler {
    fn handle(&self, error: &RequestError, _request: &RequestInfo) -> Response {
        let message = match error {
            RequestError::Internal(_) => "internal server error".to_string(),
            other => other.to_string(),
        };
        (
            error.status(),
            Json(json!({ "code": error.code(), "message": message })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info() -> RequestInfo {
        RequestInfo {
            method: Method::GET,
            uri: Uri::from_static("/id/alice@example.com"),
            request_id: None,
        }
    }

    #[test]
    fn status_codes() {
        assert_eq!(
            RequestError::BadRequest("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RequestError::NotFound("x".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            RequestError::Unauthorized("x".into()).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            RequestError::Internal(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            RequestError::InvalidPaymail(PaymailError::MissingSeparator("x".into())).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn into_response_tags_the_error() {
        let response = RequestError::NotFound("alice".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let slot = response.extensions().get::<ErrorSlot>().unwrap();
        assert_eq!(slot.0.code(), "not-found");
    }

    #[tokio::test]
    async fn json_handler_hides_internal_cause() {
        let err = RequestError::Internal(anyhow::anyhow!("database password is hunter2"));
        let response = JsonErrorHandler.handle(&err, &info());
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["code"], "internal-error");
        assert_eq!(value["message"], "internal server error");
    }

    #[tokio::test]
    async fn json_handler_reports_client_errors() {
        let err = RequestError::BadRequest("satoshis must be positive".into());
        let response = JsonErrorHandler.handle(&err, &info());
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["code"], "bad-request");
        assert_eq!(value["message"], "bad request: satoshis must be positive");
    }
}
