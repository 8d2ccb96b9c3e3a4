//! Error handling and HTTP error conversion
//!
//! Every rejection, whether transport (method, signature) or shape
//! (interaction type, command), is answered the same way: HTTP 500 with
//! the error message as a plain text body. There is no structured error
//! schema.

use axum::{
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
};
use deet_core::RelayError;
use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that terminate an inbound request.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Only POST is accepted.
    #[error("Method not allowed: {0}")]
    MethodNotAllowed(Method),

    /// Signature or timestamp header missing, or the signature is invalid.
    #[error("Invalid request signature")]
    InvalidSignature,

    /// The request body could not be read.
    #[error("Failed to read request body: {0}")]
    UnreadableBody(String),

    /// Dispatch failed.
    #[error(transparent)]
    Relay(#[from] RelayError),
}

impl ApiError {
    /// HTTP status for this error. Always 500.
    pub fn status(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        log_error(&self);

        (
            status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.to_string(),
        )
            .into_response()
    }
}

/// Log rejections at a level matching who is at fault.
fn log_error(error: &ApiError) {
    match error {
        ApiError::MethodNotAllowed(_) | ApiError::InvalidSignature => {
            tracing::warn!("Request rejected: {}", error);
        }
        ApiError::UnreadableBody(_) | ApiError::Relay(RelayError::Store(_)) => {
            tracing::error!("Request failed: {}", error);
        }
        ApiError::Relay(_) => {
            tracing::warn!("Interaction rejected: {}", error);
        }
    }
}
