//! Request authentication and tracing middleware
//!
//! The signature middleware runs before anything else touches the request.
//! It buffers the body, checks the Ed25519 signature over timestamp + body,
//! and only then lets the request through with the same bytes re-attached.

use axum::{
    body::Body,
    extract::{Request, State},
    http::{HeaderMap, Method},
    middleware::Next,
    response::Response,
};
use deet_core::{SIGNATURE_HEADER, TIMESTAMP_HEADER};

use crate::{errors::ApiError, AppState};

#[cfg(test)]
#[path = "middleware_tests.rs"]
mod tests;

/// Largest interaction body the endpoint will buffer.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Signature verification middleware.
///
/// Rejects with:
/// - `ApiError::MethodNotAllowed` for anything but POST
/// - `ApiError::InvalidSignature` when either header is missing or the
///   signature does not verify
///
/// No store is consulted before verification succeeds.
///
/// # Example
///
/// ```rust,ignore
/// let app = Router::new()
///     .fallback(handlers::handle_interaction)
///     .layer(middleware::from_fn_with_state(state.clone(), verify_signature));
/// ```
pub async fn verify_signature(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if request.method() != Method::POST {
        return Err(ApiError::MethodNotAllowed(request.method().clone()));
    }

    let (parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|e| ApiError::UnreadableBody(e.to_string()))?;

    let signature = header_value(&parts.headers, SIGNATURE_HEADER);
    let timestamp = header_value(&parts.headers, TIMESTAMP_HEADER);

    if !state.context.verifier.verify(&bytes, signature, timestamp) {
        return Err(ApiError::InvalidSignature);
    }

    tracing::debug!(body_len = bytes.len(), "Request signature verified");

    let request = Request::from_parts(parts, Body::from(bytes));
    Ok(next.run(request).await)
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|h| h.to_str().ok())
}

/// Request tracing middleware.
///
/// Adds request ID and logging context for observability.
pub async fn tracing_middleware(request: Request, next: Next) -> Response {
    let request_id = uuid::Uuid::new_v4().to_string();

    tracing::info!(
        request_id = %request_id,
        method = %request.method(),
        uri = %request.uri(),
        "Request started"
    );

    let response = next.run(request).await;

    tracing::info!(
        request_id = %request_id,
        status = %response.status(),
        "Request completed"
    );

    response
}
