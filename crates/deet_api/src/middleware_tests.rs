//! Tests for signature verification and tracing middleware

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware,
    routing::post,
    Router,
};
use tower::ServiceExt;

use crate::test_support::{body_text, sign, signed_request, test_state, TIMESTAMP};

/// Router whose handler echoes the body it received.
fn echo_router(state: AppState) -> Router {
    Router::new()
        .route("/", post(|body: String| async move { body }))
        .layer(middleware::from_fn_with_state(state.clone(), verify_signature))
        .with_state(state)
}

// ============================================================================
// Signature Verification Tests
// ============================================================================

#[tokio::test]
async fn test_valid_signature_passes_body_through_unchanged() {
    let (state, _) = test_state();
    let body = r#"{"type":1}"#;

    let response = echo_router(state)
        .oneshot(signed_request("/", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, body);
}

#[tokio::test]
async fn test_missing_signature_header_is_rejected() {
    let (state, _) = test_state();

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header(TIMESTAMP_HEADER, TIMESTAMP)
        .body(Body::from(r#"{"type":1}"#))
        .unwrap();
    let response = echo_router(state).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_text(response).await, "Invalid request signature");
}

#[tokio::test]
async fn test_missing_timestamp_header_is_rejected() {
    let (state, _) = test_state();
    let body = r#"{"type":1}"#;

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header(SIGNATURE_HEADER, sign(TIMESTAMP, body))
        .body(Body::from(body))
        .unwrap();
    let response = echo_router(state).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_text(response).await, "Invalid request signature");
}

#[tokio::test]
async fn test_signature_over_different_body_is_rejected() {
    let (state, _) = test_state();

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header(SIGNATURE_HEADER, sign(TIMESTAMP, r#"{"type":1}"#))
        .header(TIMESTAMP_HEADER, TIMESTAMP)
        .body(Body::from(r#"{"type":2}"#))
        .unwrap();
    let response = echo_router(state).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_signature_with_different_timestamp_is_rejected() {
    let (state, _) = test_state();
    let body = r#"{"type":1}"#;

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header(SIGNATURE_HEADER, sign(TIMESTAMP, body))
        .header(TIMESTAMP_HEADER, "1700000001")
        .body(Body::from(body))
        .unwrap();
    let response = echo_router(state).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_non_post_method_is_rejected_before_signature_check() {
    let (state, _) = test_state();
    let app = Router::new()
        .fallback(|| async { "unreachable" })
        .layer(middleware::from_fn_with_state(state.clone(), verify_signature))
        .with_state(state);

    let request = Request::builder()
        .method("PUT")
        .uri("/")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_text(response).await, "Method not allowed: PUT");
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let (state, _) = test_state();
    let body = "x".repeat(MAX_BODY_BYTES + 1);

    let response = echo_router(state)
        .oneshot(signed_request("/", &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_text(response)
        .await
        .starts_with("Failed to read request body"));
}

// ============================================================================
// Tracing Middleware Tests
// ============================================================================

#[tokio::test]
async fn test_tracing_middleware_passes_response_through() {
    let app = Router::new()
        .route("/", post(|| async { "ok" }))
        .layer(middleware::from_fn(tracing_middleware));

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");
}
