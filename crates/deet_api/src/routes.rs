//! HTTP routing configuration
//!
//! The relay has one endpoint and the path is not significant: every path
//! is served by the interaction handler through the router fallback.
//!
//! Layer order, outermost first:
//! - `TraceLayer` HTTP spans
//! - request ID logging
//! - signature verification

use axum::{middleware, Router};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};

use crate::{handlers, middleware as api_middleware, AppState};

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;

/// Create the complete router with middleware configured.
pub fn create_router(state: AppState) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new())
        .on_response(DefaultOnResponse::new());

    Router::new()
        .fallback(handlers::handle_interaction)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api_middleware::verify_signature,
        ))
        .layer(middleware::from_fn(api_middleware::tracing_middleware))
        .layer(trace_layer)
        .with_state(state)
}
