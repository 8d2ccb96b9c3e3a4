//! HTTP request handlers

use axum::{body::Bytes, extract::State, Json};
use deet_core::InteractionResponse;

use crate::{errors::ApiError, AppState};

#[cfg(test)]
#[path = "handlers_tests.rs"]
mod tests;

/// Handle a verified interaction body.
///
/// Runs behind the signature middleware, so `body` is exactly the bytes
/// the signature was checked against.
pub async fn handle_interaction(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<InteractionResponse>, ApiError> {
    let response = state.context.dispatcher.dispatch(&body).await?;
    Ok(Json(response))
}
