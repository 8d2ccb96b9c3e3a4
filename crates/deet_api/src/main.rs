//! Deet relay server
//!
//! Main binary for running the relay endpoint.
//!
//! # Environment Variables
//!
//! - `API_PORT`: Port to listen on (default: 8080)
//! - `API_HOST`: Host to bind to (default: 0.0.0.0)
//! - `RUST_LOG`: Log filter (default: info)
//! - `LOG_FORMAT`: `json` for structured output, anything else for text
//!
//! Relay variables (`DISCORD_PUBLIC_KEY`, `STORE_BACKEND`, ...) are read by
//! [`deet_core::RelayConfig::from_env`].

use std::env;

use anyhow::Context;
use deet_api::{ApiConfig, ApiServer, AppState};
use deet_core::{RelayConfig, RelayContext};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let api_config = ApiConfig::from_env().context("Invalid server configuration")?;
    let relay_config = RelayConfig::from_env().context("Invalid relay configuration")?;
    let max_concurrent_deliveries = relay_config.max_concurrent_deliveries;

    let client = reqwest::Client::builder()
        .user_agent(concat!("deet-relay/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build HTTP client")?;

    let context = RelayContext::from_config(relay_config, client)
        .context("Failed to initialize key-value stores")?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        max_concurrent_deliveries,
        "Starting deet relay"
    );

    let server = ApiServer::new(api_config, AppState::new(context));
    server.serve().await
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
