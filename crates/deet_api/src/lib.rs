//! Deet relay HTTP endpoint
//!
//! This crate exposes the relay's single interaction endpoint. Every
//! request, whatever its path, is authenticated against the application's
//! public key and then handed to the core dispatcher.
//!
//! # Architecture
//!
//! This crate exists in the HTTP layer and handles:
//! - signature verification middleware
//! - mapping of relay errors onto HTTP responses
//! - routing and server configuration
//!
//! The dependency flows: HTTP API -> `deet_core`, never the reverse.

use std::sync::Arc;

use deet_core::RelayContext;

pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;

#[cfg(test)]
mod test_support;

// Re-export key types for convenience
pub use errors::ApiError;
pub use server::{ApiConfig, ApiServer};

/// Default API port
pub const DEFAULT_PORT: u16 = 8080;

/// Default bind address
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Verifier, stores and dispatcher built once at startup
    pub context: Arc<RelayContext>,
}

impl AppState {
    /// Create new application state around a relay context
    pub fn new(context: RelayContext) -> Self {
        Self {
            context: Arc::new(context),
        }
    }
}
