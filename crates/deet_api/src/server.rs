//! HTTP server configuration and startup

use axum::Router;
use deet_core::ConfigError;
use std::net::{IpAddr, SocketAddr};
use tokio::net::TcpListener;
use tokio::signal;

use crate::{routes, AppState, DEFAULT_HOST, DEFAULT_PORT};

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;

pub const API_HOST_VAR: &str = "API_HOST";
pub const API_PORT_VAR: &str = "API_PORT";

/// API server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Port to listen on
    pub port: u16,

    /// Host to bind to
    pub host: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            host: DEFAULT_HOST.to_string(),
        }
    }
}

impl ApiConfig {
    /// Loads `API_HOST` and `API_PORT` from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads the bind address through `lookup`, falling back to defaults.
    ///
    /// # Errors
    ///
    /// `ConfigError::Invalid` if the host is not an IP address or the port
    /// is not a valid port number.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(host) = lookup(API_HOST_VAR).filter(|v| !v.trim().is_empty()) {
            let host = host.trim().to_string();
            host.parse::<IpAddr>().map_err(|_| ConfigError::Invalid {
                name: API_HOST_VAR.to_string(),
                reason: "expected an IP address".to_string(),
            })?;
            config.host = host;
        }

        if let Some(port) = lookup(API_PORT_VAR).filter(|v| !v.trim().is_empty()) {
            config.port = port.trim().parse().map_err(|_| ConfigError::Invalid {
                name: API_PORT_VAR.to_string(),
                reason: "expected a port number".to_string(),
            })?;
        }

        Ok(config)
    }
}

/// API server
pub struct ApiServer {
    config: ApiConfig,
    state: AppState,
}

impl ApiServer {
    /// Create a new API server with the given configuration.
    pub fn new(config: ApiConfig, state: AppState) -> Self {
        Self { config, state }
    }

    /// Build the Axum router with all routes and middleware.
    pub fn router(&self) -> Router {
        routes::create_router(self.state.clone())
    }

    /// Start the server and listen for requests.
    ///
    /// Blocks until the server is shut down gracefully via CTRL+C (SIGINT)
    /// or SIGTERM.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the configured address.
    pub async fn serve(self) -> anyhow::Result<()> {
        let addr = SocketAddr::from((self.config.host.parse::<IpAddr>()?, self.config.port));

        tracing::info!("Starting relay endpoint on {}", addr);

        let listener = TcpListener::bind(addr).await?;
        let app = self.router();

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}

/// Wait for shutdown signal (CTRL+C or SIGTERM)
///
/// A signal handler that cannot be installed is logged and never fires.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install CTRL+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received CTRL+C, initiating graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        },
    }
}
