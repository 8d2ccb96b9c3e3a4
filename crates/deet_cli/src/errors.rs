use deet_core::ConfigError;
use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur in the deet CLI.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration could not be loaded from the environment.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Registration needs the application's client id and secret.
    #[error("Client credentials are not configured; set DISCORD_CLIENT_ID and DISCORD_CLIENT_SECRET")]
    MissingCredentials,

    /// The API base URL could not be used to build endpoint URLs.
    #[error("Invalid API base URL '{url}': {reason}")]
    InvalidApiBase { url: String, reason: String },

    /// The platform could not be reached.
    #[error("Request to {endpoint} failed: {message}")]
    Transport { endpoint: String, message: String },

    /// The platform answered with a non-success status.
    #[error("{endpoint} returned HTTP {status}: {body}")]
    Rejected {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// A response or the command list could not be (de)serialized.
    #[error("Failed to process JSON: {0}")]
    Json(#[from] serde_json::Error),
}
