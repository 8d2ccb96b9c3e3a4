//! Relay configuration loaded from the hosting environment.
//!
//! # Environment Variables
//!
//! - `DISCORD_PUBLIC_KEY`: hex Ed25519 public key (required)
//! - `DISCORD_CLIENT_ID` / `DISCORD_CLIENT_SECRET`: client credentials,
//!   only used for command registration
//! - `STORE_BACKEND`: `memory` (default) or `cloudflare`
//! - `CLOUDFLARE_ACCOUNT_ID`, `CLOUDFLARE_API_TOKEN`,
//!   `FOLLOWERS_NAMESPACE_ID`, `WEBHOOKS_NAMESPACE_ID`: hosted store access
//! - `CLOUDFLARE_API_BASE`: hosted store API base URL override
//! - `MAX_CONCURRENT_DELIVERIES`: broadcast fan-out bound (default: 10)

use secrecy::SecretString;

use crate::broadcast::DEFAULT_MAX_CONCURRENT_DELIVERIES;
use crate::cloudflare::DEFAULT_API_BASE;
use crate::errors::ConfigError;
use crate::signature::SignatureVerifier;

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

pub const PUBLIC_KEY_VAR: &str = "DISCORD_PUBLIC_KEY";
pub const CLIENT_ID_VAR: &str = "DISCORD_CLIENT_ID";
pub const CLIENT_SECRET_VAR: &str = "DISCORD_CLIENT_SECRET";
pub const STORE_BACKEND_VAR: &str = "STORE_BACKEND";
pub const CLOUDFLARE_ACCOUNT_ID_VAR: &str = "CLOUDFLARE_ACCOUNT_ID";
pub const CLOUDFLARE_API_TOKEN_VAR: &str = "CLOUDFLARE_API_TOKEN";
pub const CLOUDFLARE_API_BASE_VAR: &str = "CLOUDFLARE_API_BASE";
pub const FOLLOWERS_NAMESPACE_VAR: &str = "FOLLOWERS_NAMESPACE_ID";
pub const WEBHOOKS_NAMESPACE_VAR: &str = "WEBHOOKS_NAMESPACE_ID";
pub const MAX_CONCURRENT_DELIVERIES_VAR: &str = "MAX_CONCURRENT_DELIVERIES";

/// OAuth2 client credentials of the application.
#[derive(Debug)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: SecretString,
}

impl ClientCredentials {
    /// Reads both credentials; `Ok(None)` when neither is set.
    ///
    /// # Errors
    ///
    /// `ConfigError::Missing` when only one of the pair is set.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Option<Self>, ConfigError> {
        match (non_empty(&lookup, CLIENT_ID_VAR), non_empty(&lookup, CLIENT_SECRET_VAR)) {
            (None, None) => Ok(None),
            (Some(client_id), Some(secret)) => Ok(Some(Self {
                client_id,
                client_secret: SecretString::from(secret),
            })),
            (Some(_), None) => Err(missing(CLIENT_SECRET_VAR)),
            (None, Some(_)) => Err(missing(CLIENT_ID_VAR)),
        }
    }
}

/// Hosted key-value store settings.
#[derive(Debug)]
pub struct CloudflareSettings {
    pub api_base: String,
    pub account_id: String,
    pub api_token: SecretString,
    pub followers_namespace_id: String,
    pub webhooks_namespace_id: String,
}

/// Which key-value backend holds the followers and webhooks namespaces.
#[derive(Debug)]
pub enum StoreBackend {
    /// Process-local maps; contents are lost on restart.
    Memory,
    Cloudflare(CloudflareSettings),
}

/// Complete relay configuration.
#[derive(Debug)]
pub struct RelayConfig {
    pub verifier: SignatureVerifier,

    /// Recognized but not used when handling interactions.
    pub client_credentials: Option<ClientCredentials>,

    pub store: StoreBackend,

    pub max_concurrent_deliveries: usize,
}

impl RelayConfig {
    /// Loads configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads configuration through `lookup`, which maps a variable name to
    /// its value.
    ///
    /// # Errors
    ///
    /// `ConfigError::Missing` for an absent required value,
    /// `ConfigError::Invalid` for a value that does not parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let public_key = non_empty(&lookup, PUBLIC_KEY_VAR).ok_or_else(|| missing(PUBLIC_KEY_VAR))?;
        let verifier = SignatureVerifier::from_hex(PUBLIC_KEY_VAR, &public_key)?;

        let client_credentials = ClientCredentials::from_lookup(&lookup)?;

        let store = match non_empty(&lookup, STORE_BACKEND_VAR)
            .as_deref()
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            None | Some("memory") => StoreBackend::Memory,
            Some("cloudflare") => StoreBackend::Cloudflare(CloudflareSettings {
                api_base: non_empty(&lookup, CLOUDFLARE_API_BASE_VAR)
                    .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
                account_id: required(&lookup, CLOUDFLARE_ACCOUNT_ID_VAR)?,
                api_token: SecretString::from(required(&lookup, CLOUDFLARE_API_TOKEN_VAR)?),
                followers_namespace_id: required(&lookup, FOLLOWERS_NAMESPACE_VAR)?,
                webhooks_namespace_id: required(&lookup, WEBHOOKS_NAMESPACE_VAR)?,
            }),
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: STORE_BACKEND_VAR.to_string(),
                    reason: format!("unknown backend '{}', expected 'memory' or 'cloudflare'", other),
                })
            }
        };

        let max_concurrent_deliveries = match non_empty(&lookup, MAX_CONCURRENT_DELIVERIES_VAR) {
            None => DEFAULT_MAX_CONCURRENT_DELIVERIES,
            Some(raw) => match raw.parse::<usize>() {
                Ok(value) if value > 0 => value,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: MAX_CONCURRENT_DELIVERIES_VAR.to_string(),
                        reason: "expected a positive integer".to_string(),
                    })
                }
            },
        };

        Ok(Self {
            verifier,
            client_credentials,
            store,
            max_concurrent_deliveries,
        })
    }
}

fn non_empty(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn required(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<String, ConfigError> {
    non_empty(lookup, name).ok_or_else(|| missing(name))
}

fn missing(name: &str) -> ConfigError {
    ConfigError::Missing {
        name: name.to_string(),
    }
}
