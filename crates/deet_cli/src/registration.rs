//! Publishing the relay's commands to the chat platform.
//!
//! Registration is two calls:
//!
//! 1. `POST {base}/oauth2/token` with the client credentials as HTTP basic
//!    auth, exchanging them for a bearer token scoped to command updates
//! 2. `PUT {base}/applications/{client_id}/commands` with the full command
//!    list, which replaces every previously registered global command

use deet_core::commands::CommandDefinition;
use deet_core::config::ClientCredentials;
use reqwest::header::CONTENT_TYPE;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, info};
use url::Url;

use crate::errors::Error;

#[cfg(test)]
#[path = "registration_tests.rs"]
mod tests;

/// Production API base URL.
pub const DEFAULT_API_BASE: &str = "https://discord.com/api/v10";

/// Form body of the client-credentials token request.
pub const TOKEN_REQUEST_BODY: &str =
    "grant_type=client_credentials&scope=applications.commands.update";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// A command as acknowledged by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisteredCommand {
    pub id: String,
    pub name: String,
}

/// Client for the platform's command registration endpoints.
pub struct CommandRegistrar {
    client: reqwest::Client,
    base_url: Url,
    credentials: ClientCredentials,
}

impl CommandRegistrar {
    /// # Errors
    ///
    /// `Error::InvalidApiBase` if `api_base` is not an absolute base URL.
    pub fn new(
        client: reqwest::Client,
        api_base: &str,
        credentials: ClientCredentials,
    ) -> Result<Self, Error> {
        let invalid = |reason: String| Error::InvalidApiBase {
            url: api_base.to_string(),
            reason,
        };
        let base_url = Url::parse(api_base).map_err(|e| invalid(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(invalid("cannot be a base".to_string()));
        }

        Ok(Self {
            client,
            base_url,
            credentials,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Exchanges the client credentials for a bearer token.
    pub async fn fetch_token(&self) -> Result<SecretString, Error> {
        let url = self.endpoint(&["oauth2", "token"]);
        debug!(client_id = %self.credentials.client_id, "Requesting client-credentials token");

        let response = self
            .client
            .post(url)
            .basic_auth(
                &self.credentials.client_id,
                Some(self.credentials.client_secret.expose_secret()),
            )
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(TOKEN_REQUEST_BODY)
            .send()
            .await
            .map_err(|e| transport("token endpoint", e))?;

        let body = successful_body("token endpoint", response).await?;
        let token: TokenResponse = serde_json::from_str(&body)?;
        Ok(SecretString::from(token.access_token))
    }

    /// Replaces the application's global commands with `commands`.
    pub async fn overwrite_commands(
        &self,
        token: &SecretString,
        commands: &[CommandDefinition],
    ) -> Result<Vec<RegisteredCommand>, Error> {
        let url = self.endpoint(&["applications", self.credentials.client_id.as_str(), "commands"]);

        let response = self
            .client
            .put(url)
            .bearer_auth(token.expose_secret())
            .json(commands)
            .send()
            .await
            .map_err(|e| transport("commands endpoint", e))?;

        let body = successful_body("commands endpoint", response).await?;
        let registered: Vec<RegisteredCommand> = serde_json::from_str(&body)?;

        info!(count = registered.len(), "Commands registered");
        Ok(registered)
    }

    /// Fetches a token and publishes `commands` with it.
    pub async fn register(
        &self,
        commands: &[CommandDefinition],
    ) -> Result<Vec<RegisteredCommand>, Error> {
        let token = self.fetch_token().await?;
        self.overwrite_commands(&token, commands).await
    }
}

fn transport(endpoint: &str, error: reqwest::Error) -> Error {
    Error::Transport {
        endpoint: endpoint.to_string(),
        message: error.without_url().to_string(),
    }
}

async fn successful_body(endpoint: &str, response: reqwest::Response) -> Result<String, Error> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| transport(endpoint, e))?;

    if !status.is_success() {
        return Err(Error::Rejected {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
            body,
        });
    }
    Ok(body)
}
