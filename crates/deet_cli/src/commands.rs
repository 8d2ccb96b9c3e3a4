//! Subcommand implementations for the deet CLI.
//!
//! - `register`: publish the relay's commands to the platform
//! - `commands`: print the command definitions as JSON

use clap::Args;
use deet_core::commands::application_commands;
use deet_core::config::ClientCredentials;
use tracing::instrument;

use crate::errors::Error;
use crate::registration::{CommandRegistrar, RegisteredCommand, DEFAULT_API_BASE};

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;

/// Arguments of `deet register`.
#[derive(Args, Debug, Clone)]
pub struct RegisterArgs {
    /// Platform API base URL
    #[arg(long, env = "DISCORD_API_BASE", default_value = DEFAULT_API_BASE)]
    pub api_base: String,
}

/// Publishes every relay command, replacing those already registered.
///
/// Credentials are read through `lookup` from `DISCORD_CLIENT_ID` and
/// `DISCORD_CLIENT_SECRET`.
#[instrument(skip(lookup))]
pub async fn register(
    args: &RegisterArgs,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<Vec<RegisteredCommand>, Error> {
    let credentials = ClientCredentials::from_lookup(lookup)?.ok_or(Error::MissingCredentials)?;
    let registrar = CommandRegistrar::new(reqwest::Client::new(), &args.api_base, credentials)?;

    registrar.register(&application_commands()).await
}

/// The command definitions as pretty-printed JSON.
pub fn render_commands() -> Result<String, Error> {
    Ok(serde_json::to_string_pretty(&application_commands())?)
}
