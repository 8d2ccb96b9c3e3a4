//! Wiring of configuration, stores and the dispatcher.
//!
//! A [`RelayContext`] is built once at startup and shared by every request;
//! nothing in the relay reads process-wide state after that.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use tracing::info;

use crate::broadcast::Broadcaster;
use crate::cloudflare::CloudflareKvStore;
use crate::config::{RelayConfig, StoreBackend};
use crate::dispatcher::InteractionDispatcher;
use crate::errors::StoreError;
use crate::followers::FollowerSets;
use crate::signature::SignatureVerifier;
use crate::store::{InMemoryStore, KeyValueStore};
use crate::webhooks::WebhookRegistry;

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;

/// Everything needed to authenticate and handle an interaction.
#[derive(Clone)]
pub struct RelayContext {
    pub verifier: SignatureVerifier,
    pub dispatcher: InteractionDispatcher,
}

impl RelayContext {
    /// Builds a context over explicit store handles.
    pub fn new(
        verifier: SignatureVerifier,
        followers_store: Arc<dyn KeyValueStore>,
        webhooks_store: Arc<dyn KeyValueStore>,
        client: reqwest::Client,
        max_concurrent_deliveries: usize,
    ) -> Self {
        let followers = FollowerSets::new(followers_store);
        let webhooks = WebhookRegistry::new(webhooks_store);
        let broadcaster = Broadcaster::new(
            followers.clone(),
            webhooks.clone(),
            client,
            max_concurrent_deliveries,
        );

        Self {
            verifier,
            dispatcher: InteractionDispatcher::new(followers, webhooks, broadcaster),
        }
    }

    /// Builds a context from loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Backend` if a hosted store cannot be set up.
    pub fn from_config(config: RelayConfig, client: reqwest::Client) -> Result<Self, StoreError> {
        let followers_store: Arc<dyn KeyValueStore>;
        let webhooks_store: Arc<dyn KeyValueStore>;

        match config.store {
            StoreBackend::Memory => {
                info!("Using in-memory store; data is lost on restart");
                followers_store = Arc::new(InMemoryStore::new());
                webhooks_store = Arc::new(InMemoryStore::new());
            }
            StoreBackend::Cloudflare(settings) => {
                info!(
                    account_id = %settings.account_id,
                    followers_namespace = %settings.followers_namespace_id,
                    webhooks_namespace = %settings.webhooks_namespace_id,
                    "Using hosted key-value store"
                );
                followers_store = Arc::new(CloudflareKvStore::new(
                    client.clone(),
                    &settings.api_base,
                    settings.account_id.clone(),
                    settings.followers_namespace_id,
                    SecretString::from(settings.api_token.expose_secret().to_string()),
                )?);
                webhooks_store = Arc::new(CloudflareKvStore::new(
                    client.clone(),
                    &settings.api_base,
                    settings.account_id,
                    settings.webhooks_namespace_id,
                    settings.api_token,
                )?);
            }
        }

        Ok(Self::new(
            config.verifier,
            followers_store,
            webhooks_store,
            client,
            config.max_concurrent_deliveries,
        ))
    }
}
