//! Webhook registrations: user id -> delivery URL.

use std::sync::Arc;

use tracing::debug;

use crate::errors::StoreError;
use crate::store::KeyValueStore;

#[cfg(test)]
#[path = "webhooks_tests.rs"]
mod tests;

/// Typed view over the webhooks namespace.
///
/// URLs are stored verbatim. They are not validated here; a malformed URL
/// surfaces later as a delivery failure.
#[derive(Clone)]
pub struct WebhookRegistry {
    store: Arc<dyn KeyValueStore>,
}

impl WebhookRegistry {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Delivery URL registered by `user`, if any.
    pub async fn delivery_url(&self, user: &str) -> Result<Option<String>, StoreError> {
        self.store.get(user).await
    }

    /// Registers `url` for `user`, replacing any earlier registration.
    pub async fn register(&self, user: &str, url: &str) -> Result<(), StoreError> {
        debug!(user_id = %user, "Registering delivery URL");
        self.store.put(user, url).await
    }
}
