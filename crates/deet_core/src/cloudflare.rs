//! Hosted key-value store adapter.
//!
//! Talks to the Cloudflare Workers KV REST API:
//!
//! - `GET  {base}/accounts/{account}/storage/kv/namespaces/{namespace}/values/{key}`
//! - `PUT  {base}/accounts/{account}/storage/kv/namespaces/{namespace}/values/{key}`
//!
//! A `404` on read means the key is absent. The remote store offers no
//! atomic set operation, so this adapter keeps the default read-modify-write
//! [`KeyValueStore::update`].

use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};
use url::Url;

use crate::errors::StoreError;
use crate::store::KeyValueStore;

#[cfg(test)]
#[path = "cloudflare_tests.rs"]
mod tests;

/// Production API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// One namespace of the hosted key-value store.
pub struct CloudflareKvStore {
    client: reqwest::Client,
    base_url: Url,
    account_id: String,
    namespace_id: String,
    api_token: SecretString,
}

impl CloudflareKvStore {
    /// Creates a store for one namespace.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Backend` if `api_base` is not a valid base URL.
    pub fn new(
        client: reqwest::Client,
        api_base: &str,
        account_id: impl Into<String>,
        namespace_id: impl Into<String>,
        api_token: SecretString,
    ) -> Result<Self, StoreError> {
        let base_url = Url::parse(api_base).map_err(|e| StoreError::Backend {
            message: format!("invalid store API base URL: {}", e),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(StoreError::Backend {
                message: format!("store API base URL cannot be a base: {}", api_base),
            });
        }

        Ok(Self {
            client,
            base_url,
            account_id: account_id.into(),
            namespace_id: namespace_id.into(),
            api_token,
        })
    }

    /// URL of a single value; `key` is percent-encoded as one path segment.
    fn value_url(&self, key: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend([
                "accounts",
                self.account_id.as_str(),
                "storage",
                "kv",
                "namespaces",
                self.namespace_id.as_str(),
                "values",
                key,
            ]);
        }
        url
    }

    fn backend_error(&self, operation: &str, detail: impl std::fmt::Display) -> StoreError {
        StoreError::Backend {
            message: format!(
                "{} on namespace {} failed: {}",
                operation, self.namespace_id, detail
            ),
        }
    }
}

#[async_trait]
impl KeyValueStore for CloudflareKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let response = self
            .client
            .get(self.value_url(key))
            .bearer_auth(self.api_token.expose_secret())
            .send()
            .await
            .map_err(|e| self.backend_error("get", e))?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                debug!(namespace = %self.namespace_id, key = %key, "Key not found");
                Ok(None)
            }
            status if status.is_success() => {
                let body = response
                    .text()
                    .await
                    .map_err(|e| self.backend_error("get", e))?;
                Ok(Some(body))
            }
            status => {
                warn!(namespace = %self.namespace_id, status = %status, "Store read rejected");
                Err(self.backend_error("get", format_args!("HTTP {}", status)))
            }
        }
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let response = self
            .client
            .put(self.value_url(key))
            .bearer_auth(self.api_token.expose_secret())
            .header(reqwest::header::CONTENT_TYPE, "text/plain")
            .body(value.to_string())
            .send()
            .await
            .map_err(|e| self.backend_error("put", e))?;

        let status = response.status();
        if !status.is_success() {
            warn!(namespace = %self.namespace_id, status = %status, "Store write rejected");
            return Err(self.backend_error("put", format_args!("HTTP {}", status)));
        }

        Ok(())
    }
}
