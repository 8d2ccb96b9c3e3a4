//! Key-value store abstraction.
//!
//! The relay keeps two independent namespaces, followers and webhooks, each
//! backed by its own [`KeyValueStore`]. Only get and put are required from a
//! backend; there are no transactions, no listing and no deletion.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::errors::StoreError;

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;

/// Computes the next value of a key from its current value.
pub type UpdateFn<'a> = dyn Fn(Option<String>) -> Result<String, StoreError> + Send + Sync + 'a;

/// A single key-value namespace.
///
/// # Consistency
///
/// Backends may be eventually consistent. The provided [`update`] is a
/// plain read-modify-write, so concurrent updates of one key race and the
/// last writer wins. Backends with an atomic primitive should override it.
///
/// [`update`]: KeyValueStore::update
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the value under `key`, or `None` when absent.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn put(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Replaces the value under `key` with `apply(current)`.
    async fn update(&self, key: &str, apply: &UpdateFn<'_>) -> Result<(), StoreError> {
        let current = self.get(key).await?;
        let next = apply(current)?;
        self.put(key, &next).await
    }
}

/// Process-local store.
///
/// [`update`](KeyValueStore::update) runs under the store lock, so follows
/// and unfollows against one instance never lose updates.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries
            .lock()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn update(&self, key: &str, apply: &UpdateFn<'_>) -> Result<(), StoreError> {
        let mut entries = self.entries.lock();
        let next = apply(entries.get(key).cloned())?;
        entries.insert(key.to_string(), next);
        Ok(())
    }
}
