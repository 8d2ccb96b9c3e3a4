//! Follower sets: target user id -> set of follower user ids.
//!
//! Each set is stored as a JSON array of ids under the target's key.
//! Arrays are written sorted and without duplicates; reading tolerates
//! duplicates and any order.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::debug;

use crate::errors::StoreError;
use crate::store::KeyValueStore;

#[cfg(test)]
#[path = "followers_tests.rs"]
mod tests;

/// Typed view over the followers namespace.
#[derive(Clone)]
pub struct FollowerSets {
    store: Arc<dyn KeyValueStore>,
}

impl FollowerSets {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Followers of `target`; empty when the target has never been followed.
    pub async fn followers_of(&self, target: &str) -> Result<BTreeSet<String>, StoreError> {
        let stored = self.store.get(target).await?;
        decode(target, stored)
    }

    /// Adds `follower` to the followers of `target`. Following twice is a no-op.
    pub async fn follow(&self, target: &str, follower: &str) -> Result<(), StoreError> {
        debug!(target_id = %target, follower_id = %follower, "Adding follower");
        self.store
            .update(target, &|stored| {
                let mut followers = decode(target, stored)?;
                followers.insert(follower.to_string());
                encode(target, &followers)
            })
            .await
    }

    /// Removes `follower` from the followers of `target`. Removing an id that
    /// is not present is a no-op and writes nothing.
    pub async fn unfollow(&self, target: &str, follower: &str) -> Result<(), StoreError> {
        if !self.followers_of(target).await?.contains(follower) {
            debug!(target_id = %target, follower_id = %follower, "Not a follower, nothing to remove");
            return Ok(());
        }

        debug!(target_id = %target, follower_id = %follower, "Removing follower");
        self.store
            .update(target, &|stored| {
                let mut followers = decode(target, stored)?;
                followers.remove(follower);
                encode(target, &followers)
            })
            .await
    }
}

fn decode(key: &str, stored: Option<String>) -> Result<BTreeSet<String>, StoreError> {
    match stored {
        None => Ok(BTreeSet::new()),
        Some(raw) => serde_json::from_str::<Vec<String>>(&raw)
            .map(|ids| ids.into_iter().collect())
            .map_err(|e| StoreError::Corrupt {
                key: key.to_string(),
                reason: e.to_string(),
            }),
    }
}

fn encode(key: &str, followers: &BTreeSet<String>) -> Result<String, StoreError> {
    serde_json::to_string(followers).map_err(|e| StoreError::Corrupt {
        key: key.to_string(),
        reason: e.to_string(),
    })
}
