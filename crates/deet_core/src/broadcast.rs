//! Broadcast fan-out: deliver one message to every follower's webhook.
//!
//! Deliveries run concurrently, bounded by `max_concurrent_deliveries`, and
//! every follower is attempted regardless of how the others fare. A
//! follower without a registered webhook is skipped; a failed delivery is
//! logged and recorded as [`DeliveryOutcome::Failed`]. Nothing is retried.
//!
//! Only the followers lookup can fail the broadcast as a whole.

use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::errors::StoreError;
use crate::followers::FollowerSets;
use crate::interaction::User;
use crate::webhooks::WebhookRegistry;

#[cfg(test)]
#[path = "broadcast_tests.rs"]
mod tests;

/// Default bound on in-flight deliveries per broadcast.
pub const DEFAULT_MAX_CONCURRENT_DELIVERIES: usize = 10;

/// Mention parsing rules for a delivered message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowedMentions {
    pub parse: Vec<String>,
}

impl AllowedMentions {
    /// Suppresses every kind of mention.
    pub fn none() -> Self {
        Self { parse: Vec::new() }
    }
}

/// JSON body POSTed to each follower's webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryPayload {
    pub username: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,

    pub content: String,

    pub allowed_mentions: AllowedMentions,
}

impl DeliveryPayload {
    /// Builds the payload for a message sent by `author`.
    pub fn from_author(author: &User, content: impl Into<String>) -> Self {
        Self {
            username: author.display_name(),
            avatar_url: author.avatar_url(),
            content: content.into(),
            allowed_mentions: AllowedMentions::none(),
        }
    }
}

/// Result of delivering to one follower.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The webhook answered with a success status.
    Delivered { follower_id: String, status: u16 },

    /// The follower has no registered webhook.
    Skipped { follower_id: String },

    /// Lookup, transport or HTTP status failure.
    Failed { follower_id: String, reason: String },
}

/// Aggregate of one broadcast, for logging. Never shown to the sender.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastSummary {
    pub delivered: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl BroadcastSummary {
    fn record(mut self, outcome: &DeliveryOutcome) -> Self {
        match outcome {
            DeliveryOutcome::Delivered { .. } => self.delivered += 1,
            DeliveryOutcome::Skipped { .. } => self.skipped += 1,
            DeliveryOutcome::Failed { .. } => self.failed += 1,
        }
        self
    }

    /// Number of outbound calls attempted (delivered plus failed).
    pub fn attempted(&self) -> usize {
        self.delivered + self.failed
    }

    /// Number of followers considered.
    pub fn followers(&self) -> usize {
        self.delivered + self.skipped + self.failed
    }
}

/// Fans a message out to the followers of its author.
#[derive(Clone)]
pub struct Broadcaster {
    followers: FollowerSets,
    webhooks: WebhookRegistry,
    client: reqwest::Client,
    max_concurrent_deliveries: usize,
}

impl Broadcaster {
    pub fn new(
        followers: FollowerSets,
        webhooks: WebhookRegistry,
        client: reqwest::Client,
        max_concurrent_deliveries: usize,
    ) -> Self {
        Self {
            followers,
            webhooks,
            client,
            max_concurrent_deliveries: max_concurrent_deliveries.max(1),
        }
    }

    /// Delivers `content` from `author` to every follower and waits for all
    /// deliveries to settle.
    ///
    /// # Errors
    ///
    /// Only a failure to read the author's follower set is returned. Per
    /// follower failures are folded into the summary.
    pub async fn broadcast(
        &self,
        author: &User,
        content: &str,
    ) -> Result<BroadcastSummary, StoreError> {
        let followers = self.followers.followers_of(&author.id).await?;
        let payload = DeliveryPayload::from_author(author, content);

        let outcomes: Vec<DeliveryOutcome> = stream::iter(followers)
            .map(|follower_id| self.deliver_to(follower_id, &payload))
            .buffer_unordered(self.max_concurrent_deliveries)
            .collect()
            .await;

        let summary = outcomes
            .iter()
            .fold(BroadcastSummary::default(), BroadcastSummary::record);

        info!(
            author_id = %author.id,
            followers = summary.followers(),
            delivered = summary.delivered,
            skipped = summary.skipped,
            failed = summary.failed,
            "Broadcast settled"
        );

        Ok(summary)
    }

    // Delivery URLs embed credentials and are never logged.
    async fn deliver_to(&self, follower_id: String, payload: &DeliveryPayload) -> DeliveryOutcome {
        let url = match self.webhooks.delivery_url(&follower_id).await {
            Ok(Some(url)) => url,
            Ok(None) => {
                debug!(follower_id = %follower_id, "No webhook registered, skipping");
                return DeliveryOutcome::Skipped { follower_id };
            }
            Err(e) => {
                warn!(follower_id = %follower_id, error = %e, "Webhook lookup failed");
                return DeliveryOutcome::Failed {
                    follower_id,
                    reason: e.to_string(),
                };
            }
        };

        match self.client.post(url.as_str()).json(payload).send().await {
            Ok(response) if response.status().is_success() => {
                let status = response.status().as_u16();
                debug!(follower_id = %follower_id, status, "Delivered");
                DeliveryOutcome::Delivered {
                    follower_id,
                    status,
                }
            }
            Ok(response) => {
                let status = response.status();
                warn!(follower_id = %follower_id, status = %status, "Delivery rejected");
                DeliveryOutcome::Failed {
                    follower_id,
                    reason: format!("HTTP {}", status),
                }
            }
            Err(e) => {
                let e = e.without_url();
                warn!(follower_id = %follower_id, error = %e, "Delivery failed");
                DeliveryOutcome::Failed {
                    follower_id,
                    reason: e.to_string(),
                }
            }
        }
    }
}
