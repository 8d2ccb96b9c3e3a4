//! Interaction dispatch.
//!
//! Two levels of routing:
//!
//! 1. Interaction type: ping is answered with pong and touches nothing
//!    else; a command invocation continues; anything else is rejected.
//! 2. Command shape and name: user commands `Follow` / `Unfollow`,
//!    chat-input commands `deet` / `setwebhook`.
//!
//! Every path yields exactly one [`InteractionResponse`] or one
//! [`RelayError`]. The body must already have passed signature
//! verification.

use tracing::{debug, info};

use crate::broadcast::Broadcaster;
use crate::commands::{DEET_COMMAND, FOLLOW_COMMAND, SET_WEBHOOK_COMMAND, UNFOLLOW_COMMAND};
use crate::errors::{RelayError, RelayResult};
use crate::followers::FollowerSets;
use crate::interaction::{CommandData, CommandType, Interaction, InteractionResponse, InteractionType, User};
use crate::options::{DeetOptions, SetWebhookOptions};
use crate::webhooks::WebhookRegistry;

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;

/// Acknowledgement returned once a broadcast has settled.
pub const DEET_SENT_MESSAGE: &str = "Deet sent!";

/// Acknowledgement returned after registering a webhook.
pub const WEBHOOK_SET_MESSAGE: &str =
    "Webhook set! Deets from people you follow will be delivered there.";

/// A decoded, routable command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Follow { target_id: String },
    Unfollow { target_id: String },
    Deet(DeetOptions),
    SetWebhook(SetWebhookOptions),
}

impl Command {
    /// Resolves command data to a command by shape and name.
    ///
    /// # Errors
    ///
    /// - `UnknownCommandType` for shapes other than user and chat-input
    /// - `UnknownCommand` for names the relay does not handle
    /// - `MissingTargetId` for a user command without a target
    /// - `MissingOption` / `InvalidOptionType` from option decoding
    pub fn from_data(data: &CommandData) -> RelayResult<Self> {
        match data.kind {
            CommandType::User => {
                let target_id = || data.target_id.clone().ok_or(RelayError::MissingTargetId);
                match data.name.as_str() {
                    FOLLOW_COMMAND => Ok(Command::Follow {
                        target_id: target_id()?,
                    }),
                    UNFOLLOW_COMMAND => Ok(Command::Unfollow {
                        target_id: target_id()?,
                    }),
                    other => Err(RelayError::UnknownCommand(other.to_string())),
                }
            }
            CommandType::ChatInput => match data.name.as_str() {
                DEET_COMMAND => Ok(Command::Deet(DeetOptions::from_options(&data.options)?)),
                SET_WEBHOOK_COMMAND => Ok(Command::SetWebhook(SetWebhookOptions::from_options(
                    &data.options,
                )?)),
                other => Err(RelayError::UnknownCommand(other.to_string())),
            },
            other => Err(RelayError::UnknownCommandType(other.into())),
        }
    }
}

/// Routes verified interactions to the follow, registration and broadcast
/// handlers.
#[derive(Clone)]
pub struct InteractionDispatcher {
    followers: FollowerSets,
    webhooks: WebhookRegistry,
    broadcaster: Broadcaster,
}

impl InteractionDispatcher {
    pub fn new(followers: FollowerSets, webhooks: WebhookRegistry, broadcaster: Broadcaster) -> Self {
        Self {
            followers,
            webhooks,
            broadcaster,
        }
    }

    /// Parses a verified request body and handles it.
    pub async fn dispatch(&self, body: &[u8]) -> RelayResult<InteractionResponse> {
        let interaction: Interaction = serde_json::from_slice(body)?;
        self.handle(&interaction).await
    }

    /// Handles a parsed interaction.
    pub async fn handle(&self, interaction: &Interaction) -> RelayResult<InteractionResponse> {
        match interaction.kind {
            InteractionType::Ping => {
                debug!("Answering ping");
                Ok(InteractionResponse::pong())
            }
            InteractionType::ApplicationCommand => {
                let user = interaction
                    .invoking_user()
                    .ok_or(RelayError::MissingInvokingUser)?;
                let data = interaction
                    .data
                    .as_ref()
                    .ok_or(RelayError::MissingCommandData)?;
                let command = Command::from_data(data)?;
                self.execute(user, command).await
            }
            InteractionType::Other(kind) => Err(RelayError::UnknownInteractionType(kind)),
        }
    }

    async fn execute(&self, user: &User, command: Command) -> RelayResult<InteractionResponse> {
        match command {
            Command::Follow { target_id } => {
                self.followers.follow(&target_id, &user.id).await?;
                info!(user_id = %user.id, target_id = %target_id, "Followed");
                Ok(InteractionResponse::ephemeral(format!(
                    "Following <@{}>. You will receive their deets.",
                    target_id
                )))
            }
            Command::Unfollow { target_id } => {
                self.followers.unfollow(&target_id, &user.id).await?;
                info!(user_id = %user.id, target_id = %target_id, "Unfollowed");
                Ok(InteractionResponse::ephemeral(format!(
                    "Unfollowed <@{}>.",
                    target_id
                )))
            }
            Command::SetWebhook(options) => {
                self.webhooks.register(&user.id, &options.url).await?;
                info!(user_id = %user.id, "Webhook registered");
                Ok(InteractionResponse::ephemeral(WEBHOOK_SET_MESSAGE))
            }
            Command::Deet(options) => {
                // The acknowledgement does not reflect per-follower outcomes.
                self.broadcaster.broadcast(user, &options.content).await?;
                Ok(InteractionResponse::ephemeral(DEET_SENT_MESSAGE))
            }
        }
    }
}
