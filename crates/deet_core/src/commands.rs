//! Application command definitions.
//!
//! The names here are shared by the dispatcher, which routes on them, and
//! by the registration CLI, which publishes them to the platform.

use serde::{Deserialize, Serialize};

use crate::interaction::{CommandType, OptionType};
use crate::options::{CONTENT_OPTION, URL_OPTION};

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;

/// User context-menu command that follows the clicked user.
pub const FOLLOW_COMMAND: &str = "Follow";

/// User context-menu command that unfollows the clicked user.
pub const UNFOLLOW_COMMAND: &str = "Unfollow";

/// Chat-input command broadcasting a message to followers.
pub const DEET_COMMAND: &str = "deet";

/// Chat-input command registering the caller's delivery URL.
pub const SET_WEBHOOK_COMMAND: &str = "setwebhook";

/// An option as published in a command definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionDefinition {
    pub name: String,

    #[serde(rename = "type")]
    pub kind: OptionType,

    pub description: String,

    #[serde(default)]
    pub required: bool,
}

/// A command as published to the platform's bulk-overwrite endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandDefinition {
    pub name: String,

    #[serde(rename = "type")]
    pub kind: CommandType,

    /// Must be empty for user commands.
    #[serde(default)]
    pub description: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionDefinition>,
}

impl CommandDefinition {
    fn user(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: CommandType::User,
            description: String::new(),
            options: Vec::new(),
        }
    }

    fn chat_input(name: &str, description: &str, options: Vec<OptionDefinition>) -> Self {
        Self {
            name: name.to_string(),
            kind: CommandType::ChatInput,
            description: description.to_string(),
            options,
        }
    }
}

fn required_string(name: &str, description: &str) -> OptionDefinition {
    OptionDefinition {
        name: name.to_string(),
        kind: OptionType::String,
        description: description.to_string(),
        required: true,
    }
}

/// Every command the relay handles, in registration order.
pub fn application_commands() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::user(FOLLOW_COMMAND),
        CommandDefinition::user(UNFOLLOW_COMMAND),
        CommandDefinition::chat_input(
            DEET_COMMAND,
            "Send a deet to everyone following you",
            vec![required_string(CONTENT_OPTION, "What to say")],
        ),
        CommandDefinition::chat_input(
            SET_WEBHOOK_COMMAND,
            "Set the webhook that receives deets from people you follow",
            vec![required_string(URL_OPTION, "Webhook URL")],
        ),
    ]
}
