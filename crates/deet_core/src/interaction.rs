//! Wire model for inbound interactions and their synchronous responses.
//!
//! Only the fields the relay reads are modelled; everything else in the
//! platform's payload is ignored during deserialization. Numeric type tags
//! that the relay does not handle are preserved in `Other` variants so the
//! dispatcher can report them.

use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "interaction_tests.rs"]
mod tests;

/// Message flag marking a reply as visible only to the invoking user.
pub const EPHEMERAL_FLAG: u64 = 1 << 6;

const CDN_BASE_URL: &str = "https://cdn.discordapp.com";

/// Top-level interaction kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum InteractionType {
    Ping,
    ApplicationCommand,
    Other(u8),
}

impl From<u8> for InteractionType {
    fn from(value: u8) -> Self {
        match value {
            1 => InteractionType::Ping,
            2 => InteractionType::ApplicationCommand,
            other => InteractionType::Other(other),
        }
    }
}

impl From<InteractionType> for u8 {
    fn from(value: InteractionType) -> Self {
        match value {
            InteractionType::Ping => 1,
            InteractionType::ApplicationCommand => 2,
            InteractionType::Other(other) => other,
        }
    }
}

/// Shape of an application command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum CommandType {
    /// Slash command typed into the chat box.
    ChatInput,
    /// Command invoked from a user's context menu.
    User,
    /// Command invoked from a message's context menu.
    Message,
    Other(u8),
}

impl From<u8> for CommandType {
    fn from(value: u8) -> Self {
        match value {
            1 => CommandType::ChatInput,
            2 => CommandType::User,
            3 => CommandType::Message,
            other => CommandType::Other(other),
        }
    }
}

impl From<CommandType> for u8 {
    fn from(value: CommandType) -> Self {
        match value {
            CommandType::ChatInput => 1,
            CommandType::User => 2,
            CommandType::Message => 3,
            CommandType::Other(other) => other,
        }
    }
}

/// Value type of a command option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum OptionType {
    String,
    Other(u8),
}

impl From<u8> for OptionType {
    fn from(value: u8) -> Self {
        match value {
            3 => OptionType::String,
            other => OptionType::Other(other),
        }
    }
}

impl From<OptionType> for u8 {
    fn from(value: OptionType) -> Self {
        match value {
            OptionType::String => 3,
            OptionType::Other(other) => other,
        }
    }
}

/// A platform user as carried on an interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,

    /// Legacy four-digit tag; `"0"` for accounts on unique usernames.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<String>,

    /// Avatar hash, absent when the user has the default avatar.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl User {
    /// Name shown on delivered messages.
    ///
    /// `username#1234` for legacy accounts, `username` otherwise.
    pub fn display_name(&self) -> String {
        match self.discriminator.as_deref() {
            Some(tag) if !tag.is_empty() && tag != "0" => format!("{}#{}", self.username, tag),
            _ => self.username.clone(),
        }
    }

    /// CDN URL of the user's avatar, or `None` for the default avatar.
    pub fn avatar_url(&self) -> Option<String> {
        let hash = self.avatar.as_deref()?;
        let extension = if hash.starts_with("a_") { "gif" } else { "png" };
        Some(format!(
            "{}/avatars/{}/{}.{}",
            CDN_BASE_URL, self.id, hash, extension
        ))
    }
}

/// Guild membership context; present when invoked inside a guild.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    #[serde(default)]
    pub user: Option<User>,
}

/// A single named option value supplied with a chat-input command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandOption {
    pub name: String,

    #[serde(rename = "type")]
    pub kind: OptionType,

    #[serde(default)]
    pub value: Option<serde_json::Value>,
}

/// Command payload of an application command interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandData {
    pub name: String,

    #[serde(rename = "type")]
    pub kind: CommandType,

    /// Target user of a user command.
    #[serde(default)]
    pub target_id: Option<String>,

    #[serde(default)]
    pub options: Vec<CommandOption>,
}

/// An inbound interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    #[serde(rename = "type")]
    pub kind: InteractionType,

    #[serde(default)]
    pub data: Option<CommandData>,

    #[serde(default)]
    pub member: Option<Member>,

    #[serde(default)]
    pub user: Option<User>,
}

impl Interaction {
    /// Resolves the invoking user: guild member first, then the direct user.
    pub fn invoking_user(&self) -> Option<&User> {
        self.member
            .as_ref()
            .and_then(|member| member.user.as_ref())
            .or(self.user.as_ref())
    }
}

/// Kind of synchronous interaction response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ResponseType {
    Pong,
    ChannelMessageWithSource,
}

impl TryFrom<u8> for ResponseType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(ResponseType::Pong),
            4 => Ok(ResponseType::ChannelMessageWithSource),
            other => Err(format!("unsupported response type {}", other)),
        }
    }
}

impl From<ResponseType> for u8 {
    fn from(value: ResponseType) -> Self {
        match value {
            ResponseType::Pong => 1,
            ResponseType::ChannelMessageWithSource => 4,
        }
    }
}

/// Message body of a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseMessage {
    pub content: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flags: Option<u64>,
}

/// The single reply produced for every handled interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionResponse {
    #[serde(rename = "type")]
    pub kind: ResponseType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<ResponseMessage>,
}

impl InteractionResponse {
    /// Reply to a liveness ping.
    pub fn pong() -> Self {
        Self {
            kind: ResponseType::Pong,
            data: None,
        }
    }

    /// Message visible only to the invoking user.
    pub fn ephemeral(content: impl Into<String>) -> Self {
        Self {
            kind: ResponseType::ChannelMessageWithSource,
            data: Some(ResponseMessage {
                content: content.into(),
                flags: Some(EPHEMERAL_FLAG),
            }),
        }
    }

    /// Whether the reply is visible only to the invoking user.
    pub fn is_ephemeral(&self) -> bool {
        self.data
            .as_ref()
            .and_then(|data| data.flags)
            .is_some_and(|flags| flags & EPHEMERAL_FLAG != 0)
    }

    /// Text content of the reply, if any.
    pub fn content(&self) -> Option<&str> {
        self.data.as_ref().map(|data| data.content.as_str())
    }
}
