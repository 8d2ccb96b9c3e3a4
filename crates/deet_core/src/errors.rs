//! Error types for the relay core.
//!
//! Errors fall into the categories the HTTP layer cares about:
//! - shape rejections raised while dispatching an interaction
//! - store failures raised by a key-value backend
//! - configuration failures raised at startup
//!
//! Per-follower delivery failures are absent here. They are
//! recorded as [`crate::broadcast::DeliveryOutcome::Failed`] and never
//! propagate out of the broadcast handler.

use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that terminate the handling of a single interaction.
#[derive(Error, Debug)]
pub enum RelayError {
    /// The request body could not be decoded as an interaction.
    #[error("Failed to parse interaction: {0}")]
    MalformedInteraction(#[from] serde_json::Error),

    /// The interaction type is neither a ping nor a command invocation.
    #[error("Unrecognized interaction type: {0}")]
    UnknownInteractionType(u8),

    /// The command data type is neither a chat-input nor a user command.
    #[error("Unrecognized command type: {0}")]
    UnknownCommandType(u8),

    /// The command name is not one the relay handles.
    #[error("Unrecognized command: {0}")]
    UnknownCommand(String),

    /// A command invocation arrived without command data.
    #[error("Command invocation has no command data")]
    MissingCommandData,

    /// Neither `member.user` nor `user` was present on the invocation.
    #[error("Command invocation has no invoking user")]
    MissingInvokingUser,

    /// A user command arrived without a target user id.
    #[error("User command has no target id")]
    MissingTargetId,

    /// A required command option was absent.
    #[error("Missing required option: {name}")]
    MissingOption { name: String },

    /// A command option carried a value of the wrong type.
    #[error("Option '{name}' has an unexpected type")]
    InvalidOptionType { name: String },

    /// The key-value store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors raised by a key-value store backend.
#[derive(Error, Debug, Clone)]
pub enum StoreError {
    /// The backend could not be reached or answered with an error.
    #[error("Store request failed: {message}")]
    Backend { message: String },

    /// A stored value could not be decoded.
    #[error("Stored value for key '{key}' is malformed: {reason}")]
    Corrupt { key: String, reason: String },
}

/// Errors raised while loading configuration from the environment.
///
/// Secret values are never included in messages.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration value: {name}")]
    Missing { name: String },

    #[error("Invalid configuration value for {name}: {reason}")]
    Invalid { name: String, reason: String },
}

/// Convenience alias for results produced while handling an interaction.
pub type RelayResult<T> = Result<T, RelayError>;
