//! Typed decoding of chat-input command options.
//!
//! The platform sends options as a list of `{ name, type, value }` entries.
//! Each command that takes options gets a struct here with a
//! `from_options` constructor, so handlers never search the raw list.

use crate::errors::{RelayError, RelayResult};
use crate::interaction::{CommandOption, OptionType};

#[cfg(test)]
#[path = "options_tests.rs"]
mod tests;

/// Option name carrying the broadcast text.
pub const CONTENT_OPTION: &str = "content";

/// Option name carrying the delivery URL.
pub const URL_OPTION: &str = "url";

/// Options of the broadcast command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeetOptions {
    pub content: String,
}

impl DeetOptions {
    /// # Errors
    ///
    /// `MissingOption` when `content` is absent, `InvalidOptionType` when it
    /// is not a string.
    pub fn from_options(options: &[CommandOption]) -> RelayResult<Self> {
        Ok(Self {
            content: required_string(options, CONTENT_OPTION)?,
        })
    }
}

/// Options of the webhook registration command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetWebhookOptions {
    pub url: String,
}

impl SetWebhookOptions {
    /// # Errors
    ///
    /// `MissingOption` when `url` is absent, `InvalidOptionType` when it is
    /// not a string.
    pub fn from_options(options: &[CommandOption]) -> RelayResult<Self> {
        Ok(Self {
            url: required_string(options, URL_OPTION)?,
        })
    }
}

fn required_string(options: &[CommandOption], name: &str) -> RelayResult<String> {
    let option = options
        .iter()
        .find(|option| option.name == name)
        .ok_or_else(|| RelayError::MissingOption {
            name: name.to_string(),
        })?;

    if option.kind != OptionType::String {
        return Err(RelayError::InvalidOptionType {
            name: name.to_string(),
        });
    }

    match &option.value {
        Some(serde_json::Value::String(value)) => Ok(value.clone()),
        Some(_) => Err(RelayError::InvalidOptionType {
            name: name.to_string(),
        }),
        None => Err(RelayError::MissingOption {
            name: name.to_string(),
        }),
    }
}
