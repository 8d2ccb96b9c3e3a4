//! Deet relay core
//!
//! Business logic for the deet relay: a chat-platform interaction endpoint
//! that lets users follow each other and fans short messages ("deets") out
//! to each follower's registered webhook.
//!
//! # Architecture
//!
//! - [`signature`] authenticates inbound request bodies
//! - [`dispatcher`] routes verified interactions to a handler
//! - [`followers`] and [`webhooks`] are typed views over two
//!   [`store::KeyValueStore`] namespaces
//! - [`broadcast`] performs the bounded parallel fan-out
//! - [`context`] wires configuration, stores and the dispatcher together
//!
//! This crate knows nothing about HTTP servers. The dependency flows:
//! HTTP API -> core, never the reverse.

pub mod broadcast;
pub mod cloudflare;
pub mod commands;
pub mod config;
pub mod context;
pub mod dispatcher;
pub mod errors;
pub mod followers;
pub mod interaction;
pub mod options;
pub mod signature;
pub mod store;
pub mod webhooks;

// Re-export key types for convenience
pub use broadcast::{Broadcaster, BroadcastSummary, DeliveryOutcome, DeliveryPayload};
pub use config::RelayConfig;
pub use context::RelayContext;
pub use dispatcher::InteractionDispatcher;
pub use errors::{ConfigError, RelayError, RelayResult, StoreError};
pub use interaction::{Interaction, InteractionResponse};
pub use signature::{SignatureVerifier, SIGNATURE_HEADER, TIMESTAMP_HEADER};
pub use store::{InMemoryStore, KeyValueStore};
