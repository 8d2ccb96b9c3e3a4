//! Request signature verification.
//!
//! Every inbound interaction carries a detached Ed25519 signature over
//! `timestamp || body`, hex-encoded in [`SIGNATURE_HEADER`], with the
//! timestamp in [`TIMESTAMP_HEADER`]. Verification is a hard gate: the HTTP
//! layer must reject a request for which [`SignatureVerifier::verify`]
//! returns `false` before parsing the body or touching a store.

use ed25519_dalek::{Signature, Verifier, VerifyingKey, PUBLIC_KEY_LENGTH};
use tracing::debug;

use crate::errors::ConfigError;

#[cfg(test)]
#[path = "signature_tests.rs"]
mod tests;

/// Header carrying the hex-encoded signature.
pub const SIGNATURE_HEADER: &str = "x-signature-ed25519";

/// Header carrying the signing timestamp.
pub const TIMESTAMP_HEADER: &str = "x-signature-timestamp";

/// Verifies inbound request signatures against the application public key.
#[derive(Debug, Clone)]
pub struct SignatureVerifier {
    public_key: VerifyingKey,
}

impl SignatureVerifier {
    pub fn new(public_key: VerifyingKey) -> Self {
        Self { public_key }
    }

    /// Parses a hex-encoded 32 byte public key.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` naming `name` when the value is not
    /// valid hex, has the wrong length, or is not a valid curve point.
    pub fn from_hex(name: &str, public_key_hex: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: &str| ConfigError::Invalid {
            name: name.to_string(),
            reason: reason.to_string(),
        };

        let bytes = hex::decode(public_key_hex.trim()).map_err(|_| invalid("not valid hex"))?;
        let bytes: [u8; PUBLIC_KEY_LENGTH] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| invalid("expected 32 bytes"))?;
        let public_key =
            VerifyingKey::from_bytes(&bytes).map_err(|_| invalid("not a valid Ed25519 key"))?;

        Ok(Self::new(public_key))
    }

    /// Returns `true` only when `signature` is a valid signature over
    /// `timestamp || body`.
    ///
    /// A missing or empty header is never valid.
    pub fn verify(&self, body: &[u8], signature: Option<&str>, timestamp: Option<&str>) -> bool {
        let (Some(signature_hex), Some(timestamp)) = (signature, timestamp) else {
            debug!("Signature or timestamp header missing");
            return false;
        };

        if signature_hex.is_empty() || timestamp.is_empty() {
            debug!("Signature or timestamp header empty");
            return false;
        }

        let Ok(signature_bytes) = hex::decode(signature_hex) else {
            debug!("Signature header is not valid hex");
            return false;
        };

        let Ok(signature) = Signature::from_slice(&signature_bytes) else {
            debug!("Signature has invalid length");
            return false;
        };

        let mut message = Vec::with_capacity(timestamp.len() + body.len());
        message.extend_from_slice(timestamp.as_bytes());
        message.extend_from_slice(body);

        self.public_key.verify(&message, &signature).is_ok()
    }
}
