//! Checkout callback signature verification
//!
//! The provider signs a completed checkout as
//! `HMAC-SHA256(key_secret, "{order_id}|{payment_id}")` and hands the
//! lowercase hex digest to the client. A confirmation is trusted only if the
//! digest recomputed here with the server-side secret matches.

use crate::core::error::{ConfigError, SignatureError};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::fmt;

type HmacSha256 = Hmac<Sha256>;

/// Length of a hex-encoded SHA-256 MAC
const SIGNATURE_HEX_LEN: usize = 64;

/// Keyed HMAC-SHA256 verifier for checkout confirmations
#[derive(Clone)]
pub struct SignatureVerifier {
    keyed: HmacSha256,
}

impl SignatureVerifier {
    pub fn new(key_secret: &str) -> Result<Self, ConfigError> {
        if key_secret.is_empty() {
            return Err(ConfigError::MissingField {
                field: "key_secret".to_string(),
                context: "payments".to_string(),
            });
        }

        let keyed = HmacSha256::new_from_slice(key_secret.as_bytes()).map_err(|e| {
            ConfigError::InvalidValue {
                field: "key_secret".to_string(),
                value: "<redacted>".to_string(),
                message: e.to_string(),
            }
        })?;

        Ok(Self { keyed })
    }

    fn mac(&self, order_id: &str, payment_id: &str) -> HmacSha256 {
        let mut mac = self.keyed.clone();
        mac.update(order_id.as_bytes());
        mac.update(b"|");
        mac.update(payment_id.as_bytes());
        mac
    }

    /// Expected signature as lowercase hex
    pub fn sign(&self, order_id: &str, payment_id: &str) -> String {
        hex::encode(self.mac(order_id, payment_id).finalize().into_bytes())
    }

    /// Check a client-supplied signature
    ///
    /// The signature must be exactly 64 lowercase hex characters; the MAC
    /// comparison is constant-time.
    pub fn verify(
        &self,
        order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> Result<(), SignatureError> {
        let well_formed = signature.len() == SIGNATURE_HEX_LEN
            && signature
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        if !well_formed {
            return Err(SignatureError::Mismatch);
        }

        let supplied = hex::decode(signature).map_err(|_| SignatureError::Mismatch)?;
        self.mac(order_id, payment_id)
            .verify_slice(&supplied)
            .map_err(|_| SignatureError::Mismatch)
    }
}

impl fmt::Debug for SignatureVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignatureVerifier")
            .field("key_secret", &"<redacted>")
            .finish()
    }
}
