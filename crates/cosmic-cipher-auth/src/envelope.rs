//! Authenticated ciphertext envelope.
//!
//! The wire shape is
//!
//! ```json
//! { "ciphertext": "0110…", "mac": "<64 hex digits>", "iv": "<32 hex digits>" }
//! ```

use serde::{Deserialize, Serialize};

use cosmic_cipher_core::BitString;

use crate::crypto::{Iv, MAC_BYTES};
use crate::error::{AuthError, Result};

/// The packaged output of authenticated encryption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// Keystream-XORed plaintext bits.
    pub ciphertext: BitString,

    /// Lowercase hex HMAC-SHA256 over the ciphertext's `'0'/'1'` rendering.
    pub mac: String,

    /// Initialization value mixed into the session seed.
    pub iv: Iv,
}

impl Envelope {
    /// Check field shapes without touching the MAC.
    pub fn validate(&self) -> Result<()> {
        if self.ciphertext.is_empty() {
            return Err(AuthError::MalformedEnvelope("ciphertext is empty".into()));
        }
        if self.ciphertext.len() % 8 != 0 {
            return Err(AuthError::MalformedEnvelope(format!(
                "ciphertext length {} is not a multiple of 8",
                self.ciphertext.len()
            )));
        }
        let hex_ok = self.mac.len() == MAC_BYTES * 2
            && self
                .mac
                .bytes()
                .all(|c| c.is_ascii_digit() || (b'a'..=b'f').contains(&c));
        if !hex_ok {
            return Err(AuthError::MalformedEnvelope(format!(
                "mac must be {} lowercase hex digits",
                MAC_BYTES * 2
            )));
        }
        Ok(())
    }

    /// The MAC tag as raw bytes.
    pub fn mac_bytes(&self) -> Result<Vec<u8>> {
        self.validate()?;
        hex::decode(&self.mac).map_err(|e| AuthError::MalformedEnvelope(e.to_string()))
    }

    /// The bytes the MAC covers.
    pub fn authenticated_data(&self) -> Vec<u8> {
        self.ciphertext.to_string().into_bytes()
    }

    /// Ciphertext length in bits.
    pub fn ciphertext_len(&self) -> usize {
        self.ciphertext.len()
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| AuthError::MalformedEnvelope(e.to_string()))
    }

    /// Deserialize from JSON, rejecting malformed fields.
    pub fn from_json(s: &str) -> Result<Self> {
        let envelope: Self =
            serde_json::from_str(s).map_err(|e| AuthError::MalformedEnvelope(e.to_string()))?;
        envelope.validate()?;
        Ok(envelope)
    }

    /// Serialize to CBOR bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(self, &mut buf)
            .map_err(|e| AuthError::MalformedEnvelope(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize from CBOR bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let envelope: Self = ciborium::from_reader(bytes)
            .map_err(|e| AuthError::MalformedEnvelope(e.to_string()))?;
        envelope.validate()?;
        Ok(envelope)
    }
}
