//! Text/bit conversion and the XOR stream combiner.

use crate::error::{CipherError, Result};
use crate::types::BitString;

/// How invalid UTF-8 is handled when bits are turned back into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodePolicy {
    /// Replace invalid sequences with U+FFFD.
    #[default]
    Lenient,
    /// Fail with `DecodeError`.
    Strict,
}

/// UTF-8 encode `text`, each byte as 8 bits, most significant first.
pub fn text_to_bits(text: &str) -> BitString {
    let mut bits = BitString::with_capacity(text.len() * 8);
    for &byte in text.as_bytes() {
        bits.push_field(u64::from(byte), 8);
    }
    bits
}

/// Group `bits` into bytes and decode them as UTF-8 under `policy`.
pub fn bits_to_text(bits: &BitString, policy: DecodePolicy) -> Result<String> {
    let bytes = bits.to_bytes()?;
    match policy {
        DecodePolicy::Lenient => Ok(String::from_utf8_lossy(&bytes).into_owned()),
        DecodePolicy::Strict => {
            String::from_utf8(bytes).map_err(|e| CipherError::DecodeError(e.to_string()))
        }
    }
}

/// XOR `bits` with the leading `bits.len()` bits of `keystream`.
///
/// Serves as both encryption and decryption.
pub fn xor_combine(bits: &BitString, keystream: &BitString) -> Result<BitString> {
    if bits.is_empty() {
        return Err(CipherError::EmptyInput);
    }
    if keystream.len() < bits.len() {
        return Err(CipherError::KeystreamTooShort {
            needed: bits.len(),
            available: keystream.len(),
        });
    }
    Ok(bits.iter().zip(keystream.iter()).map(|(a, k)| a != k).collect())
}

/// Encrypt `plaintext` with a raw keystream (no authentication).
pub fn encrypt_text(plaintext: &str, keystream: &BitString) -> Result<BitString> {
    xor_combine(&text_to_bits(plaintext), keystream)
}

/// Decrypt a raw ciphertext; invalid UTF-8 comes back as replacement characters.
pub fn decrypt_text(ciphertext: &BitString, keystream: &BitString) -> Result<String> {
    let plain = xor_combine(ciphertext, keystream)?;
    bits_to_text(&plain, DecodePolicy::Lenient)
}
