//! Key, IV and MAC primitives for the authenticated session.

use hmac::{Hmac, Mac};
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::Sha256;
use std::fmt;
use std::str::FromStr;

use cosmic_cipher_core::{CipherError, Seed};

use crate::error::{AuthError, Result};

type HmacSha256 = Hmac<Sha256>;

/// Width of a session key in bytes.
pub const KEY_BYTES: usize = 32;
/// Width of an IV in hex digits.
pub const IV_HEX_LEN: usize = 32;
/// Width of a MAC tag in bytes.
pub const MAC_BYTES: usize = 32;

/// A session key: an integer of at most 256 bits, held big-endian.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionKey([u8; KEY_BYTES]);

impl SessionKey {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; KEY_BYTES]) -> Self {
        Self(bytes)
    }

    /// Widen a seed to a key. Seeds above 256 bits are rejected.
    pub fn from_seed(seed: &Seed) -> Result<Self> {
        let padded = seed.to_be_bytes_padded(KEY_BYTES).ok_or_else(|| {
            CipherError::InvalidLength(format!(
                "key is {} bits, at most {} supported",
                seed.bit_len(),
                KEY_BYTES * 8
            ))
        })?;
        let mut bytes = [0u8; KEY_BYTES];
        bytes.copy_from_slice(&padded);
        Ok(Self(bytes))
    }

    /// Get the raw bytes (the MAC key).
    pub const fn as_bytes(&self) -> &[u8; KEY_BYTES] {
        &self.0
    }

    /// Convert to 64 hex digits.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from up to 64 hex digits.
    pub fn from_hex(s: &str) -> Result<Self> {
        let seed = Seed::from_hex(s).map_err(|e| AuthError::KeyDerivation(e.to_string()))?;
        Self::from_seed(&seed)
    }

    /// The integer value as a seed.
    pub fn to_seed(&self) -> Seed {
        Seed::from_be_bytes(&self.0)
    }

    /// `key XOR iv`, the seed that drives the session keystream.
    pub fn working_seed(&self, iv: Iv) -> Seed {
        self.to_seed().xor(&Seed::from_u128(iv.0))
    }

    /// HMAC-SHA256 of `data` under this key.
    pub fn mac(&self, data: &[u8]) -> Result<[u8; MAC_BYTES]> {
        let mut mac = self.hmac()?;
        mac.update(data);
        Ok(mac.finalize().into_bytes().into())
    }

    /// Constant-time check of `tag` against the HMAC of `data`.
    pub fn verify_mac(&self, data: &[u8], tag: &[u8]) -> Result<()> {
        let mut mac = self.hmac()?;
        mac.update(data);
        mac.verify_slice(tag).map_err(|_| AuthError::AuthenticationFailed)
    }

    fn hmac(&self) -> Result<HmacSha256> {
        HmacSha256::new_from_slice(&self.0).map_err(|e| AuthError::KeyDerivation(e.to_string()))
    }
}

impl fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionKey(..)")
    }
}

/// A 128-bit initialization value.
///
/// Always rendered as 32 lowercase hex digits, zero-padded, so the encoding
/// round-trips exactly.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Iv(pub u128);

impl Iv {
    /// Draw a fresh IV.
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let mut bytes = [0u8; 16];
        rng.fill_bytes(&mut bytes);
        Self(u128::from_be_bytes(bytes))
    }

    /// Get the integer value.
    pub const fn value(&self) -> u128 {
        self.0
    }

    /// Convert to the canonical 32-digit hex form.
    pub fn to_hex(&self) -> String {
        format!("{:032x}", self.0)
    }

    /// Parse the canonical form. Anything but 32 lowercase hex digits fails.
    pub fn from_hex(s: &str) -> Result<Self> {
        let canonical = s.len() == IV_HEX_LEN
            && s
                .bytes()
                .all(|c| c.is_ascii_digit() || (b'a'..=b'f').contains(&c));
        if !canonical {
            return Err(AuthError::MalformedEnvelope(format!(
                "iv must be {IV_HEX_LEN} lowercase hex digits, got {s:?}"
            )));
        }
        u128::from_str_radix(s, 16)
            .map(Self)
            .map_err(|e| AuthError::MalformedEnvelope(e.to_string()))
    }
}

impl fmt::Debug for Iv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Iv({})", self.to_hex())
    }
}

impl fmt::Display for Iv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<u128> for Iv {
    fn from(value: u128) -> Self {
        Self(value)
    }
}

impl FromStr for Iv {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl Serialize for Iv {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Iv {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn counting_key() -> SessionKey {
        let mut bytes = [0u8; KEY_BYTES];
        for (i, b) in bytes.iter_mut().enumerate() {
            *b = i as u8 + 1;
        }
        SessionKey::from_bytes(bytes)
    }

    #[test]
    fn test_key_from_seed_pads() {
        let key = SessionKey::from_seed(&Seed::from_u128(0xabcd)).unwrap();
        assert_eq!(key.as_bytes()[30..], [0xab, 0xcd]);
        assert!(key.as_bytes()[..30].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_key_rejects_wide_seed() {
        let wide = Seed::from_be_bytes(&[1u8; 33]);
        assert!(matches!(
            SessionKey::from_seed(&wide),
            Err(AuthError::Cipher(CipherError::InvalidLength(_)))
        ));
    }

    #[test]
    fn test_key_hex_roundtrip() {
        let key = counting_key();
        let recovered = SessionKey::from_hex(&key.to_hex()).unwrap();
        assert_eq!(key, recovered);
        assert!(SessionKey::from_hex("zz").is_err());
    }

    #[test]
    fn test_working_seed_xors_low_bytes() {
        let key = counting_key();
        let seed = key.working_seed(Iv(0x0f0e0d0c0b0a09080706050403020100));
        assert_eq!(
            seed.to_hex(),
            "0102030405060708090a0b0c0d0e0f101e1c1e181e1c1e101e1c1e181e1c1e20"
        );
    }

    #[test]
    fn test_iv_hex_is_zero_padded() {
        let iv = Iv(0x0abc);
        assert_eq!(iv.to_hex(), "00000000000000000000000000000abc");
        assert_eq!(Iv::from_hex(&iv.to_hex()).unwrap(), iv);
    }

    #[test]
    fn test_iv_rejects_non_canonical() {
        assert!(Iv::from_hex("abc").is_err());
        assert!(Iv::from_hex("0000000000000000000000000000ABCD").is_err());
        assert!(Iv::from_hex("0x000000000000000000000000000abcd").is_err());
    }

    #[test]
    fn test_iv_generate_uses_rng() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let a = Iv::generate(&mut rng);
        let b = Iv::generate(&mut rng);
        assert_ne!(a, b);
    }

    #[test]
    fn test_mac_verify() {
        let key = counting_key();
        let tag = key.mac(b"0101").unwrap();
        key.verify_mac(b"0101", &tag).unwrap();
        assert!(matches!(
            key.verify_mac(b"0100", &tag),
            Err(AuthError::AuthenticationFailed)
        ));
        assert!(matches!(
            key.verify_mac(b"0101", &tag[..16]),
            Err(AuthError::AuthenticationFailed)
        ));
    }

    #[test]
    fn test_key_debug_redacted() {
        assert_eq!(format!("{:?}", counting_key()), "SessionKey(..)");
    }
}
