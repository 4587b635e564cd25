//! Authenticated encryption over the chaotic keystream.
//!
//! Encrypt: `seed = key ⊕ iv`, generate a sequence long enough for the
//! message, quantize it, XOR, then MAC the ciphertext under the key.
//! Decrypt verifies the MAC first and does no keystream work on mismatch.

use rand::{CryptoRng, RngCore};

use cosmic_cipher_core::{
    bits_to_text, encode_keystream, generate_sequence, text_to_bits, xor_combine, BitString,
    ChaoticParameters, CipherError, DecodePolicy, DEFAULT_BITS_PER_VALUE,
};

use crate::crypto::{Iv, SessionKey};
use crate::envelope::Envelope;
use crate::error::{AuthError, Result};

/// Fresh IVs drawn before giving up on escaping orbits.
pub const MAX_IV_DRAWS: usize = 32;

/// Sequence length needed to cover `plaintext_bits` bits.
///
/// `bits × 8 / 6 + 100`, integer division. Depends only on the bit count,
/// so decryption recomputes it from the ciphertext length.
pub fn sequence_length_for(plaintext_bits: usize) -> usize {
    plaintext_bits * 8 / 6 + 100
}

/// Configuration for an [`AuthenticatedSession`].
///
/// Both ends of a conversation must use the same configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionConfig {
    /// Hénon map parameters.
    pub params: ChaoticParameters,
    /// Keystream bits per sample.
    pub bits_per_value: u32,
    /// Run the quality gate on every session sequence.
    ///
    /// The gate rejects sequences shorter than 1000 samples, i.e. messages
    /// under 93 bytes.
    pub quality_check: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            params: ChaoticParameters::default(),
            bits_per_value: DEFAULT_BITS_PER_VALUE,
            quality_check: false,
        }
    }
}

/// Encrypts and decrypts envelopes.
#[derive(Debug, Clone, Default)]
pub struct AuthenticatedSession {
    config: SessionConfig,
}

impl AuthenticatedSession {
    /// Create a session with the given configuration.
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }

    /// The session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Encrypt `message` under `key`.
    ///
    /// Without an `iv`, one is drawn from `rng`; if the resulting seed's
    /// orbit escapes, another is drawn (up to [`MAX_IV_DRAWS`]). A supplied
    /// `iv` is used as-is and its failures are returned.
    pub fn encrypt<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
        message: &str,
        key: &SessionKey,
        iv: Option<Iv>,
    ) -> Result<Envelope> {
        if let Some(iv) = iv {
            return self.encrypt_with_iv(message, key, iv);
        }

        let mut last_err = None;
        for _ in 0..MAX_IV_DRAWS {
            match self.encrypt_with_iv(message, key, Iv::generate(rng)) {
                Err(AuthError::Cipher(CipherError::SequenceDiverged { step })) => {
                    tracing::warn!(step, "session orbit escaped, drawing a new IV");
                    last_err = Some(CipherError::SequenceDiverged { step });
                }
                other => return other,
            }
        }
        Err(last_err
            .unwrap_or(CipherError::SequenceDiverged { step: 0 })
            .into())
    }

    /// Encrypt `message` under `key` with a fixed `iv`.
    pub fn encrypt_with_iv(&self, message: &str, key: &SessionKey, iv: Iv) -> Result<Envelope> {
        if message.is_empty() {
            return Err(CipherError::EmptyInput.into());
        }

        let plaintext = text_to_bits(message);
        let keystream = self.keystream(key, iv, plaintext.len())?;
        let ciphertext = xor_combine(&plaintext, &keystream)?;
        let mac = key.mac(ciphertext.to_string().as_bytes())?;

        Ok(Envelope {
            ciphertext,
            mac: hex::encode(mac),
            iv,
        })
    }

    /// Verify and decrypt `envelope`.
    pub fn decrypt(&self, envelope: &Envelope, key: &SessionKey) -> Result<String> {
        let tag = envelope.mac_bytes()?;
        if let Err(e) = key.verify_mac(&envelope.authenticated_data(), &tag) {
            tracing::warn!(iv = %envelope.iv, "envelope failed authentication");
            return Err(e);
        }

        let keystream = self.keystream(key, envelope.iv, envelope.ciphertext_len())?;
        let plaintext = xor_combine(&envelope.ciphertext, &keystream)?;
        bits_to_text(&plaintext, DecodePolicy::Strict).map_err(|e| match e {
            CipherError::DecodeError(msg) => AuthError::DecodeError(msg),
            other => AuthError::Cipher(other),
        })
    }

    fn keystream(&self, key: &SessionKey, iv: Iv, plaintext_bits: usize) -> Result<BitString> {
        let length = sequence_length_for(plaintext_bits);
        tracing::debug!(plaintext_bits, length, "generating session keystream");

        let seed = key.working_seed(iv);
        let sequence = generate_sequence(
            &seed,
            length,
            self.config.params,
            self.config.quality_check,
        )?;
        Ok(encode_keystream(&sequence, self.config.bits_per_value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    const GOLDEN_IV: u128 = 0x0f0e0d0c0b0a09080706050403020100;

    fn counting_key() -> SessionKey {
        let mut bytes = [0u8; 32];
        for (i, b) in bytes.iter_mut().enumerate() {
            *b = i as u8 + 1;
        }
        SessionKey::from_bytes(bytes)
    }

    #[test]
    fn test_sequence_length_formula() {
        assert_eq!(sequence_length_for(96), 228);
        assert_eq!(sequence_length_for(0), 100);
        assert_eq!(sequence_length_for(8), 110);
    }

    #[test]
    fn test_golden_envelope() {
        let session = AuthenticatedSession::default();
        let envelope = session
            .encrypt_with_iv("test message", &counting_key(), Iv(GOLDEN_IV))
            .unwrap();
        assert_eq!(
            envelope.ciphertext.to_string(),
            "011110001001010101001100010001100011001100101001111101100000000010010001011010000010010001011100"
        );
        assert_eq!(
            envelope.mac,
            "9eaf7e9141047ab9e1b387d19609003c13230fc6f32b0d20fbb23c8c2a639fa9"
        );
        assert_eq!(envelope.iv.to_hex(), "0f0e0d0c0b0a09080706050403020100");
    }

    #[test]
    fn test_round_trip_fixed_iv() {
        let session = AuthenticatedSession::default();
        let key = counting_key();
        let long = "cosmic ".repeat(200);
        for message in ["test message", "Secret message 🔒 ñ e\u{301}", long.as_str()] {
            let envelope = session.encrypt_with_iv(message, &key, Iv(GOLDEN_IV)).unwrap();
            assert_eq!(session.decrypt(&envelope, &key).unwrap(), message);
        }
    }

    #[test]
    fn test_round_trip_random_iv() {
        let session = AuthenticatedSession::default();
        let key = counting_key();
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        for _ in 0..20 {
            let envelope = session.encrypt(&mut rng, "hello", &key, None).unwrap();
            assert_eq!(session.decrypt(&envelope, &key).unwrap(), "hello");
        }
    }

    #[test]
    fn test_supplied_iv_is_used() {
        let session = AuthenticatedSession::default();
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let envelope = session
            .encrypt(&mut rng, "abc", &counting_key(), Some(Iv(GOLDEN_IV)))
            .unwrap();
        assert_eq!(envelope.iv, Iv(GOLDEN_IV));
    }

    #[test]
    fn test_supplied_iv_escape_is_reported() {
        // key ⊕ iv = 1, whose orbit escapes.
        let key = SessionKey::from_seed(&cosmic_cipher_core::Seed::from_u128(1)).unwrap();
        let err = AuthenticatedSession::default()
            .encrypt_with_iv("abc", &key, Iv(0))
            .unwrap_err();
        assert!(matches!(
            err,
            AuthError::Cipher(CipherError::SequenceDiverged { .. })
        ));
    }

    #[test]
    fn test_empty_message_rejected() {
        let err = AuthenticatedSession::default()
            .encrypt_with_iv("", &counting_key(), Iv(GOLDEN_IV))
            .unwrap_err();
        assert!(matches!(err, AuthError::Cipher(CipherError::EmptyInput)));
    }

    #[test]
    fn test_every_bit_flip_detected() {
        let session = AuthenticatedSession::default();
        let key = counting_key();
        let envelope = session
            .encrypt_with_iv("test message", &key, Iv(GOLDEN_IV))
            .unwrap();
        for i in 0..envelope.ciphertext_len() {
            let mut tampered = envelope.clone();
            tampered.ciphertext.flip(i);
            assert!(matches!(
                session.decrypt(&tampered, &key),
                Err(AuthError::AuthenticationFailed)
            ));
        }
    }

    #[test]
    fn test_wrong_key_fails_authentication() {
        let session = AuthenticatedSession::default();
        let envelope = session
            .encrypt_with_iv("test message", &counting_key(), Iv(GOLDEN_IV))
            .unwrap();
        let other = SessionKey::from_bytes([0x42; 32]);
        assert!(matches!(
            session.decrypt(&envelope, &other),
            Err(AuthError::AuthenticationFailed)
        ));
    }

    #[test]
    fn test_tampered_iv_still_authenticates_but_fails_decoding() {
        // The MAC covers only the ciphertext; a changed IV decodes to invalid UTF-8.
        let session = AuthenticatedSession::default();
        let key = counting_key();
        let mut envelope = session
            .encrypt_with_iv("test message", &key, Iv(GOLDEN_IV))
            .unwrap();
        envelope.iv = Iv(2);
        assert!(matches!(
            session.decrypt(&envelope, &key),
            Err(AuthError::DecodeError(_))
        ));
    }

    #[test]
    fn test_authentic_invalid_utf8_is_decode_error() {
        let session = AuthenticatedSession::default();
        let key = counting_key();
        let mut plaintext = BitString::with_capacity(8);
        plaintext.push_field(0xff, 8);
        let keystream = session.keystream(&key, Iv(GOLDEN_IV), plaintext.len()).unwrap();
        let ciphertext = xor_combine(&plaintext, &keystream).unwrap();
        let mac = key.mac(ciphertext.to_string().as_bytes()).unwrap();
        let envelope = Envelope {
            ciphertext,
            mac: hex::encode(mac),
            iv: Iv(GOLDEN_IV),
        };
        assert!(matches!(
            session.decrypt(&envelope, &key),
            Err(AuthError::DecodeError(_))
        ));
    }

    #[test]
    fn test_malformed_mac_rejected_before_verification() {
        let session = AuthenticatedSession::default();
        let key = counting_key();
        let mut envelope = session.encrypt_with_iv("abc", &key, Iv(GOLDEN_IV)).unwrap();
        envelope.mac = "not hex".into();
        assert!(matches!(
            session.decrypt(&envelope, &key),
            Err(AuthError::MalformedEnvelope(_))
        ));
    }

    #[test]
    fn test_authentic_partial_byte_ciphertext_is_malformed() {
        let session = AuthenticatedSession::default();
        let key = counting_key();
        let ciphertext: BitString = "0110100".parse().unwrap();
        let mac = key.mac(ciphertext.to_string().as_bytes()).unwrap();
        let envelope = Envelope {
            ciphertext,
            mac: hex::encode(mac),
            iv: Iv(GOLDEN_IV),
        };
        assert!(matches!(
            session.decrypt(&envelope, &key),
            Err(AuthError::MalformedEnvelope(_))
        ));
    }

    #[test]
    fn test_mismatched_configs_fail_to_decode() {
        let key = counting_key();
        let sender = AuthenticatedSession::new(SessionConfig {
            bits_per_value: 16,
            ..SessionConfig::default()
        });
        let envelope = sender.encrypt_with_iv("config", &key, Iv(GOLDEN_IV)).unwrap();
        assert_eq!(sender.decrypt(&envelope, &key).unwrap(), "config");

        let receiver = AuthenticatedSession::default();
        assert_ne!(receiver.decrypt(&envelope, &key).ok().as_deref(), Some("config"));
    }

    #[test]
    fn test_quality_gate_applies_to_long_messages() {
        let session = AuthenticatedSession::new(SessionConfig {
            quality_check: true,
            ..SessionConfig::default()
        });
        let key = counting_key();
        assert!(matches!(
            session.encrypt_with_iv("short", &key, Iv(GOLDEN_IV)),
            Err(AuthError::Cipher(CipherError::QualityCheckFailed(_)))
        ));

        let long = "x".repeat(200);
        let envelope = session.encrypt_with_iv(&long, &key, Iv(GOLDEN_IV)).unwrap();
        assert_eq!(session.decrypt(&envelope, &key).unwrap(), long);
    }

    proptest! {
        #[test]
        fn fixed_iv_round_trips_or_reports_escape(
            key in any::<[u8; 32]>(),
            iv in any::<u128>(),
            message in "[ -~]{1,40}",
        ) {
            let session = AuthenticatedSession::default();
            let key = SessionKey::from_bytes(key);
            match session.encrypt_with_iv(&message, &key, Iv(iv)) {
                Ok(envelope) => prop_assert_eq!(session.decrypt(&envelope, &key).unwrap(), message),
                Err(e) => {
                    let escaped =
                        matches!(e, AuthError::Cipher(CipherError::SequenceDiverged { .. }));
                    prop_assert!(escaped, "unexpected error: {}", e);
                }
            }
        }
    }
}
