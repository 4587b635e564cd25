//! The CosmicCipher facade: one configured entry point for the pipeline.
//!
//! The facade holds an [`AuthenticatedSession`] and a [`KeyStretcher`] built
//! from a single [`CipherConfig`], and draws its randomness from the
//! operating system.

use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};

use cosmic_cipher_auth::{
    AuthenticatedSession, Envelope, Iv, KeyStretcher, SessionConfig, SessionKey, StretchedKey,
    DEFAULT_ITERATIONS, KEY_BYTES,
};
use cosmic_cipher_core::keystream::MAX_BITS_PER_VALUE;
use cosmic_cipher_core::{
    analyze, BitString, ChaoticParameters, ChaoticSequence, CipherError, Seed, SeedSource,
    StrengthReport, DEFAULT_BITS_PER_VALUE,
};

use crate::error::{CosmicError, Result};

/// Configuration for [`CosmicCipher`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CipherConfig {
    /// Hénon map parameters.
    pub params: ChaoticParameters,
    /// Keystream bits per sample.
    pub bits_per_value: u32,
    /// Run the quality gate on generated sequences.
    pub quality_check: bool,
    /// HMAC rounds for key stretching.
    pub stretch_iterations: usize,
}

impl Default for CipherConfig {
    fn default() -> Self {
        Self {
            params: ChaoticParameters::default(),
            bits_per_value: DEFAULT_BITS_PER_VALUE,
            quality_check: false,
            stretch_iterations: DEFAULT_ITERATIONS,
        }
    }
}

impl CipherConfig {
    /// Reject settings the pipeline would fail on later.
    pub fn validate(&self) -> Result<()> {
        self.params.validate()?;
        if self.bits_per_value == 0 || self.bits_per_value > MAX_BITS_PER_VALUE {
            return Err(CipherError::InvalidBitWidth(self.bits_per_value).into());
        }
        if self.stretch_iterations == 0 {
            return Err(CosmicError::InvalidConfig(
                "stretch_iterations must be at least 1".into(),
            ));
        }
        Ok(())
    }

    fn session_config(&self) -> SessionConfig {
        SessionConfig {
            params: self.params,
            bits_per_value: self.bits_per_value,
            quality_check: self.quality_check,
        }
    }
}

/// The main Cosmic Cipher entry point.
///
/// Provides:
/// - Key and seed generation
/// - Authenticated encrypt/decrypt
/// - Key stretching
/// - The raw pipeline stages and a strength report
#[derive(Debug, Clone)]
pub struct CosmicCipher {
    config: CipherConfig,
    session: AuthenticatedSession,
    stretcher: KeyStretcher,
}

impl Default for CosmicCipher {
    fn default() -> Self {
        let config = CipherConfig::default();
        Self {
            session: AuthenticatedSession::new(config.session_config()),
            stretcher: KeyStretcher::default(),
            config,
        }
    }
}

impl CosmicCipher {
    /// Create a cipher from a validated configuration.
    pub fn new(config: CipherConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            session: AuthenticatedSession::new(config.session_config()),
            stretcher: KeyStretcher::new(config.stretch_iterations)?,
            config,
        })
    }

    /// Get the configuration.
    pub fn config(&self) -> &CipherConfig {
        &self.config
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Authenticated Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Generate a fresh 256-bit session key.
    pub fn generate_key(&self) -> Result<SessionKey> {
        let (seed, _) = self.generate_seed(KEY_BYTES, true)?;
        Ok(SessionKey::from_seed(&seed)?)
    }

    /// Encrypt `message` under `key` with a fresh IV.
    pub fn encrypt(&self, message: &str, key: &SessionKey) -> Result<Envelope> {
        Ok(self.session.encrypt(&mut OsRng, message, key, None)?)
    }

    /// Encrypt `message` under `key` with a caller-chosen IV.
    pub fn encrypt_with_iv(&self, message: &str, key: &SessionKey, iv: Iv) -> Result<Envelope> {
        Ok(self.session.encrypt_with_iv(message, key, iv)?)
    }

    /// Verify and decrypt an envelope.
    pub fn decrypt(&self, envelope: &Envelope, key: &SessionKey) -> Result<String> {
        Ok(self.session.decrypt(envelope, key)?)
    }

    /// Stretch key material with the configured round count.
    pub fn stretch_key(
        &self,
        key: &[u8],
        on_progress: Option<&mut dyn FnMut(f64)>,
    ) -> Result<StretchedKey> {
        Ok(self.stretcher.stretch(&mut OsRng, key, on_progress)?)
    }

    /// Score a ciphertext or keystream for entropy and repetition.
    pub fn analyze(&self, data: &[u8]) -> StrengthReport {
        analyze(data)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Pipeline Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Draw a seed from the system sources.
    ///
    /// Returns the seed and whether the OS source produced it.
    pub fn generate_seed(&self, byte_length: usize, allow_fallback: bool) -> Result<(Seed, bool)> {
        let (seed, used_primary) = SeedSource::system().generate_seed(byte_length, allow_fallback)?;
        if !used_primary {
            tracing::debug!(byte_length, "seed drawn from fallback CSPRNG");
        }
        Ok((seed, used_primary))
    }

    /// Generate a chaotic sequence with the configured parameters.
    pub fn generate_sequence(&self, seed: &Seed, length: usize) -> Result<ChaoticSequence> {
        Ok(cosmic_cipher_core::generate_sequence(
            seed,
            length,
            self.config.params,
            self.config.quality_check,
        )?)
    }

    /// Quantize a sequence at the configured width.
    pub fn encode_keystream(&self, sequence: &ChaoticSequence) -> Result<BitString> {
        Ok(cosmic_cipher_core::encode_keystream(
            sequence,
            self.config.bits_per_value,
        )?)
    }

    /// XOR `bits` with the leading bits of `keystream`.
    pub fn xor_combine(&self, bits: &BitString, keystream: &BitString) -> Result<BitString> {
        Ok(cosmic_cipher_core::xor_combine(bits, keystream)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmic_cipher_auth::AuthError;

    fn fast() -> CosmicCipher {
        CosmicCipher::new(CipherConfig {
            stretch_iterations: 10,
            ..CipherConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = CipherConfig::default();
        assert_eq!(config.params, ChaoticParameters { a: 1.4, b: 0.3 });
        assert_eq!(config.bits_per_value, 8);
        assert!(!config.quality_check);
        assert_eq!(config.stretch_iterations, 100_000);
    }

    #[test]
    fn test_invalid_configs_rejected() {
        let bad_params = CipherConfig {
            params: ChaoticParameters { a: 1.05, b: 0.3 },
            ..CipherConfig::default()
        };
        assert!(matches!(
            CosmicCipher::new(bad_params),
            Err(CosmicError::Cipher(CipherError::InvalidParameters { .. }))
        ));

        for bits in [0, 33] {
            let config = CipherConfig {
                bits_per_value: bits,
                ..CipherConfig::default()
            };
            assert!(matches!(
                CosmicCipher::new(config),
                Err(CosmicError::Cipher(CipherError::InvalidBitWidth(b))) if b == bits
            ));
        }

        let no_rounds = CipherConfig {
            stretch_iterations: 0,
            ..CipherConfig::default()
        };
        assert!(matches!(
            CosmicCipher::new(no_rounds),
            Err(CosmicError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_round_trip_with_generated_key() {
        let cipher = fast();
        let key = cipher.generate_key().unwrap();
        let envelope = cipher.encrypt("across the void", &key).unwrap();
        assert_eq!(cipher.decrypt(&envelope, &key).unwrap(), "across the void");
    }

    #[test]
    fn test_tamper_is_authentication_failure() {
        let cipher = fast();
        let key = cipher.generate_key().unwrap();
        let mut envelope = cipher.encrypt("signal", &key).unwrap();
        envelope.ciphertext.flip(0);

        let err = cipher.decrypt(&envelope, &key).unwrap_err();
        assert!(err.is_authentication_failure());
        assert!(matches!(err, CosmicError::Auth(AuthError::AuthenticationFailed)));
    }

    #[test]
    fn test_stretch_uses_config() {
        let cipher = fast();
        let mut calls = 0;
        let mut count = |_: f64| calls += 1;
        let out = cipher.stretch_key(b"pass", Some(&mut count)).unwrap();
        assert_eq!(out.as_bytes().len(), 64);
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_seed_generation() {
        let cipher = fast();
        let (seed, _) = cipher.generate_seed(16, true).unwrap();
        assert!(seed.bit_len() <= 128);
        assert!(matches!(
            cipher.generate_seed(15, true),
            Err(CosmicError::Cipher(CipherError::InvalidLength(_)))
        ));
    }

    #[test]
    fn test_pipeline_matches_core() {
        let cipher = CosmicCipher::new(CipherConfig {
            bits_per_value: 3,
            stretch_iterations: 1,
            ..CipherConfig::default()
        })
        .unwrap();
        let seed = Seed::from_u128(2);
        let sequence = cipher.generate_sequence(&seed, 4).unwrap();
        let keystream = cipher.encode_keystream(&sequence).unwrap();
        assert_eq!(keystream.to_string(), "011111011000");

        let bits: BitString = "101".parse().unwrap();
        let out = cipher.xor_combine(&bits, &keystream).unwrap();
        assert_eq!(out.to_string(), "110");
    }

    #[test]
    fn test_analyze_passthrough() {
        let report = fast().analyze(b"aaaaaaaa");
        assert_eq!(report.entropy, 0.0);
    }

    #[test]
    fn test_config_serde() {
        let config = CipherConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let recovered: CipherConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, recovered);
    }
}
