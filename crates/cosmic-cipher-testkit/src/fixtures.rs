//! Test fixtures and helpers.
//!
//! Random sources with known output and a session fixture keyed with the
//! golden key.

use rand::{CryptoRng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

use cosmic_cipher_auth::{AuthenticatedSession, Envelope, Iv, Result, SessionConfig, SessionKey};
use cosmic_cipher_core::EntropyCollector;

use crate::vectors::{counting_key, GOLDEN_IV};

/// A seeded CSPRNG for reproducible tests.
pub fn deterministic_rng(seed: u64) -> ChaCha20Rng {
    ChaCha20Rng::seed_from_u64(seed)
}

/// Fills every byte with the same value.
#[derive(Debug, Clone, Copy)]
pub struct ConstantRng(pub u8);

impl RngCore for ConstantRng {
    fn next_u32(&mut self) -> u32 {
        u32::from_ne_bytes([self.0; 4])
    }

    fn next_u64(&mut self) -> u64 {
        u64::from_ne_bytes([self.0; 8])
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        dest.fill(self.0);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl CryptoRng for ConstantRng {}

/// Yields bytes `0, 1, 2, …` from the start of every fill.
#[derive(Debug, Clone, Copy, Default)]
pub struct CountingRng;

impl RngCore for CountingRng {
    fn next_u32(&mut self) -> u32 {
        0
    }

    fn next_u64(&mut self) -> u64 {
        0
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for (i, b) in dest.iter_mut().enumerate() {
            *b = i as u8;
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl CryptoRng for CountingRng {}

/// A source that always reports failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingRng;

impl RngCore for FailingRng {
    fn next_u32(&mut self) -> u32 {
        0
    }

    fn next_u64(&mut self) -> u64 {
        0
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        dest.fill(0);
    }

    fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
        Err(rand::Error::new("entropy source offline"))
    }
}

impl CryptoRng for FailingRng {}

/// Returns the same samples on every call.
#[derive(Debug, Clone, Default)]
pub struct FixedCollector {
    pub samples: Vec<f64>,
    /// Bit counts requested so far.
    pub requests: Vec<usize>,
}

impl FixedCollector {
    pub fn new(samples: Vec<f64>) -> Self {
        Self {
            samples,
            requests: Vec::new(),
        }
    }
}

impl EntropyCollector for FixedCollector {
    fn collect(&mut self, n_bits: usize) -> Vec<f64> {
        self.requests.push(n_bits);
        self.samples.clone()
    }
}

/// A session with a fixed key and IV.
pub struct TestFixture {
    pub key: SessionKey,
    pub iv: Iv,
    pub session: AuthenticatedSession,
}

impl TestFixture {
    /// Fixture with the golden key and IV and the default configuration.
    pub fn new() -> Self {
        Self::with_config(SessionConfig::default())
    }

    /// Fixture with the golden key and IV and a custom configuration.
    pub fn with_config(config: SessionConfig) -> Self {
        Self {
            key: SessionKey::from_bytes(counting_key()),
            iv: Iv(GOLDEN_IV),
            session: AuthenticatedSession::new(config),
        }
    }

    /// Encrypt under the fixture key and IV.
    pub fn encrypt(&self, message: &str) -> Result<Envelope> {
        self.session.encrypt_with_iv(message, &self.key, self.iv)
    }

    /// Encrypt under the fixture key with an IV drawn from `seed`.
    pub fn encrypt_seeded(&self, message: &str, seed: u64) -> Result<Envelope> {
        self.session
            .encrypt(&mut deterministic_rng(seed), message, &self.key, None)
    }

    /// Decrypt under the fixture key.
    pub fn decrypt(&self, envelope: &Envelope) -> Result<String> {
        self.session.decrypt(envelope, &self.key)
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
