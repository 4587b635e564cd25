//! Seed generation from injected random sources.
//!
//! A [`SeedSource`] owns two generators: a primary source tried first and a
//! CSPRNG used only when the primary fails and the caller allows it. Callers
//! pick the generators, so tests can substitute deterministic or failing
//! stubs and threaded code can hold one source per thread.

use rand::rngs::{OsRng, ThreadRng};
use rand::{CryptoRng, RngCore};

use crate::crypto::Digest32;
use crate::error::{CipherError, Result};
use crate::types::Seed;

/// Minimum seed width in bytes (128 bits).
pub const MIN_SEED_BYTES: usize = 16;

/// An out-of-tree source of supplementary entropy.
///
/// Values may lie in any bounded range; they are hashed, never used raw.
pub trait EntropyCollector {
    /// Collect roughly `n_bits` worth of samples.
    fn collect(&mut self, n_bits: usize) -> Vec<f64>;
}

/// Draws seeds from a primary generator with an optional CSPRNG fallback.
pub struct SeedSource<P, F> {
    primary: P,
    fallback: F,
}

impl SeedSource<OsRng, ThreadRng> {
    /// OS randomness first, the thread-local CSPRNG as fallback.
    pub fn system() -> Self {
        Self::new(OsRng, rand::thread_rng())
    }
}

impl<P, F> SeedSource<P, F>
where
    P: RngCore + CryptoRng,
    F: RngCore + CryptoRng,
{
    /// Create a source from explicit generators.
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }

    /// Draw a seed of `byte_length` bytes.
    ///
    /// Returns the seed and whether the primary generator produced it.
    pub fn generate_seed(
        &mut self,
        byte_length: usize,
        allow_fallback: bool,
    ) -> Result<(Seed, bool)> {
        self.generate_seed_with_entropy(byte_length, allow_fallback, None)
    }

    /// Draw a seed, mixing in samples from `collector` when one is given.
    ///
    /// With a collector the seed is `SHA3-256(random_bytes ‖ samples)` reduced
    /// modulo `2^(8·byte_length)`; samples are serialised as little-endian
    /// IEEE-754 doubles.
    pub fn generate_seed_with_entropy(
        &mut self,
        byte_length: usize,
        allow_fallback: bool,
        collector: Option<&mut dyn EntropyCollector>,
    ) -> Result<(Seed, bool)> {
        if byte_length < MIN_SEED_BYTES {
            return Err(CipherError::InvalidLength(format!(
                "seed needs at least {MIN_SEED_BYTES} bytes, got {byte_length}"
            )));
        }

        let mut random_bytes = vec![0u8; byte_length];
        let used_primary = match self.primary.try_fill_bytes(&mut random_bytes) {
            Ok(()) => true,
            Err(e) if allow_fallback => {
                tracing::warn!("primary random source failed, using fallback CSPRNG: {}", e);
                self.fallback
                    .try_fill_bytes(&mut random_bytes)
                    .map_err(|e| CipherError::SourceUnavailable(e.to_string()))?;
                false
            }
            Err(e) => return Err(CipherError::SourceUnavailable(e.to_string())),
        };

        let seed = match collector {
            Some(collector) => {
                let samples = collector.collect(byte_length * 8);
                let sample_bytes: Vec<u8> = samples.iter().flat_map(|v| v.to_le_bytes()).collect();
                let digest = Digest32::sha3_256(&[&random_bytes, &sample_bytes]);
                let bytes = digest.as_bytes();
                Seed::from_be_bytes(&bytes[bytes.len().saturating_sub(byte_length)..])
            }
            None => Seed::from_be_bytes(&random_bytes),
        };

        Ok((seed, used_primary))
    }
}
