//! Iterated HMAC key stretching.
//!
//! `state_0 = key`, `state_{i+1} = HMAC-SHA3-512(state_i, salt)`. The salt is
//! drawn per call and discarded, so stretching the same key twice gives
//! different results.

use hmac::{Hmac, Mac};
use rand::{CryptoRng, RngCore};
use sha3::Sha3_512;
use std::fmt;
use std::thread;

use crate::error::{AuthError, Result};

type HmacSha3_512 = Hmac<Sha3_512>;

/// Salt width in bytes.
pub const SALT_BYTES: usize = 32;
/// Rounds between progress reports.
pub const PROGRESS_INTERVAL: usize = 1000;
/// Default round count.
pub const DEFAULT_ITERATIONS: usize = 100_000;

/// Output of [`KeyStretcher::stretch`].
#[derive(Clone, PartialEq, Eq)]
pub struct StretchedKey(Vec<u8>);

impl StretchedKey {
    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl fmt::Debug for StretchedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StretchedKey({} bytes)", self.0.len())
    }
}

impl AsRef<[u8]> for StretchedKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Applies a fixed number of HMAC rounds to key material.
#[derive(Debug, Clone, Copy)]
pub struct KeyStretcher {
    iterations: usize,
}

impl Default for KeyStretcher {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
        }
    }
}

impl KeyStretcher {
    /// Create a stretcher running `iterations` rounds.
    pub fn new(iterations: usize) -> Result<Self> {
        if iterations == 0 {
            return Err(AuthError::InvalidIterations);
        }
        Ok(Self { iterations })
    }

    /// Configured round count.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Stretch `key` under a fresh salt from `rng`.
    ///
    /// `on_progress` receives the completed percentage every
    /// [`PROGRESS_INTERVAL`] rounds; it cannot influence the result.
    pub fn stretch<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
        key: &[u8],
        on_progress: Option<&mut dyn FnMut(f64)>,
    ) -> Result<StretchedKey> {
        let mut salt = [0u8; SALT_BYTES];
        rng.fill_bytes(&mut salt);
        self.stretch_with_salt(key, &salt, on_progress)
    }

    /// Stretch several independent keys concurrently, one thread per key.
    ///
    /// Each worker draws its salt from an RNG built by `make_rng`. Results are
    /// in input order.
    pub fn stretch_batch<R, F>(&self, keys: &[&[u8]], make_rng: F) -> Vec<Result<StretchedKey>>
    where
        R: RngCore + CryptoRng,
        F: Fn() -> R + Sync,
    {
        let make_rng = &make_rng;
        thread::scope(|scope| {
            let handles: Vec<_> = keys
                .iter()
                .map(|key| scope.spawn(move || self.stretch(&mut make_rng(), key, None)))
                .collect();
            handles
                .into_iter()
                .map(|handle| {
                    handle.join().unwrap_or_else(|_| {
                        Err(AuthError::KeyDerivation("stretch worker panicked".into()))
                    })
                })
                .collect()
        })
    }

    pub(crate) fn stretch_with_salt(
        &self,
        key: &[u8],
        salt: &[u8],
        mut on_progress: Option<&mut dyn FnMut(f64)>,
    ) -> Result<StretchedKey> {
        let mut state = key.to_vec();
        for i in 0..self.iterations {
            let mut mac = HmacSha3_512::new_from_slice(&state)
                .map_err(|e| AuthError::KeyDerivation(e.to_string()))?;
            mac.update(salt);
            state = mac.finalize().into_bytes().to_vec();

            if i % PROGRESS_INTERVAL == 0 {
                if let Some(report) = on_progress.as_mut() {
                    report(i as f64 / self.iterations as f64 * 100.0);
                }
            }
        }
        Ok(StretchedKey(state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn test_known_answer_three_rounds() {
        let stretcher = KeyStretcher::new(3).unwrap();
        let out = stretcher.stretch_with_salt(b"key", &[7u8; 32], None).unwrap();
        assert_eq!(
            out.to_hex(),
            "359b0ba2b664493a38f21112c2074f8b7e80e23d50e40546bdcaf732d69d808c\
             9044b894dc94febfcebb93bc12051053f56d8861c35ba7f91aa2135d981c0552"
        );
    }

    #[test]
    fn test_zero_iterations_rejected() {
        assert!(matches!(
            KeyStretcher::new(0),
            Err(AuthError::InvalidIterations)
        ));
    }

    #[test]
    fn test_output_is_512_bits() {
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let out = KeyStretcher::new(1).unwrap().stretch(&mut rng, b"", None).unwrap();
        assert_eq!(out.as_bytes().len(), 64);
    }

    #[test]
    fn test_salt_is_ephemeral() {
        let stretcher = KeyStretcher::new(10).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let a = stretcher.stretch(&mut rng, b"same key", None).unwrap();
        let b = stretcher.stretch(&mut rng, b"same key", None).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_progress_is_advisory() {
        let stretcher = KeyStretcher::new(2500).unwrap();
        let mut reports = Vec::new();
        let mut record = |p: f64| reports.push(p);
        let with = stretcher
            .stretch_with_salt(b"k", &[1u8; 32], Some(&mut record))
            .unwrap();
        let without = stretcher.stretch_with_salt(b"k", &[1u8; 32], None).unwrap();

        assert_eq!(with, without);
        assert_eq!(reports, vec![0.0, 40.0, 80.0]);
    }

    #[test]
    fn test_batch_matches_input_order() {
        let stretcher = KeyStretcher::new(5).unwrap();
        let keys: [&[u8]; 3] = [b"alpha", b"beta", b"gamma"];
        let results = stretcher.stretch_batch(&keys, rand::thread_rng);
        assert_eq!(results.len(), 3);
        for result in results {
            assert_eq!(result.unwrap().as_bytes().len(), 64);
        }
    }

    #[test]
    fn test_batch_salts_come_from_factory() {
        let stretcher = KeyStretcher::new(4).unwrap();
        let keys: [&[u8]; 2] = [b"alpha", b"beta"];
        let results = stretcher.stretch_batch(&keys, || ChaCha20Rng::seed_from_u64(11));

        let mut salt = [0u8; SALT_BYTES];
        ChaCha20Rng::seed_from_u64(11).fill_bytes(&mut salt);
        for (key, result) in keys.iter().zip(results) {
            let expected = stretcher.stretch_with_salt(key, &salt, None).unwrap();
            assert_eq!(result.unwrap(), expected);
        }
    }

    #[test]
    fn test_debug_hides_material() {
        let out = KeyStretcher::new(1)
            .unwrap()
            .stretch_with_salt(b"k", &[0u8; 32], None)
            .unwrap();
        assert_eq!(format!("{out:?}"), "StretchedKey(64 bytes)");
    }
}
