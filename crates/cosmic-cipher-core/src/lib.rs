//! # Cosmic Cipher Core
//!
//! Pure primitives for the Cosmic Cipher keystream pipeline.
//!
//! This crate contains no I/O. Randomness enters only through the generators
//! handed to [`SeedSource`]; every other stage is a pure function of its
//! inputs.
//!
//! ## Pipeline
//!
//! ```text
//! SeedSource ─▶ generate_sequence ─▶ encode_keystream ─▶ xor_combine
//!   (Seed)       (ChaoticSequence)      (BitString)       (BitString)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use cosmic_cipher_core::{
//!     decrypt_text, encode_keystream, encrypt_text, generate_sequence, ChaoticParameters, Seed,
//! };
//!
//! let seed = Seed::from_u128(2);
//! let sequence = generate_sequence(&seed, 64, ChaoticParameters::default(), false).unwrap();
//! let keystream = encode_keystream(&sequence, 8).unwrap();
//!
//! let ciphertext = encrypt_text("hello", &keystream).unwrap();
//! assert_eq!(decrypt_text(&ciphertext, &keystream).unwrap(), "hello");
//! ```

pub mod analysis;
pub mod codec;
pub mod crypto;
pub mod error;
pub mod keystream;
pub mod seed;
pub mod sequence;
pub mod types;

pub use analysis::{analyze, Recommendation, StrengthReport};
pub use codec::{
    bits_to_text, decrypt_text, encrypt_text, text_to_bits, xor_combine, DecodePolicy,
};
pub use crypto::Digest32;
pub use error::{CipherError, QualityFailure, Result};
pub use keystream::{
    encode_enhanced, encode_keystream, PeakNormalizer, SequenceEnhancer, DEFAULT_BITS_PER_VALUE,
};
pub use seed::{EntropyCollector, SeedSource, MIN_SEED_BYTES};
pub use sequence::{
    check_sequence_quality, generate_sequence, ChaoticParameters, ChaoticSequence, QualityReport,
};
pub use types::{BitString, Seed};
