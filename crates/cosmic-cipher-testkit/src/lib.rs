//! # Cosmic Cipher Testkit
//!
//! Testing utilities for Cosmic Cipher.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Known inputs with expected outputs, bit-exact
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: Deterministic and failing random sources, a fixed entropy
//!   collector, and a session fixture keyed with the golden key
//!
//! ## Golden Vectors
//!
//! ```rust
//! use cosmic_cipher_core::{generate_sequence, ChaoticParameters, Seed};
//! use cosmic_cipher_testkit::vectors::SEED_TWO_SEQUENCE;
//!
//! let params = ChaoticParameters::default();
//! let seq = generate_sequence(&Seed::from_u128(2), 8, params, false).unwrap();
//! let bits: Vec<u64> = seq.values().iter().map(|v| v.to_bits()).collect();
//! assert_eq!(bits, SEED_TWO_SEQUENCE);
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use cosmic_cipher_testkit::generators::{bit_width, bounded_seed};
//!
//! proptest! {
//!     #[test]
//!     fn keystream_is_sized(seed in bounded_seed(64), bits in bit_width()) {
//!         // ...
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use cosmic_cipher_testkit::fixtures::TestFixture;
//!
//! let fixture = TestFixture::new();
//! let envelope = fixture.encrypt("hello").unwrap();
//! assert_eq!(fixture.decrypt(&envelope).unwrap(), "hello");
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{
    deterministic_rng, ConstantRng, CountingRng, FailingRng, FixedCollector, TestFixture,
};
