//! # Cosmic Cipher
//!
//! A seed-driven stream cipher built on the Hénon map, with authenticated
//! envelopes and key stretching.
//!
//! ## Overview
//!
//! - **Seed**: a big integer of at least 128 bits from the OS random source
//! - **Sequence**: Hénon map iterates started from `SHA-256(seed)`
//! - **Keystream**: fractional parts of the iterates, quantized to bits
//! - **Envelope**: XORed ciphertext, HMAC-SHA256 tag and the IV
//!
//! This is not a vetted cryptographic primitive. It reproduces a documented
//! algorithm bit for bit; use it where that is the requirement.
//!
//! ## Usage
//!
//! ```rust
//! use cosmic_cipher::{CipherConfig, CosmicCipher};
//!
//! let cipher = CosmicCipher::new(CipherConfig::default()).unwrap();
//! let key = cipher.generate_key().unwrap();
//!
//! let envelope = cipher.encrypt("Secret message", &key).unwrap();
//! assert_eq!(cipher.decrypt(&envelope, &key).unwrap(), "Secret message");
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `cosmic_cipher::core` - Pipeline primitives (Seed, sequence, keystream, codec)
//! - `cosmic_cipher::auth` - Authenticated sessions, envelopes, key stretching

pub mod cipher;
pub mod error;

// Re-export component crates
pub use cosmic_cipher_auth as auth;
pub use cosmic_cipher_core as core;

// Re-export main types for convenience
pub use cipher::{CipherConfig, CosmicCipher};
pub use error::{CosmicError, Result};

// Re-export commonly used component types
pub use cosmic_cipher_auth::{
    AuthError, AuthenticatedSession, Envelope, Iv, KeyStretcher, SessionConfig, SessionKey,
    StretchedKey,
};
pub use cosmic_cipher_core::{
    BitString, ChaoticParameters, ChaoticSequence, CipherError, DecodePolicy, Seed,
    StrengthReport,
};
