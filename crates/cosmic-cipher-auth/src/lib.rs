//! # Cosmic Cipher Auth
//!
//! Authenticated envelopes and key stretching on top of the chaotic keystream.
//!
//! ## Overview
//!
//! A session encrypts a message under a 256-bit [`SessionKey`] and a fresh
//! 128-bit [`Iv`]. The keystream is seeded with `key ⊕ iv`, the plaintext bits
//! are XORed with it, and the ciphertext's `'0'/'1'` rendering is tagged with
//! HMAC-SHA256 under the key. Decryption verifies the tag in constant time
//! before touching the keystream.
//!
//! [`KeyStretcher`] turns low-entropy key material into 512 bits by iterating
//! HMAC-SHA3-512 over a random salt.
//!
//! ## Usage
//!
//! ```rust
//! use cosmic_cipher_auth::{AuthenticatedSession, Envelope, SessionKey};
//!
//! let session = AuthenticatedSession::default();
//! let key = SessionKey::from_bytes([0x11; 32]);
//! let mut rng = rand::thread_rng();
//!
//! let envelope = session.encrypt(&mut rng, "meet at dawn", &key, None).unwrap();
//! let json = envelope.to_json().unwrap();
//!
//! let received = Envelope::from_json(&json).unwrap();
//! assert_eq!(session.decrypt(&received, &key).unwrap(), "meet at dawn");
//! ```

pub mod crypto;
pub mod envelope;
pub mod error;
pub mod session;
pub mod stretch;

pub use crypto::{Iv, SessionKey, IV_HEX_LEN, KEY_BYTES, MAC_BYTES};
pub use envelope::Envelope;
pub use error::{AuthError, Result};
pub use session::{sequence_length_for, AuthenticatedSession, SessionConfig, MAX_IV_DRAWS};
pub use stretch::{KeyStretcher, StretchedKey, DEFAULT_ITERATIONS, PROGRESS_INTERVAL, SALT_BYTES};
