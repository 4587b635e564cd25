//! Error types for authenticated sessions.

use thiserror::Error;

/// Errors that can occur during envelope and key operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The MAC did not match; the envelope was altered or the key is wrong.
    #[error("message authentication failed")]
    AuthenticationFailed,

    /// An envelope field is structurally invalid.
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// Authenticated plaintext was not valid UTF-8.
    #[error("decoding error after authentication: {0}")]
    DecodeError(String),

    /// Key stretching needs at least one round.
    #[error("iteration count must be at least 1")]
    InvalidIterations,

    /// Key material was rejected.
    #[error("key derivation error: {0}")]
    KeyDerivation(String),

    /// Pipeline error.
    #[error("cipher error: {0}")]
    Cipher(#[from] cosmic_cipher_core::CipherError),
}

/// Result type for authenticated operations.
pub type Result<T> = std::result::Result<T, AuthError>;
