//! Error types for the Cosmic Cipher API.

use cosmic_cipher_auth::AuthError;
use cosmic_cipher_core::CipherError;
use thiserror::Error;

/// Errors that can occur during Cosmic Cipher operations.
#[derive(Debug, Error)]
pub enum CosmicError {
    /// Keystream pipeline error.
    #[error("cipher error: {0}")]
    Cipher(#[from] CipherError),

    /// Envelope, MAC or key stretching error.
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Configuration rejected at construction.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl CosmicError {
    /// Whether the error means the envelope was altered or the key is wrong.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(self, CosmicError::Auth(AuthError::AuthenticationFailed))
    }
}

/// Result type for Cosmic Cipher operations.
pub type Result<T> = std::result::Result<T, CosmicError>;
