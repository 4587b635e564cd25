//! Error types for the Cosmic Cipher core.

use thiserror::Error;

/// The quality criterion a sequence failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityFailure {
    /// Fewer samples than the gate requires.
    TooShort { length: usize, minimum: usize },
    /// Bin occupancy is too uneven.
    SkewedDistribution,
    /// Some non-zero lag correlates too strongly with the sequence itself.
    Periodic { lag: usize },
}

impl std::fmt::Display for QualityFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QualityFailure::TooShort { length, minimum } => {
                write!(f, "length {length} is below the minimum of {minimum}")
            }
            QualityFailure::SkewedDistribution => write!(f, "value distribution is skewed"),
            QualityFailure::Periodic { lag } => write!(f, "near-periodic at lag {lag}"),
        }
    }
}

/// Errors raised by the keystream pipeline.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CipherError {
    #[error("invalid length: {0}")]
    InvalidLength(String),

    #[error("random source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("parameters outside chaotic range: a={a}, b={b}")]
    InvalidParameters { a: f64, b: f64 },

    #[error("sequence failed quality check: {0}")]
    QualityCheckFailed(QualityFailure),

    #[error("bits_per_value must be between 1 and 32, got {0}")]
    InvalidBitWidth(u32),

    #[error("keystream too short: need {needed} bits, have {available}")]
    KeystreamTooShort { needed: usize, available: usize },

    #[error("input cannot be empty")]
    EmptyInput,

    #[error("invalid binary input: {0}")]
    InvalidBinaryInput(String),

    #[error("decoding error: {0}")]
    DecodeError(String),

    #[error("orbit escaped to infinity at step {step}")]
    SequenceDiverged { step: usize },

    #[error("enhancer changed sequence length from {expected} to {actual}")]
    EnhancerContract { expected: usize, actual: usize },
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CipherError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_bit_width() {
        let err = CipherError::InvalidBitWidth(33);
        assert_eq!(
            err.to_string(),
            "bits_per_value must be between 1 and 32, got 33"
        );
    }

    #[test]
    fn test_display_quality_failure() {
        let err = CipherError::QualityCheckFailed(QualityFailure::TooShort {
            length: 10,
            minimum: 1000,
        });
        assert_eq!(
            err.to_string(),
            "sequence failed quality check: length 10 is below the minimum of 1000"
        );
    }

    #[test]
    fn test_error_equality() {
        assert_eq!(CipherError::EmptyInput, CipherError::EmptyInput);
        assert_ne!(
            CipherError::EmptyInput,
            CipherError::SequenceDiverged { step: 3 }
        );
    }
}
