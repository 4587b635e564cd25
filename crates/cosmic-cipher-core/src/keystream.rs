//! Quantization of chaotic sequences into bit keystreams.

use crate::error::{CipherError, Result};
use crate::sequence::ChaoticSequence;
use crate::types::BitString;

/// Bits emitted per sample unless configured otherwise.
pub const DEFAULT_BITS_PER_VALUE: u32 = 8;
/// Largest supported field width.
pub const MAX_BITS_PER_VALUE: u32 = 32;

/// A post-processing stage applied to a sequence before quantization.
///
/// Implementations must return a sequence of the same length; values may
/// change freely. Stages that inject noise need not be deterministic, but the
/// encoder's output is only reproducible when every stage is.
pub trait SequenceEnhancer {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Transform the sequence.
    fn enhance(&self, values: &[f64]) -> Vec<f64>;
}

/// Scales a sequence so its largest magnitude is 1.
///
/// An all-zero sequence is returned unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct PeakNormalizer;

impl SequenceEnhancer for PeakNormalizer {
    fn name(&self) -> &str {
        "peak-normalizer"
    }

    fn enhance(&self, values: &[f64]) -> Vec<f64> {
        let peak = values.iter().fold(0.0f64, |m, v| m.max(v.abs()));
        if peak > 0.0 {
            values.iter().map(|v| v / peak).collect()
        } else {
            values.to_vec()
        }
    }
}

/// Quantize each sample's fractional part into a `bits_per_value`-bit field.
///
/// The output holds exactly `sequence.len() * bits_per_value` bits.
pub fn encode_keystream(sequence: &ChaoticSequence, bits_per_value: u32) -> Result<BitString> {
    check_bit_width(bits_per_value)?;

    let scale = (1u64 << bits_per_value) as f64;
    let mut keystream = BitString::with_capacity(sequence.len() * bits_per_value as usize);
    for &v in sequence.values() {
        let fractional = (v - v.trunc()).abs();
        // Non-finite samples saturate to 0 here; the generator never emits them.
        let quantized = (fractional * scale) as u64;
        keystream.push_field(quantized, bits_per_value);
    }
    Ok(keystream)
}

/// Run `enhancers` in order, then quantize.
///
/// Fails with `EnhancerContract` if any stage changes the length.
pub fn encode_enhanced(
    sequence: &ChaoticSequence,
    bits_per_value: u32,
    enhancers: &[&dyn SequenceEnhancer],
) -> Result<BitString> {
    check_bit_width(bits_per_value)?;

    let expected = sequence.len();
    let mut values = sequence.values().to_vec();
    for enhancer in enhancers {
        values = enhancer.enhance(&values);
        if values.len() != expected {
            return Err(CipherError::EnhancerContract {
                expected,
                actual: values.len(),
            });
        }
        tracing::debug!(enhancer = enhancer.name(), "applied sequence enhancer");
    }

    encode_keystream(&ChaoticSequence::from_values(values), bits_per_value)
}

fn check_bit_width(bits_per_value: u32) -> Result<()> {
    if (1..=MAX_BITS_PER_VALUE).contains(&bits_per_value) {
        Ok(())
    } else {
        Err(CipherError::InvalidBitWidth(bits_per_value))
    }
}
