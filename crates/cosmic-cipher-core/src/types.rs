//! Strong type definitions for the cipher pipeline.
//!
//! Seeds are integers carried as big-endian bytes; bit strings are the
//! shared currency of keystreams, plaintext bits and ciphertext.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::CipherError;

/// A non-negative integer seed, held as minimal big-endian bytes.
///
/// Leading zero bytes are stripped on construction, so two seeds compare
/// equal exactly when their integer values do. Zero is the empty byte string.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Seed(Vec<u8>);

impl Seed {
    /// Create from big-endian bytes of any width.
    pub fn from_be_bytes(bytes: &[u8]) -> Self {
        let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
        Self(bytes[start..].to_vec())
    }

    /// Create from a native integer.
    pub fn from_u128(value: u128) -> Self {
        Self::from_be_bytes(&value.to_be_bytes())
    }

    /// The minimal big-endian representation.
    pub fn as_be_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Left-pad to exactly `width` bytes, or `None` if the value does not fit.
    pub fn to_be_bytes_padded(&self, width: usize) -> Option<Vec<u8>> {
        if self.0.len() > width {
            return None;
        }
        let mut out = vec![0u8; width - self.0.len()];
        out.extend_from_slice(&self.0);
        Some(out)
    }

    /// Number of significant bits.
    pub fn bit_len(&self) -> usize {
        match self.0.first() {
            Some(&top) => self.0.len() * 8 - top.leading_zeros() as usize,
            None => 0,
        }
    }

    /// Whether the seed is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_empty()
    }

    /// Bitwise XOR of two integers.
    pub fn xor(&self, other: &Seed) -> Seed {
        let width = self.0.len().max(other.0.len());
        let lhs = self.to_be_bytes_padded(width).unwrap_or_default();
        let rhs = other.to_be_bytes_padded(width).unwrap_or_default();
        let mixed: Vec<u8> = lhs.iter().zip(&rhs).map(|(a, b)| a ^ b).collect();
        Seed::from_be_bytes(&mixed)
    }

    /// Convert to lowercase hex (`"00"` for zero).
    pub fn to_hex(&self) -> String {
        if self.0.is_empty() {
            return "00".to_string();
        }
        hex::encode(&self.0)
    }

    /// Parse from hex. Odd-length input is accepted with an implied leading zero.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let bytes = if s.len() % 2 == 1 {
            hex::decode(format!("0{s}"))?
        } else {
            hex::decode(s)?
        };
        Ok(Self::from_be_bytes(&bytes))
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Seed({} bits)", self.bit_len())
    }
}

impl From<u128> for Seed {
    fn from(value: u128) -> Self {
        Self::from_u128(value)
    }
}

/// An ordered sequence of bits.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct BitString(Vec<bool>);

impl BitString {
    /// Create from a bit vector.
    pub fn new(bits: Vec<bool>) -> Self {
        Self(bits)
    }

    /// Create with capacity for `bits` bits.
    pub fn with_capacity(bits: usize) -> Self {
        Self(Vec::with_capacity(bits))
    }

    /// Append the low `width` bits of `value`, most significant first.
    pub fn push_field(&mut self, value: u64, width: u32) {
        for shift in (0..width).rev() {
            self.0.push((value >> shift) & 1 == 1);
        }
    }

    /// Append a single bit.
    pub fn push(&mut self, bit: bool) {
        self.0.push(bit);
    }

    /// Number of bits.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no bits.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the raw bits.
    pub fn as_bits(&self) -> &[bool] {
        &self.0
    }

    /// Iterate over the bits.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.0.iter().copied()
    }

    /// Bit at `index`, if in range.
    pub fn get(&self, index: usize) -> Option<bool> {
        self.0.get(index).copied()
    }

    /// Invert the bit at `index`. Out-of-range indices are ignored.
    pub fn flip(&mut self, index: usize) {
        if let Some(bit) = self.0.get_mut(index) {
            *bit = !*bit;
        }
    }

    /// Pack into bytes, most significant bit first.
    ///
    /// Fails unless the length is a multiple of 8.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CipherError> {
        if self.0.len() % 8 != 0 {
            return Err(CipherError::InvalidBinaryInput(format!(
                "length {} is not a multiple of 8",
                self.0.len()
            )));
        }
        Ok(self
            .0
            .chunks(8)
            .map(|chunk| chunk.iter().fold(0u8, |acc, &bit| (acc << 1) | u8::from(bit)))
            .collect())
    }
}

impl fmt::Display for BitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: String = self.0.iter().map(|&b| if b { '1' } else { '0' }).collect();
        f.write_str(&rendered)
    }
}

impl fmt::Debug for BitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BitString({} bits)", self.0.len())
    }
}

impl FromStr for BitString {
    type Err = CipherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.chars()
            .enumerate()
            .map(|(i, c)| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                other => Err(CipherError::InvalidBinaryInput(format!(
                    "unexpected {other:?} at position {i}"
                ))),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

impl FromIterator<bool> for BitString {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Serialize for BitString {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for BitString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
