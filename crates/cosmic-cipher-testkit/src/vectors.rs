//! Golden test vectors for bit-exact verification.
//!
//! Floating-point values are stored as IEEE-754 bit patterns so comparisons
//! are exact. All vectors use the default map parameters `a = 1.4, b = 0.3`.

use serde::Serialize;

/// First eight iterates for seed 2, as `f64::to_bits`.
pub const SEED_TWO_SEQUENCE: [u64; 8] = [
    0xbfdb0fd1174a1dee,
    0x3feedf2ceda4e17f,
    0xbfdb830a5708f145,
    0x3ff07dcfc7539a15,
    0xbfe3b89f1c4f8a9a,
    0x3fe8e120ec1f5699,
    0xbf9fe6fb16381598,
    0x3ff3b5cdae83c7b4,
];

/// Initial `(x, y)` for seed 2, as `f64::to_bits`.
pub const SEED_TWO_INITIAL_STATE: (u64, u64) = (0x3fe6f06d32403ffa, 0xbfe6826893c07077);

/// Selected iterates for seed 0, whose byte encoding is empty.
pub const SEED_ZERO_VALUES: [(usize, u64); 2] = [(0, 0xbfe1412c05deb2b0), (3, 0x3ff3a767d87b6ef7)];

/// Seeds whose orbits stay bounded for at least 10 000 steps.
pub const BOUNDED_SEEDS: [u128; 2] = [0, 2];

/// Seeds whose orbits escape within 2000 steps.
pub const ESCAPING_SEEDS: [u128; 15] = [1, 3, 6, 7, 19, 22, 24, 26, 27, 30, 35, 38, 42, 48, 55];

/// Keystream bits for a short sequence.
#[derive(Debug, Clone, Serialize)]
pub struct KeystreamVector {
    pub name: &'static str,
    pub seed: u128,
    pub length: usize,
    pub bits_per_value: u32,
    pub expected: &'static str,
}

/// Get the keystream vectors.
pub fn keystream_vectors() -> Vec<KeystreamVector> {
    vec![
        KeystreamVector {
            name: "seed two, byte width",
            seed: 2,
            length: 4,
            bits_per_value: 8,
            expected: "01101100111101100110111000000111",
        },
        KeystreamVector {
            name: "seed two, three-bit width",
            seed: 2,
            length: 4,
            bits_per_value: 3,
            expected: "011111011000",
        },
    ]
}

/// A full authenticated encryption with a fixed key and IV.
#[derive(Debug, Clone, Serialize)]
pub struct EnvelopeVector {
    pub name: &'static str,
    /// Key bytes, big-endian.
    pub key: [u8; 32],
    pub iv: u128,
    pub message: &'static str,
    /// `key ⊕ iv` as minimal big-endian hex.
    pub working_seed: &'static str,
    pub sequence_length: usize,
    pub ciphertext: &'static str,
    pub mac: &'static str,
}

/// Key bytes `0x01, 0x02, …, 0x20`.
pub const fn counting_key() -> [u8; 32] {
    let mut key = [0u8; 32];
    let mut i = 0;
    while i < 32 {
        key[i] = i as u8 + 1;
        i += 1;
    }
    key
}

/// IV used by [`envelope_vector`].
pub const GOLDEN_IV: u128 = 0x0f0e0d0c0b0a09080706050403020100;

/// The reference envelope.
pub fn envelope_vector() -> EnvelopeVector {
    EnvelopeVector {
        name: "counting key, descending iv",
        key: counting_key(),
        iv: GOLDEN_IV,
        message: "test message",
        working_seed: "0102030405060708090a0b0c0d0e0f101e1c1e181e1c1e101e1c1e181e1c1e20",
        sequence_length: 228,
        ciphertext: "011110001001010101001100010001100011001100101001111101100000000010010001011010000010010001011100",
        mac: "9eaf7e9141047ab9e1b387d19609003c13230fc6f32b0d20fbb23c8c2a639fa9",
    }
}

/// A key stretch with a fixed salt.
#[derive(Debug, Clone, Serialize)]
pub struct StretchVector {
    pub key: &'static [u8],
    /// Every salt byte has this value.
    pub salt_byte: u8,
    pub iterations: usize,
    pub expected: &'static str,
}

/// The reference stretch.
pub fn stretch_vector() -> StretchVector {
    StretchVector {
        key: b"key",
        salt_byte: 7,
        iterations: 3,
        expected: "359b0ba2b664493a38f21112c2074f8b7e80e23d50e40546bdcaf732d69d808c\
                   9044b894dc94febfcebb93bc12051053f56d8861c35ba7f91aa2135d981c0552",
    }
}

/// Seed mixing with external entropy.
#[derive(Debug, Clone, Serialize)]
pub struct MixingVector {
    /// Primary source bytes are `0, 1, 2, …`.
    pub byte_length: usize,
    pub samples: [f64; 4],
    pub expected_seed: &'static str,
}

/// The reference mixing vector.
pub fn mixing_vector() -> MixingVector {
    MixingVector {
        byte_length: 16,
        samples: [0.25, 0.5, 0.75, 1.0],
        expected_seed: "de97c4880b22ebb0a7d9a588a5a9ab1d",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmic_cipher_core::{encode_keystream, generate_sequence, ChaoticParameters, Seed};

    #[test]
    fn test_keystream_vectors_hold() {
        for v in keystream_vectors() {
            let seq = generate_sequence(
                &Seed::from_u128(v.seed),
                v.length,
                ChaoticParameters::default(),
                false,
            )
            .unwrap();
            let bits = encode_keystream(&seq, v.bits_per_value).unwrap();
            assert_eq!(bits.to_string(), v.expected, "{}", v.name);
        }
    }

    #[test]
    fn test_counting_key() {
        let key = counting_key();
        assert_eq!(key[0], 1);
        assert_eq!(key[31], 32);
    }

    #[test]
    fn test_seed_lists_are_disjoint() {
        for s in BOUNDED_SEEDS {
            assert!(!ESCAPING_SEEDS.contains(&s));
        }
    }
}
