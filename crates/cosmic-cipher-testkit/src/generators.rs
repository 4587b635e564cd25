//! Proptest generators for property-based testing.

use proptest::prelude::*;

use cosmic_cipher_auth::{Iv, SessionKey};
use cosmic_cipher_core::sequence::{A_RANGE, B_RANGE};
use cosmic_cipher_core::{generate_sequence, BitString, ChaoticParameters, Seed};

/// Generate an arbitrary 128-bit seed. Roughly one in six escapes.
pub fn seed() -> impl Strategy<Value = Seed> {
    any::<u128>().prop_map(Seed::from_u128)
}

/// Generate a seed whose orbit stays bounded for `length` steps under the
/// default parameters.
pub fn bounded_seed(length: usize) -> impl Strategy<Value = Seed> {
    seed().prop_filter("orbit escapes", move |s| {
        generate_sequence(s, length, ChaoticParameters::default(), false).is_ok()
    })
}

/// Generate parameters inside the accepted range.
pub fn params() -> impl Strategy<Value = ChaoticParameters> {
    (A_RANGE.0..=A_RANGE.1, B_RANGE.0..=B_RANGE.1).prop_map(|(a, b)| ChaoticParameters { a, b })
}

/// Generate parameters outside the accepted range.
pub fn invalid_params() -> impl Strategy<Value = ChaoticParameters> {
    prop_oneof![
        (0.0..A_RANGE.0, B_RANGE.0..=B_RANGE.1),
        (A_RANGE.1 + 1e-9..3.0, B_RANGE.0..=B_RANGE.1),
        (A_RANGE.0..=A_RANGE.1, 0.0..B_RANGE.0),
        (A_RANGE.0..=A_RANGE.1, B_RANGE.1 + 1e-9..1.0),
    ]
    .prop_map(|(a, b)| ChaoticParameters { a, b })
}

/// Generate a valid keystream width.
pub fn bit_width() -> impl Strategy<Value = u32> {
    1u32..=32
}

/// Generate a non-empty message of printable characters.
pub fn message(max_chars: usize) -> impl Strategy<Value = String> {
    prop::collection::vec(any::<char>().prop_filter("control", |c| !c.is_control()), 1..=max_chars)
        .prop_map(|chars| chars.into_iter().collect())
}

/// Generate a non-empty bit string of up to `max_len` bits.
pub fn bits(max_len: usize) -> impl Strategy<Value = BitString> {
    prop::collection::vec(any::<bool>(), 1..=max_len).prop_map(BitString::from_iter)
}

/// Generate a session key.
pub fn session_key() -> impl Strategy<Value = SessionKey> {
    any::<[u8; 32]>().prop_map(SessionKey::from_bytes)
}

/// Generate an IV.
pub fn iv() -> impl Strategy<Value = Iv> {
    any::<u128>().prop_map(Iv)
}
