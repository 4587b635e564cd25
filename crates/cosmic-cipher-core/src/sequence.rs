//! Chaotic sequence generation with the two-dimensional Hénon map.
//!
//! ```text
//! x_{n+1} = 1 - a·x_n² + y_n
//! y_{n+1} = b·x_n
//! ```
//!
//! The initial point is derived from SHA-256 of the seed, so a given
//! (seed, parameters, length) always yields the same sequence.

use serde::{Deserialize, Serialize};

use crate::crypto::Digest32;
use crate::error::{CipherError, QualityFailure, Result};
use crate::types::Seed;

/// Lower and upper bounds for `a`.
pub const A_RANGE: (f64, f64) = (1.07, 1.4);
/// Lower and upper bounds for `b`.
pub const B_RANGE: (f64, f64) = (0.2, 0.3);

/// Once `|x|` passes this bound the orbit grows without limit.
///
/// At `|x_n| > 1000` with `|y_n| ≤ 300` the next iterate is below
/// `1 - 1.07e6 + 300`, and each later step squares the magnitude again.
pub const ESCAPE_RADIUS: f64 = 1.0e3;

/// Minimum length accepted by the quality gate.
pub const QUALITY_MIN_LENGTH: usize = 1000;
const QUALITY_BINS: usize = 10;
const MAX_BIN_DEVIATION: f64 = 0.5;
const MAX_AUTOCORRELATION: f64 = 0.7;

/// Parameters of the Hénon map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChaoticParameters {
    pub a: f64,
    pub b: f64,
}

impl ChaoticParameters {
    /// Create parameters, rejecting values outside the chaotic range.
    pub fn new(a: f64, b: f64) -> Result<Self> {
        let params = Self { a, b };
        params.validate()?;
        Ok(params)
    }

    /// Check `1.07 ≤ a ≤ 1.4` and `0.2 ≤ b ≤ 0.3`.
    pub fn validate(&self) -> Result<()> {
        let a_ok = (A_RANGE.0..=A_RANGE.1).contains(&self.a);
        let b_ok = (B_RANGE.0..=B_RANGE.1).contains(&self.b);
        if a_ok && b_ok {
            Ok(())
        } else {
            Err(CipherError::InvalidParameters {
                a: self.a,
                b: self.b,
            })
        }
    }
}

impl Default for ChaoticParameters {
    fn default() -> Self {
        Self { a: 1.4, b: 0.3 }
    }
}

/// A generated sequence of map iterates.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChaoticSequence(Vec<f64>);

impl ChaoticSequence {
    /// Wrap raw values (for externally produced or enhanced sequences).
    pub fn from_values(values: Vec<f64>) -> Self {
        Self(values)
    }

    /// The values in order.
    pub fn values(&self) -> &[f64] {
        &self.0
    }

    /// Consume into the raw values.
    pub fn into_values(self) -> Vec<f64> {
        self.0
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Initial point `(x0, y0)` in `[-1, 1)²` derived from the seed.
pub fn initial_state(seed: &Seed) -> (f64, f64) {
    let (hi, lo) = Digest32::sha256(seed.as_be_bytes()).halves();
    (unit_interval(hi), unit_interval(lo))
}

fn unit_interval(raw: u128) -> f64 {
    // 2^128 is a power of two, so dividing after the u128 -> f64 rounding is exact.
    raw as f64 / 2f64.powi(128) * 2.0 - 1.0
}

/// Generate `length` iterates of the map from `seed`.
///
/// Fails with `SequenceDiverged` if the orbit leaves the escape radius, and
/// with `QualityCheckFailed` when `quality_check` is set and the sequence
/// does not pass [`check_sequence_quality`].
pub fn generate_sequence(
    seed: &Seed,
    length: usize,
    params: ChaoticParameters,
    quality_check: bool,
) -> Result<ChaoticSequence> {
    params.validate()?;
    if length == 0 {
        return Err(CipherError::InvalidLength(
            "sequence length must be at least 1".into(),
        ));
    }

    let ChaoticParameters { a, b } = params;
    let (mut x, mut y) = initial_state(seed);
    let mut values = Vec::with_capacity(length);

    for step in 0..length {
        let x_next = 1.0 - a * (x * x) + y;
        let y_next = b * x;
        // Written negated so NaN is caught too.
        if !(x_next.abs() <= ESCAPE_RADIUS) {
            return Err(CipherError::SequenceDiverged { step });
        }
        x = x_next;
        y = y_next;
        values.push(x);
    }

    let sequence = ChaoticSequence(values);
    if quality_check {
        check_sequence_quality(sequence.values())?;
        tracing::debug!(length, "sequence passed quality check");
    }
    Ok(sequence)
}

/// Statistics computed by the quality gate.
#[derive(Debug, Clone, PartialEq)]
pub struct QualityReport {
    /// Occupancy of each equal-width bin over `[min, max]`.
    pub bin_counts: [usize; QUALITY_BINS],
    /// Standard deviation of the bin counts divided by their mean.
    pub bin_deviation: f64,
    /// Largest non-zero-lag autocorrelation divided by the zero-lag peak.
    pub max_autocorrelation: f64,
    /// Lag at which `max_autocorrelation` occurs.
    pub worst_lag: usize,
}

/// Run the statistical acceptance test.
pub fn check_sequence_quality(values: &[f64]) -> Result<QualityReport> {
    if values.len() < QUALITY_MIN_LENGTH {
        return Err(CipherError::QualityCheckFailed(QualityFailure::TooShort {
            length: values.len(),
            minimum: QUALITY_MIN_LENGTH,
        }));
    }

    let bin_counts = histogram(values);
    let mean = values.len() as f64 / QUALITY_BINS as f64;
    let variance = bin_counts
        .iter()
        .map(|&c| (c as f64 - mean).powi(2))
        .sum::<f64>()
        / QUALITY_BINS as f64;
    let bin_deviation = variance.sqrt() / mean;
    if bin_deviation > MAX_BIN_DEVIATION {
        tracing::debug!(bin_deviation, "sequence distribution too skewed");
        return Err(CipherError::QualityCheckFailed(
            QualityFailure::SkewedDistribution,
        ));
    }

    let peak: f64 = values.iter().map(|v| v * v).sum();
    let mut worst_lag = 0;
    let mut worst = f64::NEG_INFINITY;
    for lag in 1..values.len() {
        let c: f64 = values[..values.len() - lag]
            .iter()
            .zip(&values[lag..])
            .map(|(p, q)| p * q)
            .sum();
        if c > worst {
            worst = c;
            worst_lag = lag;
        }
    }
    if worst > peak * MAX_AUTOCORRELATION {
        tracing::debug!(lag = worst_lag, "sequence is near-periodic");
        return Err(CipherError::QualityCheckFailed(QualityFailure::Periodic {
            lag: worst_lag,
        }));
    }

    Ok(QualityReport {
        bin_counts,
        bin_deviation,
        max_autocorrelation: if peak > 0.0 { worst / peak } else { 0.0 },
        worst_lag,
    })
}

fn histogram(values: &[f64]) -> [usize; QUALITY_BINS] {
    let mut counts = [0usize; QUALITY_BINS];
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let width = (max - min) / QUALITY_BINS as f64;

    for &v in values {
        let bin = if width > 0.0 {
            (((v - min) / width) as usize).min(QUALITY_BINS - 1)
        } else {
            0
        };
        counts[bin] += 1;
    }
    counts
}
