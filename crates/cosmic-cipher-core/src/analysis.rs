//! Statistical strength report for ciphertexts and keystreams.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Window width used for repeated-pattern counting.
pub const PATTERN_WINDOW: usize = 4;
const MAX_SYMBOL_ENTROPY: f64 = 8.0;

/// Advice derived from a strength score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Weak,
    Acceptable,
    Strong,
}

impl Recommendation {
    /// Classify a score in `[0, 100]`.
    pub fn from_score(score: f64) -> Self {
        if score < 60.0 {
            Recommendation::Weak
        } else if score < 80.0 {
            Recommendation::Acceptable
        } else {
            Recommendation::Strong
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Recommendation::Weak => "Warning: Cryptographic strength below recommended levels",
            Recommendation::Acceptable => "Acceptable strength, consider increasing key length",
            Recommendation::Strong => "Strong cryptographic properties detected",
        };
        f.write_str(text)
    }
}

/// Result of [`analyze`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrengthReport {
    /// Shannon entropy in bits per symbol.
    pub entropy: f64,
    /// Number of distinct windows of [`PATTERN_WINDOW`] symbols.
    pub pattern_count: usize,
    /// Windows that occur more than once.
    pub repeated_patterns: usize,
    /// Overall score in `[0, 100]`.
    pub strength_score: f64,
    pub recommendation: Recommendation,
}

/// Shannon entropy of the symbol histogram, in bits.
pub fn shannon_entropy(data: &[u8]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let mut counts = [0usize; 256];
    for &b in data {
        counts[b as usize] += 1;
    }
    let total = data.len() as f64;
    counts
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / total;
            -p * p.log2()
        })
        .sum()
}

/// Count occurrences of each window of `window` symbols.
///
/// The final window is not counted, so `len - window` windows are examined.
pub fn pattern_counts(data: &[u8], window: usize) -> HashMap<&[u8], usize> {
    let mut patterns = HashMap::new();
    for i in 0..data.len().saturating_sub(window) {
        *patterns.entry(&data[i..i + window]).or_insert(0) += 1;
    }
    patterns
}

/// Score `data` by entropy, penalised for repeated windows.
pub fn analyze(data: &[u8]) -> StrengthReport {
    let entropy = shannon_entropy(data);
    let patterns = pattern_counts(data, PATTERN_WINDOW);
    let repeated_patterns = patterns.values().filter(|&&c| c > 1).count();

    let score = entropy / MAX_SYMBOL_ENTROPY * 100.0 - repeated_patterns as f64 / 100.0;
    let strength_score = score.clamp(0.0, 100.0);

    StrengthReport {
        entropy,
        pattern_count: patterns.len(),
        repeated_patterns,
        strength_score,
        recommendation: Recommendation::from_score(strength_score),
    }
}
