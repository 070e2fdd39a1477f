//! Filter parameter derivation
//!
//! Formulas (BIP37):
//! - m = -n * ln(fpr) / (ln(2)^2)  -- bits, truncated, capped at the protocol maximum
//! - k = (m / n) * ln(2)           -- hash functions, truncated, capped at the protocol maximum
//!
//! Every bound is applied by saturation. Out-of-range inputs are never
//! rejected because the rate may come straight from an untrusted peer or
//! config file.

use std::f64::consts::LN_2;

/// Maximum size of a `filterload` bit field in bytes.
pub const MAX_FILTER_LOAD_FILTER_SIZE: u32 = 36_000;

/// Maximum number of hash functions in a `filterload` message.
pub const MAX_FILTER_LOAD_HASH_FUNCS: u32 = 50;

/// Maximum size of a `filteradd` data element (the script push limit).
pub const MAX_FILTER_ADD_DATA_SIZE: usize = 520;

/// Lower clamp for the false positive rate.
pub const MIN_FALSE_POSITIVE_RATE: f64 = 1e-9;

/// Upper clamp for the false positive rate.
pub const MAX_FALSE_POSITIVE_RATE: f64 = 1.0;

const LN2_SQUARED: f64 = LN_2 * LN_2;

/// Derived filter dimensions
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FilterParams {
    /// Bit field length in bytes
    pub size_bytes: u32,
    /// Number of hash functions
    pub hash_funcs: u32,
}

impl FilterParams {
    /// Bit field length in bits
    pub fn size_bits(&self) -> u64 {
        u64::from(self.size_bytes) * 8
    }
}

/// Clamp a requested false positive rate into `[1e-9, 1.0]`.
///
/// NaN and anything at or below zero map to the minimum.
pub fn clamp_false_positive_rate(rate: f64) -> f64 {
    if rate.is_nan() || rate < MIN_FALSE_POSITIVE_RATE {
        MIN_FALSE_POSITIVE_RATE
    } else if rate > MAX_FALSE_POSITIVE_RATE {
        MAX_FALSE_POSITIVE_RATE
    } else {
        rate
    }
}

/// Calculate the bit field size and hash count for `elements` items at the
/// requested false positive rate.
///
/// The float-to-integer conversions truncate (and saturate), which is what
/// peers running the reference filter do; the results are visible on the
/// wire, so rounding differently would change the serialized payload.
pub fn calculate_filter_params(elements: u32, false_positive_rate: f64) -> FilterParams {
    let n = f64::from(elements.max(1));
    let rate = clamp_false_positive_rate(false_positive_rate);

    let raw_bits = (-1.0 * n * rate.ln() / LN2_SQUARED) as u32;
    let size_bytes = raw_bits.min(MAX_FILTER_LOAD_FILTER_SIZE * 8) / 8;

    let hash_funcs = if size_bytes == 0 {
        // nothing to index into
        0
    } else {
        let k = (f64::from(size_bytes * 8) / n * LN_2) as u32;
        k.clamp(1, MAX_FILTER_LOAD_HASH_FUNCS)
    };

    FilterParams {
        size_bytes,
        hash_funcs,
    }
}

/// Theoretical false positive rate for a filter of `m` bits with `k` hash
/// functions holding `n` elements.
///
/// Formula: FPR = (1 - e^(-kn/m))^k
pub fn calculate_fpr(m: u64, n: u64, k: u32) -> f64 {
    if m == 0 {
        return 1.0;
    }
    let exponent = -(f64::from(k)) * (n as f64) / (m as f64);
    (1.0 - exponent.exp()).powi(k as i32)
}
