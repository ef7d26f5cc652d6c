//! Fast index mapping via linear interpolation of `log2` from IEEE-754 bits

use super::bits::{build_double, get_exponent, get_significand_plus_one};
use super::{floor_to_i32, validate_relative_accuracy, IndexMapping};
use crate::error::Result;

/// Fast mapping: approximates `log2(v) = e + log2(s)` by linearly
/// interpolating `log2(s)` with `s - 1` over `s ∈ [1, 2)`
///
/// Replaces the logarithm in [`super::LogarithmicMapping`] with the IEEE-754
/// exponent/significand extraction in [`super::bits`], trading a small
/// increase in bin count for roughly an order of magnitude faster inserts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearlyInterpolatedMapping {
    relative_accuracy: f64,
    multiplier: f64,
}

impl LinearlyInterpolatedMapping {
    /// Creates a mapping for the given relative accuracy
    ///
    /// # Errors
    /// Returns [`crate::error::SketchError::InvalidArgument`] if
    /// `relative_accuracy` is not in `(0, 1)`.
    pub fn new(relative_accuracy: f64) -> Result<Self> {
        validate_relative_accuracy(relative_accuracy)?;
        let gamma = (1.0 + relative_accuracy) / (1.0 - relative_accuracy);
        Ok(Self {
            relative_accuracy,
            multiplier: 1.0 / gamma.ln(),
        })
    }
}

impl IndexMapping for LinearlyInterpolatedMapping {
    fn index(&self, value: f64) -> i32 {
        let e = get_exponent(value) as f64;
        let s = get_significand_plus_one(value);
        floor_to_i32(self.multiplier * (e + s))
    }

    fn value(&self, index: i32) -> f64 {
        let x = f64::from(index) / self.multiplier;
        let e = (x - 1.0).floor() as i64;
        let s = x - e as f64;
        build_double(e, s) * (1.0 + self.relative_accuracy)
    }

    fn relative_accuracy(&self) -> f64 {
        self.relative_accuracy
    }

    fn min_indexable_value(&self) -> f64 {
        let exact = 2.0_f64.powf(f64::from(i32::MIN + 1) / self.multiplier);
        let underflow_floor = f64::MIN_POSITIVE * 2.0_f64.powf(1.0 / self.multiplier);
        exact.max(underflow_floor)
    }

    fn max_indexable_value(&self) -> f64 {
        let exact = 2.0_f64.powf(f64::from(i32::MAX) / self.multiplier);
        exact.min(f64::MAX / (1.0 + self.relative_accuracy))
    }
}
