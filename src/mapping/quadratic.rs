//! Balanced index mapping via quadratic interpolation of `log2` from IEEE-754 bits

use super::bits::{build_double, get_exponent, get_significand_plus_one};
use super::{floor_to_i32, validate_relative_accuracy, IndexMapping};
use crate::error::Result;

/// Balanced mapping: approximates `log2(s)` over `s ∈ [1, 2)` with the
/// quadratic `-(s - 5)(s - 1) / 3`, which matches `log2(s)` at the octave
/// endpoints and tracks it more closely mid-octave than the linear
/// approximation used by [`super::LinearlyInterpolatedMapping`]
///
/// Produces noticeably fewer bins than the linear variant for the same
/// accuracy, at a small additional per-insert cost (one extra multiply and,
/// on the `value` path, one square root).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadraticallyInterpolatedMapping {
    relative_accuracy: f64,
    multiplier: f64,
}

impl QuadraticallyInterpolatedMapping {
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
            multiplier: 1.0 / (4.0 * gamma.ln()),
        })
    }
}

impl IndexMapping for QuadraticallyInterpolatedMapping {
    fn index(&self, value: f64) -> i32 {
        let e = get_exponent(value) as f64;
        let s = get_significand_plus_one(value);
        floor_to_i32(self.multiplier * (3.0 * e - (s - 5.0) * (s - 1.0)))
    }

    fn value(&self, index: i32) -> f64 {
        let x = f64::from(index) / (3.0 * self.multiplier);
        let e = x.floor() as i64;
        let frac = x - e as f64;
        let s = 3.0 - (4.0 - 3.0 * frac).sqrt();
        build_double(e, s) * (1.0 + self.relative_accuracy)
    }

    fn relative_accuracy(&self) -> f64 {
        self.relative_accuracy
    }

    fn min_indexable_value(&self) -> f64 {
        let exact =
            2.0_f64.powf(f64::from(i32::MIN + 1) / (3.0 * self.multiplier) + 1.0);
        let underflow_floor =
            f64::MIN_POSITIVE * (1.0 + self.relative_accuracy) / (1.0 - self.relative_accuracy);
        exact.max(underflow_floor)
    }

    fn max_indexable_value(&self) -> f64 {
        let exact = 2.0_f64.powf(f64::from(i32::MAX) / (3.0 * self.multiplier) - 1.0);
        exact.min(f64::MAX / (1.0 + self.relative_accuracy))
    }
}
