//! Exact logarithmic index mapping — memory-optimal, one `ln` call per insert

use super::{floor_to_i32, validate_relative_accuracy, IndexMapping};
use crate::error::Result;

/// Memory-optimal mapping: `index(v) = floor(ln(v) / ln(γ))`
///
/// Produces the minimum possible number of bins for a given accuracy, at the
/// cost of a natural logarithm per insert (the two interpolated variants in
/// this module trade a small amount of extra bin count for replacing that
/// logarithm with bit manipulation).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogarithmicMapping {
    relative_accuracy: f64,
    gamma_ln: f64,
    multiplier: f64,
}

impl LogarithmicMapping {
    /// Creates a mapping for the given relative accuracy
    ///
    /// # Errors
    /// Returns [`crate::error::SketchError::InvalidArgument`] if
    /// `relative_accuracy` is not in `(0, 1)`.
    pub fn new(relative_accuracy: f64) -> Result<Self> {
        validate_relative_accuracy(relative_accuracy)?;
        let gamma = (1.0 + relative_accuracy) / (1.0 - relative_accuracy);
        let gamma_ln = gamma.ln();
        Ok(Self {
            relative_accuracy,
            gamma_ln,
            multiplier: 1.0 / gamma_ln,
        })
    }
}

impl IndexMapping for LogarithmicMapping {
    fn index(&self, value: f64) -> i32 {
        floor_to_i32(value.ln() * self.multiplier)
    }

    fn value(&self, index: i32) -> f64 {
        (f64::from(index) * self.gamma_ln).exp() * (1.0 + self.relative_accuracy)
    }

    fn relative_accuracy(&self) -> f64 {
        self.relative_accuracy
    }

    fn min_indexable_value(&self) -> f64 {
        (f64::from(i32::MIN + 1) * self.gamma_ln)
            .exp()
            .max(f64::MIN_POSITIVE * self.gamma_ln.exp())
    }

    fn max_indexable_value(&self) -> f64 {
        (f64::from(i32::MAX) * self.gamma_ln)
            .exp()
            .min(f64::MAX / (1.0 + self.relative_accuracy))
    }
}
