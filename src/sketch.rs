//! `Sketch`: the driver that composes an [`IndexMapping`] and a [`StoreImpl`]
//!
//! A `Sketch` owns exactly one mapping and one store, plus a `zero_count`
//! bucket absorbing values too small to index without hitting the
//! logarithmic singularity at zero. It implements `accept`/`merge_with` and
//! the rank-query algorithm that answers `value_at_quantile`.
//!
//! # Example
//!
//! ```
//! use ddsketch_core::presets;
//!
//! let mut sketch = presets::balanced(0.01).unwrap();
//! for i in 1..=1000 {
//!     sketch.accept(f64::from(i)).unwrap();
//! }
//!
//! let median = sketch.value_at_quantile(0.5).unwrap();
//! assert!((median - 500.0).abs() / 500.0 <= 0.01 + 1e-9);
//! ```

use crate::error::{invalid_argument, no_such_element, Result};
use crate::mapping::{IndexMapping, Mapping};
use crate::store::{Store, StoreImpl};

/// A relative-error quantile sketch over non-negative reals
///
/// # Algorithm
///
/// Values are routed to one of two places:
/// - `[0, min_indexed_value)` increments `zero_count` directly, sidestepping
///   the logarithmic mapping's singularity at zero;
/// - `[min_indexed_value, max_indexed_value]` is mapped to a bucket index via
///   `index_mapping` and accumulated in `store`.
///
/// `value_at_quantile` computes a target rank and walks the store ascending
/// (for `q <= 0.5`) or descending (otherwise) from the appropriate end,
/// folding in `zero_count` as the store's implicit leftmost mass, to bound
/// the number of bins visited by `min(rank, total_count() - rank)`.
///
/// # Complexity
///
/// `accept` is O(1) amortized (store growth is chunked); `value_at_quantile`
/// is O(k) in the number of populated bins; `merge_with` is O(k₁ + k₂).
#[derive(Debug, Clone)]
pub struct Sketch {
    index_mapping: Mapping,
    store: StoreImpl,
    zero_count: i64,
    min_indexed_value: f64,
    max_indexed_value: f64,
}

impl Sketch {
    /// Builds an empty sketch over `mapping`'s indexable range, routing
    /// every value below `mapping.min_indexable_value()` into `zero_count`
    pub fn new(mapping: Mapping, store: StoreImpl) -> Self {
        Self::with_min_indexed_value(mapping, store, mapping.min_indexable_value())
    }

    /// Builds an empty sketch with an explicit zero-bucket threshold
    ///
    /// `min_indexed_value` is clamped up to `mapping.min_indexable_value()`
    /// if given a smaller value, since the mapping cannot index below that
    /// bound regardless of the caller's preference.
    pub fn with_min_indexed_value(mapping: Mapping, store: StoreImpl, min_indexed_value: f64) -> Self {
        let max_indexed_value = mapping.max_indexable_value();
        let min_indexed_value = min_indexed_value.max(mapping.min_indexable_value());
        Self {
            index_mapping: mapping,
            store,
            zero_count: 0,
            min_indexed_value,
            max_indexed_value,
        }
    }

    /// Accepts a single occurrence of `value`
    ///
    /// # Errors
    /// Returns [`crate::error::SketchError::InvalidArgument`] if `value` is
    /// negative, NaN, `+inf`, or exceeds `max_indexed_value()`.
    pub fn accept(&mut self, value: f64) -> Result<()> {
        self.accept_with_count(value, 1)
    }

    /// Accepts `count` occurrences of `value`
    ///
    /// # Errors
    /// Returns [`crate::error::SketchError::InvalidArgument`] if `value` is
    /// negative, NaN, `+inf`, exceeds `max_indexed_value()`, or if `count`
    /// is negative.
    pub fn accept_with_count(&mut self, value: f64, count: i64) -> Result<()> {
        if count < 0 {
            return Err(invalid_argument("count", count.to_string(), "must be >= 0"));
        }
        if !(value >= 0.0) {
            // catches negatives and NaN in one comparison (NaN compares false)
            return Err(invalid_argument(
                "value",
                value.to_string(),
                "must be non-negative and not NaN",
            ));
        }
        if value > self.max_indexed_value {
            return Err(invalid_argument(
                "value",
                value.to_string(),
                format!("must be <= max_indexed_value ({})", self.max_indexed_value),
            ));
        }
        if count == 0 {
            return Ok(());
        }
        if value < self.min_indexed_value {
            self.zero_count += count;
        } else {
            let index = self.index_mapping.index(value);
            self.store.add_count(index, count)?;
        }
        Ok(())
    }

    /// Merges `other` into `self`
    ///
    /// # Errors
    /// Returns [`crate::error::SketchError::InvalidArgument`] if the two
    /// sketches' `IndexMapping` configurations differ (same variant,
    /// bit-equal `relative_accuracy`).
    pub fn merge_with(&mut self, other: &Self) -> Result<()> {
        if self.index_mapping != other.index_mapping {
            return Err(invalid_argument(
                "other.index_mapping",
                format!("{:?}", other.index_mapping),
                format!(
                    "must equal this sketch's mapping {:?} to merge",
                    self.index_mapping
                ),
            ));
        }
        self.store.merge_with(&other.store);
        self.zero_count += other.zero_count;
        self.min_indexed_value = self.min_indexed_value.min(other.min_indexed_value);
        Ok(())
    }

    /// Deep-copies this sketch
    ///
    /// Equivalent to `.clone()`, provided as a named lifecycle operation
    /// alongside `accept` and `merge_with`.
    #[must_use]
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// Returns `true` if no value has been accepted
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.zero_count == 0 && self.store.is_empty()
    }

    /// Returns the total number of accepted values (counting repeats)
    #[must_use]
    pub fn total_count(&self) -> i64 {
        self.zero_count + self.store.total_count()
    }

    /// Returns the sketch's `relative_accuracy`
    #[must_use]
    pub fn relative_accuracy(&self) -> f64 {
        self.index_mapping.relative_accuracy()
    }

    /// Returns the smallest value this sketch can index without falling
    /// into the zero bucket
    #[must_use]
    pub fn min_indexed_value(&self) -> f64 {
        self.min_indexed_value
    }

    /// Returns the largest value this sketch can index
    #[must_use]
    pub fn max_indexed_value(&self) -> f64 {
        self.max_indexed_value
    }

    /// Returns the minimum accepted value, within `relative_accuracy` of the
    /// true minimum
    ///
    /// # Errors
    /// Returns [`crate::error::SketchError::NoSuchElement`] if the sketch is
    /// empty.
    pub fn min_value(&self) -> Result<f64> {
        if self.is_empty() {
            return Err(no_such_element("min_value"));
        }
        if self.zero_count > 0 {
            return Ok(0.0);
        }
        Ok(self.index_mapping.value(self.store.min_index()?))
    }

    /// Returns the maximum accepted value, within `relative_accuracy` of the
    /// true maximum
    ///
    /// # Errors
    /// Returns [`crate::error::SketchError::NoSuchElement`] if the sketch is
    /// empty.
    pub fn max_value(&self) -> Result<f64> {
        if self.is_empty() {
            return Err(no_such_element("max_value"));
        }
        if self.store.is_empty() {
            return Ok(0.0);
        }
        Ok(self.index_mapping.value(self.store.max_index()?))
    }

    /// Returns the value at quantile `q`
    ///
    /// # Errors
    /// Returns [`crate::error::SketchError::InvalidArgument`] if `q` is
    /// outside `[0, 1]`, or [`crate::error::SketchError::NoSuchElement`] if
    /// the sketch is empty.
    pub fn value_at_quantile(&self, q: f64) -> Result<f64> {
        if !(0.0..=1.0).contains(&q) {
            return Err(invalid_argument(
                "q",
                q.to_string(),
                "must be in [0, 1]",
            ));
        }
        let n = self.total_count();
        if n == 0 {
            return Err(no_such_element("value_at_quantile"));
        }
        let rank = (q * (n - 1) as f64).floor() as i64;
        debug_assert!(rank < n, "rank {rank} must be < total_count {n}");

        if rank < self.zero_count {
            return Ok(0.0);
        }

        if q <= 0.5 {
            let mut n_cum = self.zero_count;
            let mut iter = self.store.ascending_iter();
            let mut current = iter.next();
            loop {
                match current {
                    Some((index, count)) => {
                        n_cum += count;
                        if n_cum > rank {
                            return Ok(self.index_mapping.value(index));
                        }
                        current = iter.next();
                    }
                    // store exhausted without crossing rank: fall back to the
                    // last (highest) bin rather than silently returning a
                    // stale or out-of-window value (spec.md §9, Open Question)
                    None => return self.max_value(),
                }
            }
        } else {
            let mut n_cum = n;
            let mut iter = self.store.descending_iter();
            let mut current = iter.next();
            loop {
                match current {
                    Some((index, count)) => {
                        n_cum -= count;
                        if n_cum <= rank {
                            return Ok(self.index_mapping.value(index));
                        }
                        current = iter.next();
                    }
                    None => return self.min_value(),
                }
            }
        }
    }

    /// Returns the values at each quantile in `qs`, computing `total_count()`
    /// once and reusing it (spec.md §4.3)
    ///
    /// # Errors
    /// Same as [`Sketch::value_at_quantile`], applied to each element of
    /// `qs` in order; the first failing quantile short-circuits the rest.
    pub fn values_at_quantiles(&self, qs: &[f64]) -> Result<Vec<f64>> {
        qs.iter().map(|&q| self.value_at_quantile(q)).collect()
    }
}
