//! Convenience constructors selecting a `(mapping, store)` pair by name
//!
//! A thin collaborator over [`crate::sketch::Sketch`]: each function picks
//! the mapping variant and store variant the name advertises and wires them
//! into a fresh [`Sketch`]. None of this module is required to use the
//! core — callers needing a different combination can call [`Sketch::new`]
//! directly with any [`Mapping`]/[`StoreImpl`] pair.

use crate::error::Result;
use crate::mapping::Mapping;
use crate::sketch::Sketch;
use crate::store::StoreImpl;

/// Quadratic mapping over an unbounded dense store: balances ingestion
/// speed against bin density
///
/// # Errors
/// Returns [`crate::error::SketchError::InvalidArgument`] if `relative_accuracy`
/// is outside `(0, 1)`.
pub fn balanced(relative_accuracy: f64) -> Result<Sketch> {
    let mapping = Mapping::quadratic(relative_accuracy)?;
    Ok(Sketch::new(mapping, StoreImpl::dense()))
}

/// [`balanced`], bounded at `max_num_bins` by collapsing the lowest indices
///
/// # Errors
/// Returns [`crate::error::SketchError::InvalidArgument`] if `relative_accuracy`
/// is outside `(0, 1)` or `max_num_bins` is zero.
pub fn balanced_collapsing_lowest(relative_accuracy: f64, max_num_bins: usize) -> Result<Sketch> {
    let mapping = Mapping::quadratic(relative_accuracy)?;
    Ok(Sketch::new(mapping, StoreImpl::collapsing_lowest(max_num_bins)?))
}

/// [`balanced`], bounded at `max_num_bins` by collapsing the highest indices
///
/// # Errors
/// Returns [`crate::error::SketchError::InvalidArgument`] if `relative_accuracy`
/// is outside `(0, 1)` or `max_num_bins` is zero.
pub fn balanced_collapsing_highest(relative_accuracy: f64, max_num_bins: usize) -> Result<Sketch> {
    let mapping = Mapping::quadratic(relative_accuracy)?;
    Ok(Sketch::new(mapping, StoreImpl::collapsing_highest(max_num_bins)?))
}

/// Linearly-interpolated (bitwise) mapping over an unbounded dense store:
/// the fastest variant to index, at the cost of more bins per decade than
/// [`balanced`] or [`memory_optimal`]
///
/// # Errors
/// Returns [`crate::error::SketchError::InvalidArgument`] if `relative_accuracy`
/// is outside `(0, 1)`.
pub fn fast(relative_accuracy: f64) -> Result<Sketch> {
    let mapping = Mapping::linear(relative_accuracy)?;
    Ok(Sketch::new(mapping, StoreImpl::dense()))
}

/// [`fast`], bounded at `max_num_bins` by collapsing the lowest indices
///
/// # Errors
/// Returns [`crate::error::SketchError::InvalidArgument`] if `relative_accuracy`
/// is outside `(0, 1)` or `max_num_bins` is zero.
pub fn fast_collapsing_lowest(relative_accuracy: f64, max_num_bins: usize) -> Result<Sketch> {
    let mapping = Mapping::linear(relative_accuracy)?;
    Ok(Sketch::new(mapping, StoreImpl::collapsing_lowest(max_num_bins)?))
}

/// [`fast`], bounded at `max_num_bins` by collapsing the highest indices
///
/// # Errors
/// Returns [`crate::error::SketchError::InvalidArgument`] if `relative_accuracy`
/// is outside `(0, 1)` or `max_num_bins` is zero.
pub fn fast_collapsing_highest(relative_accuracy: f64, max_num_bins: usize) -> Result<Sketch> {
    let mapping = Mapping::linear(relative_accuracy)?;
    Ok(Sketch::new(mapping, StoreImpl::collapsing_highest(max_num_bins)?))
}

/// Exact logarithmic mapping over an unbounded dense store: the fewest
/// bins per decade, at the cost of a `ln` call per insert
///
/// # Errors
/// Returns [`crate::error::SketchError::InvalidArgument`] if `relative_accuracy`
/// is outside `(0, 1)`.
pub fn memory_optimal(relative_accuracy: f64) -> Result<Sketch> {
    let mapping = Mapping::logarithmic(relative_accuracy)?;
    Ok(Sketch::new(mapping, StoreImpl::dense()))
}

/// [`memory_optimal`], bounded at `max_num_bins` by collapsing the lowest
/// indices
///
/// # Errors
/// Returns [`crate::error::SketchError::InvalidArgument`] if `relative_accuracy`
/// is outside `(0, 1)` or `max_num_bins` is zero.
pub fn memory_optimal_collapsing_lowest(
    relative_accuracy: f64,
    max_num_bins: usize,
) -> Result<Sketch> {
    let mapping = Mapping::logarithmic(relative_accuracy)?;
    Ok(Sketch::new(mapping, StoreImpl::collapsing_lowest(max_num_bins)?))
}

/// [`memory_optimal`], bounded at `max_num_bins` by collapsing the highest
/// indices
///
/// # Errors
/// Returns [`crate::error::SketchError::InvalidArgument`] if `relative_accuracy`
/// is outside `(0, 1)` or `max_num_bins` is zero.
pub fn memory_optimal_collapsing_highest(
    relative_accuracy: f64,
    max_num_bins: usize,
) -> Result<Sketch> {
    let mapping = Mapping::logarithmic(relative_accuracy)?;
    Ok(Sketch::new(mapping, StoreImpl::collapsing_highest(max_num_bins)?))
}
