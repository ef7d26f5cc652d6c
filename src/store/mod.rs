//! Bin stores: compact dynamic counters over integer-indexed bins
//!
//! A [`Store`] holds non-negative counts keyed by bucket index, as produced
//! by an [`crate::mapping::IndexMapping`]. [`DenseStore`] grows without
//! bound; [`CollapsingLowestDenseStore`] and [`CollapsingHighestDenseStore`]
//! are capped at a fixed bin budget and fold overflow mass into a sentinel
//! bin at the capped edge rather than growing further.
//!
//! As with [`crate::mapping::Mapping`], the three variants are collected
//! into one tagged union, [`StoreImpl`], instead of boxed trait objects.

mod collapsing;
mod dense;

pub use collapsing::{CollapsingHighestDenseStore, CollapsingLowestDenseStore};
pub use dense::DenseStore;

use crate::error::Result;

/// Bin array growth granularity, matching the order of magnitude of
/// `INITIAL_NUM_BINS`/`GROW_LEFT_BY` in the OpenTelemetry Rust DDSketch
/// aggregator: large enough to amortize reallocation over many inserts,
/// small enough not to waste memory on sparse streams.
pub(crate) const CHUNK_SIZE: usize = 128;

/// Rounds `required` up to the next multiple of [`CHUNK_SIZE`]
pub(crate) fn round_up_to_chunk(required: usize) -> usize {
    if required == 0 {
        return CHUNK_SIZE;
    }
    (required + CHUNK_SIZE - 1) / CHUNK_SIZE * CHUNK_SIZE
}

/// Common contract shared by all store variants
pub trait Store {
    /// Increments the bin at `index` by one
    fn add(&mut self, index: i32);

    /// Increments the bin at `index` by `count`
    ///
    /// # Errors
    /// Returns [`crate::error::SketchError::InvalidArgument`] if `count` is negative.
    fn add_count(&mut self, index: i32, count: i64) -> Result<()>;

    /// Merges all bins of `other` into `self`
    fn merge_with(&mut self, other: &Self)
    where
        Self: Sized;

    /// Returns `true` if the store holds no non-zero bins
    fn is_empty(&self) -> bool;

    /// Returns the sum of all bin counts
    fn total_count(&self) -> i64;

    /// Returns the lowest index with non-zero count
    ///
    /// # Errors
    /// Returns [`crate::error::SketchError::NoSuchElement`] if the store is empty.
    fn min_index(&self) -> Result<i32>;

    /// Returns the highest index with non-zero count
    ///
    /// # Errors
    /// Returns [`crate::error::SketchError::NoSuchElement`] if the store is empty.
    fn max_index(&self) -> Result<i32>;

    /// Returns a cursor over non-zero bins in ascending index order
    fn ascending_iter(&self) -> AscendingIter<'_>;

    /// Returns a cursor over non-zero bins in descending index order
    fn descending_iter(&self) -> DescendingIter<'_>;
}

/// Cursor over a store's non-zero bins, lowest index first
///
/// Reflects the store's state at creation; the store must not be mutated
/// while this cursor is alive (single-writer model, spec.md §5).
pub struct AscendingIter<'a> {
    bins: &'a [i64],
    offset: i64,
    front: usize,
    back: usize,
}

impl<'a> AscendingIter<'a> {
    fn new(bins: &'a [i64], offset: i64) -> Self {
        Self {
            bins,
            offset,
            front: 0,
            back: bins.len(),
        }
    }
}

impl Iterator for AscendingIter<'_> {
    type Item = (i32, i64);

    fn next(&mut self) -> Option<Self::Item> {
        while self.front < self.back {
            let slot = self.front;
            self.front += 1;
            let count = self.bins[slot];
            if count > 0 {
                return Some(((slot as i64 + self.offset) as i32, count));
            }
        }
        None
    }
}

/// Cursor over a store's non-zero bins, highest index first
pub struct DescendingIter<'a> {
    bins: &'a [i64],
    offset: i64,
    front: usize,
    back: usize,
}

impl<'a> DescendingIter<'a> {
    fn new(bins: &'a [i64], offset: i64) -> Self {
        Self {
            bins,
            offset,
            front: 0,
            back: bins.len(),
        }
    }
}

impl Iterator for DescendingIter<'_> {
    type Item = (i32, i64);

    fn next(&mut self) -> Option<Self::Item> {
        while self.back > self.front {
            self.back -= 1;
            let count = self.bins[self.back];
            if count > 0 {
                return Some(((self.back as i64 + self.offset) as i32, count));
            }
        }
        None
    }
}

/// Tagged union over the three `Store` variants
#[derive(Debug, Clone)]
pub enum StoreImpl {
    /// Unbounded dense array store
    Dense(DenseStore),
    /// Bounded store that collapses its lowest bins once `maxNumBins` is exceeded
    CollapsingLowest(CollapsingLowestDenseStore),
    /// Bounded store that collapses its highest bins once `maxNumBins` is exceeded
    CollapsingHighest(CollapsingHighestDenseStore),
}

impl StoreImpl {
    /// Builds an unbounded dense store
    pub fn dense() -> Self {
        StoreImpl::Dense(DenseStore::new())
    }

    /// Builds a store bounded at `max_num_bins`, collapsing the lowest indices first
    ///
    /// # Errors
    /// Returns [`crate::error::SketchError::InvalidArgument`] if `max_num_bins` is zero.
    pub fn collapsing_lowest(max_num_bins: usize) -> Result<Self> {
        Ok(StoreImpl::CollapsingLowest(CollapsingLowestDenseStore::new(
            max_num_bins,
        )?))
    }

    /// Builds a store bounded at `max_num_bins`, collapsing the highest indices first
    ///
    /// # Errors
    /// Returns [`crate::error::SketchError::InvalidArgument`] if `max_num_bins` is zero.
    pub fn collapsing_highest(max_num_bins: usize) -> Result<Self> {
        Ok(StoreImpl::CollapsingHighest(
            CollapsingHighestDenseStore::new(max_num_bins)?,
        ))
    }
}

impl Store for StoreImpl {
    fn add(&mut self, index: i32) {
        match self {
            StoreImpl::Dense(s) => s.add(index),
            StoreImpl::CollapsingLowest(s) => s.add(index),
            StoreImpl::CollapsingHighest(s) => s.add(index),
        }
    }

    fn add_count(&mut self, index: i32, count: i64) -> Result<()> {
        match self {
            StoreImpl::Dense(s) => s.add_count(index, count),
            StoreImpl::CollapsingLowest(s) => s.add_count(index, count),
            StoreImpl::CollapsingHighest(s) => s.add_count(index, count),
        }
    }

    fn merge_with(&mut self, other: &Self) {
        match (self, other) {
            (StoreImpl::Dense(a), StoreImpl::Dense(b)) => a.merge_with(b),
            (StoreImpl::CollapsingLowest(a), StoreImpl::CollapsingLowest(b)) => a.merge_with(b),
            (StoreImpl::CollapsingHighest(a), StoreImpl::CollapsingHighest(b)) => a.merge_with(b),
            (this, other) => {
                for (index, count) in other.ascending_iter() {
                    // infallible: counts read back from a valid store are never negative
                    let _ = this.add_count(index, count);
                }
            }
        }
    }

    fn is_empty(&self) -> bool {
        match self {
            StoreImpl::Dense(s) => s.is_empty(),
            StoreImpl::CollapsingLowest(s) => s.is_empty(),
            StoreImpl::CollapsingHighest(s) => s.is_empty(),
        }
    }

    fn total_count(&self) -> i64 {
        match self {
            StoreImpl::Dense(s) => s.total_count(),
            StoreImpl::CollapsingLowest(s) => s.total_count(),
            StoreImpl::CollapsingHighest(s) => s.total_count(),
        }
    }

    fn min_index(&self) -> Result<i32> {
        match self {
            StoreImpl::Dense(s) => s.min_index(),
            StoreImpl::CollapsingLowest(s) => s.min_index(),
            StoreImpl::CollapsingHighest(s) => s.min_index(),
        }
    }

    fn max_index(&self) -> Result<i32> {
        match self {
            StoreImpl::Dense(s) => s.max_index(),
            StoreImpl::CollapsingLowest(s) => s.max_index(),
            StoreImpl::CollapsingHighest(s) => s.max_index(),
        }
    }

    fn ascending_iter(&self) -> AscendingIter<'_> {
        match self {
            StoreImpl::Dense(s) => s.ascending_iter(),
            StoreImpl::CollapsingLowest(s) => s.ascending_iter(),
            StoreImpl::CollapsingHighest(s) => s.ascending_iter(),
        }
    }

    fn descending_iter(&self) -> DescendingIter<'_> {
        match self {
            StoreImpl::Dense(s) => s.descending_iter(),
            StoreImpl::CollapsingLowest(s) => s.descending_iter(),
            StoreImpl::CollapsingHighest(s) => s.descending_iter(),
        }
    }
}
