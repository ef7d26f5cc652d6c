//! Bounded dense-array bin stores that collapse extreme bins on overflow
//!
//! [`CollapsingLowestDenseStore`] and [`CollapsingHighestDenseStore`] behave
//! like [`super::DenseStore`] as long as the logical index window fits within
//! `max_num_bins`. Once an insert would need a wider window, the store stops
//! growing on its collapsing side and instead folds every count at or beyond
//! the clipped boundary into a sentinel bin at that boundary — trading
//! accuracy on that side's extreme quantiles for a hard memory ceiling.
//! Modeled on the OpenTelemetry Rust SDK DDSketch aggregator's
//! `Store::grow_left`/`grow_right` bin-budget clamp, corrected here so the
//! collapse path never indexes with a negative offset.

use super::{round_up_to_chunk, AscendingIter, DescendingIter, Store};
use crate::error::{invalid_argument, no_such_element, Result};

fn validate_max_num_bins(max_num_bins: usize) -> Result<()> {
    if max_num_bins == 0 {
        return Err(invalid_argument(
            "max_num_bins",
            max_num_bins.to_string(),
            "must be > 0",
        ));
    }
    Ok(())
}

/// Dense store bounded at `max_num_bins`, collapsing its lowest indices
/// into a sentinel bin once the budget would otherwise be exceeded
#[derive(Debug, Clone)]
pub struct CollapsingLowestDenseStore {
    counts: Vec<i64>,
    offset: i32,
    min_index: i32,
    max_index: i32,
    total_count: i64,
    max_num_bins: usize,
    is_collapsed: bool,
}

impl CollapsingLowestDenseStore {
    /// Creates an empty store bounded at `max_num_bins` non-zero slots
    ///
    /// # Errors
    /// Returns [`crate::error::SketchError::InvalidArgument`] if
    /// `max_num_bins` is zero — a store with no room for even one bin
    /// cannot represent any count.
    pub fn new(max_num_bins: usize) -> Result<Self> {
        validate_max_num_bins(max_num_bins)?;
        Ok(Self {
            counts: Vec::new(),
            offset: 0,
            min_index: 0,
            max_index: 0,
            total_count: 0,
            max_num_bins,
            is_collapsed: false,
        })
    }

    /// Returns `true` once this store has folded any count into a sentinel
    /// bin. Exposed for tests; treat this as an internal detail observable
    /// only through the bin-budget invariant.
    #[must_use]
    pub(crate) fn is_collapsed(&self) -> bool {
        self.is_collapsed
    }

    fn physically_fits(&self, index: i32) -> bool {
        if self.counts.is_empty() {
            return false;
        }
        let slot = i64::from(index) - i64::from(self.offset);
        slot >= 0 && slot < self.counts.len() as i64
    }

    /// Grows/shifts without collapsing; caller guarantees the desired span
    /// fits within `max_num_bins`
    fn grow_or_shift(&mut self, new_min: i32, new_max: i32) {
        if self.counts.is_empty() {
            let len = round_up_to_chunk(1).min(self.max_num_bins);
            self.counts = vec![0i64; len];
            self.offset = new_min - (len as i32) / 2;
            return;
        }
        let lo = i64::from(new_min) - i64::from(self.offset);
        let hi = i64::from(new_max) - i64::from(self.offset);
        if lo >= 0 && hi < self.counts.len() as i64 {
            return;
        }

        let desired_len = (i64::from(new_max) - i64::from(new_min) + 1) as usize;
        let new_len = round_up_to_chunk(desired_len)
            .max(self.counts.len())
            .min(self.max_num_bins);

        let old_offset = i64::from(self.offset);
        let old_len = self.counts.len() as i64;
        let new_min64 = i64::from(new_min);
        let overlap_start = old_offset.max(new_min64);
        let overlap_end = (old_offset + old_len).min(new_min64 + new_len as i64);

        let mut new_counts = vec![0i64; new_len];
        if overlap_start < overlap_end {
            let old_from = (overlap_start - old_offset) as usize;
            let old_to = (overlap_end - old_offset) as usize;
            let new_from = (overlap_start - new_min64) as usize;
            let new_to = (overlap_end - new_min64) as usize;
            new_counts[new_from..new_to].copy_from_slice(&self.counts[old_from..old_to]);
        }
        self.counts = new_counts;
        self.offset = new_min;
    }

    /// Rebuilds the array at exactly `max_num_bins` slots covering
    /// `[clipped_min, new_max]`, folding everything below `clipped_min` into
    /// the sentinel at slot 0
    fn collapse_to(&mut self, clipped_min: i32, new_max: i32) {
        let new_len = self.max_num_bins;
        let mut new_counts = vec![0i64; new_len];
        if !self.counts.is_empty() {
            let old_offset = i64::from(self.offset);
            let old_len = self.counts.len() as i64;
            let clipped_min64 = i64::from(clipped_min);
            let new_max64 = i64::from(new_max);

            let below_end = clipped_min64.min(old_offset + old_len);
            if below_end > old_offset {
                let sum: i64 = self.counts[0..(below_end - old_offset) as usize]
                    .iter()
                    .sum();
                new_counts[0] += sum;
            }

            let overlap_start = old_offset.max(clipped_min64);
            let overlap_end = (old_offset + old_len).min(new_max64 + 1);
            if overlap_start < overlap_end {
                let old_from = (overlap_start - old_offset) as usize;
                let old_to = (overlap_end - old_offset) as usize;
                let new_from = (overlap_start - clipped_min64) as usize;
                let new_to = (overlap_end - clipped_min64) as usize;
                new_counts[new_from..new_to].copy_from_slice(&self.counts[old_from..old_to]);
            }
        }
        self.counts = new_counts;
        self.offset = clipped_min;
        self.is_collapsed = true;
    }
}

impl Store for CollapsingLowestDenseStore {
    fn add(&mut self, index: i32) {
        let _ = self.add_count(index, 1);
    }

    fn add_count(&mut self, index: i32, count: i64) -> Result<()> {
        if count < 0 {
            return Err(invalid_argument(
                "count",
                count.to_string(),
                "must be >= 0",
            ));
        }
        if count == 0 {
            return Ok(());
        }

        if self.is_collapsed && index < self.min_index {
            self.counts[0] += count;
            self.total_count += count;
            return Ok(());
        }

        let (new_min, new_max) = if self.total_count == 0 {
            (index, index)
        } else {
            (self.min_index.min(index), self.max_index.max(index))
        };

        let span = i64::from(new_max) - i64::from(new_min) + 1;
        if span as usize > self.max_num_bins {
            let clipped_min = (i64::from(new_max) - self.max_num_bins as i64 + 1) as i32;
            self.collapse_to(clipped_min, new_max);
            self.min_index = clipped_min;
            self.max_index = new_max;
            let slot = if index < clipped_min {
                0
            } else {
                (index - clipped_min) as usize
            };
            self.counts[slot] += count;
            self.total_count += count;
            return Ok(());
        }

        if !self.physically_fits(index) {
            self.grow_or_shift(new_min, new_max);
        }
        self.min_index = new_min;
        self.max_index = new_max;
        let slot = (index - self.offset) as usize;
        self.counts[slot] += count;
        self.total_count += count;
        Ok(())
    }

    fn merge_with(&mut self, other: &Self) {
        for (index, count) in other.ascending_iter() {
            let _ = self.add_count(index, count);
        }
    }

    fn is_empty(&self) -> bool {
        self.total_count == 0
    }

    fn total_count(&self) -> i64 {
        self.total_count
    }

    fn min_index(&self) -> Result<i32> {
        if self.total_count == 0 {
            return Err(no_such_element("min_index"));
        }
        Ok(self.min_index)
    }

    fn max_index(&self) -> Result<i32> {
        if self.total_count == 0 {
            return Err(no_such_element("max_index"));
        }
        Ok(self.max_index)
    }

    fn ascending_iter(&self) -> AscendingIter<'_> {
        AscendingIter::new(&self.counts, i64::from(self.offset))
    }

    fn descending_iter(&self) -> DescendingIter<'_> {
        DescendingIter::new(&self.counts, i64::from(self.offset))
    }
}

/// Dense store bounded at `max_num_bins`, collapsing its highest indices
/// into a sentinel bin once the budget would otherwise be exceeded
///
/// Mirror image of [`CollapsingLowestDenseStore`]; see that type for the
/// shared growth/collapse rationale.
#[derive(Debug, Clone)]
pub struct CollapsingHighestDenseStore {
    counts: Vec<i64>,
    offset: i32,
    min_index: i32,
    max_index: i32,
    total_count: i64,
    max_num_bins: usize,
    is_collapsed: bool,
}

impl CollapsingHighestDenseStore {
    /// Creates an empty store bounded at `max_num_bins` non-zero slots
    ///
    /// # Errors
    /// Returns [`crate::error::SketchError::InvalidArgument`] if
    /// `max_num_bins` is zero; see [`CollapsingLowestDenseStore::new`].
    pub fn new(max_num_bins: usize) -> Result<Self> {
        validate_max_num_bins(max_num_bins)?;
        Ok(Self {
            counts: Vec::new(),
            offset: 0,
            min_index: 0,
            max_index: 0,
            total_count: 0,
            max_num_bins,
            is_collapsed: false,
        })
    }

    #[must_use]
    pub(crate) fn is_collapsed(&self) -> bool {
        self.is_collapsed
    }

    fn physically_fits(&self, index: i32) -> bool {
        if self.counts.is_empty() {
            return false;
        }
        let slot = i64::from(index) - i64::from(self.offset);
        slot >= 0 && slot < self.counts.len() as i64
    }

    fn grow_or_shift(&mut self, new_min: i32, new_max: i32) {
        if self.counts.is_empty() {
            let len = round_up_to_chunk(1).min(self.max_num_bins);
            self.counts = vec![0i64; len];
            self.offset = new_min - (len as i32) / 2;
            return;
        }
        let lo = i64::from(new_min) - i64::from(self.offset);
        let hi = i64::from(new_max) - i64::from(self.offset);
        if lo >= 0 && hi < self.counts.len() as i64 {
            return;
        }

        let desired_len = (i64::from(new_max) - i64::from(new_min) + 1) as usize;
        let new_len = round_up_to_chunk(desired_len)
            .max(self.counts.len())
            .min(self.max_num_bins);

        let old_offset = i64::from(self.offset);
        let old_len = self.counts.len() as i64;
        let new_min64 = i64::from(new_min);
        let overlap_start = old_offset.max(new_min64);
        let overlap_end = (old_offset + old_len).min(new_min64 + new_len as i64);

        let mut new_counts = vec![0i64; new_len];
        if overlap_start < overlap_end {
            let old_from = (overlap_start - old_offset) as usize;
            let old_to = (overlap_end - old_offset) as usize;
            let new_from = (overlap_start - new_min64) as usize;
            let new_to = (overlap_end - new_min64) as usize;
            new_counts[new_from..new_to].copy_from_slice(&self.counts[old_from..old_to]);
        }
        self.counts = new_counts;
        self.offset = new_min;
    }

    /// Rebuilds the array at exactly `max_num_bins` slots covering
    /// `[new_min, clipped_max]`, folding everything above `clipped_max` into
    /// the sentinel at the last slot
    fn collapse_to(&mut self, new_min: i32, clipped_max: i32) {
        let new_len = self.max_num_bins;
        let mut new_counts = vec![0i64; new_len];
        if !self.counts.is_empty() {
            let old_offset = i64::from(self.offset);
            let old_len = self.counts.len() as i64;
            let new_min64 = i64::from(new_min);
            let clipped_max64 = i64::from(clipped_max);

            let above_start = (clipped_max64 + 1).max(old_offset);
            if above_start < old_offset + old_len {
                let sum: i64 = self.counts[(above_start - old_offset) as usize..]
                    .iter()
                    .sum();
                new_counts[new_len - 1] += sum;
            }

            let overlap_start = old_offset.max(new_min64);
            let overlap_end = (old_offset + old_len).min(clipped_max64 + 1);
            if overlap_start < overlap_end {
                let old_from = (overlap_start - old_offset) as usize;
                let old_to = (overlap_end - old_offset) as usize;
                let new_from = (overlap_start - new_min64) as usize;
                let new_to = (overlap_end - new_min64) as usize;
                new_counts[new_from..new_to].copy_from_slice(&self.counts[old_from..old_to]);
            }
        }
        self.counts = new_counts;
        self.offset = new_min;
        self.is_collapsed = true;
    }
}

impl Store for CollapsingHighestDenseStore {
    fn add(&mut self, index: i32) {
        let _ = self.add_count(index, 1);
    }

    fn add_count(&mut self, index: i32, count: i64) -> Result<()> {
        if count < 0 {
            return Err(invalid_argument(
                "count",
                count.to_string(),
                "must be >= 0",
            ));
        }
        if count == 0 {
            return Ok(());
        }

        if self.is_collapsed && index > self.max_index {
            let last = self.counts.len() - 1;
            self.counts[last] += count;
            self.total_count += count;
            return Ok(());
        }

        let (new_min, new_max) = if self.total_count == 0 {
            (index, index)
        } else {
            (self.min_index.min(index), self.max_index.max(index))
        };

        let span = i64::from(new_max) - i64::from(new_min) + 1;
        if span as usize > self.max_num_bins {
            let clipped_max = (i64::from(new_min) + self.max_num_bins as i64 - 1) as i32;
            self.collapse_to(new_min, clipped_max);
            self.min_index = new_min;
            self.max_index = clipped_max;
            let slot = if index > clipped_max {
                self.max_num_bins - 1
            } else {
                (index - new_min) as usize
            };
            self.counts[slot] += count;
            self.total_count += count;
            return Ok(());
        }

        if !self.physically_fits(index) {
            self.grow_or_shift(new_min, new_max);
        }
        self.min_index = new_min;
        self.max_index = new_max;
        let slot = (index - self.offset) as usize;
        self.counts[slot] += count;
        self.total_count += count;
        Ok(())
    }

    fn merge_with(&mut self, other: &Self) {
        for (index, count) in other.ascending_iter() {
            let _ = self.add_count(index, count);
        }
    }

    fn is_empty(&self) -> bool {
        self.total_count == 0
    }

    fn total_count(&self) -> i64 {
        self.total_count
    }

    fn min_index(&self) -> Result<i32> {
        if self.total_count == 0 {
            return Err(no_such_element("min_index"));
        }
        Ok(self.min_index)
    }

    fn max_index(&self) -> Result<i32> {
        if self.total_count == 0 {
            return Err(no_such_element("max_index"));
        }
        Ok(self.max_index)
    }

    fn ascending_iter(&self) -> AscendingIter<'_> {
        AscendingIter::new(&self.counts, i64::from(self.offset))
    }

    fn descending_iter(&self) -> DescendingIter<'_> {
        DescendingIter::new(&self.counts, i64::from(self.offset))
    }
}
