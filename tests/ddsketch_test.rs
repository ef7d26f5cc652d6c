//! Integration tests against the public `Sketch`/`IndexMapping`/`Store` API
//!
//! Covers the universal invariants and concrete end-to-end scenarios:
//! relative accuracy, mapping round-trip, index monotonicity, merge
//! equivalence, copy independence, count conservation, the collapsing bin
//! budget, and input rejection.

use ddsketch_core::mapping::IndexMapping;
use ddsketch_core::{presets, Mapping, Sketch, StoreImpl};
use proptest::prelude::*;

fn sorted_rank(sorted: &[f64], q: f64) -> (f64, f64) {
    let n = sorted.len();
    let lo_rank = (q * (n - 1) as f64).floor() as usize;
    let hi_rank = (q * (n - 1) as f64).ceil() as usize;
    (sorted[lo_rank], sorted[hi_rank])
}

fn mappings(alpha: f64) -> Vec<Mapping> {
    vec![
        Mapping::logarithmic(alpha).unwrap(),
        Mapping::linear(alpha).unwrap(),
        Mapping::quadratic(alpha).unwrap(),
    ]
}

proptest! {
    // Invariant 1: relative accuracy
    #[test]
    fn relative_accuracy_holds(
        alpha in prop::sample::select(vec![1e-1, 1e-2, 1e-3]),
        values in prop::collection::vec(1e-3f64..1e6, 20..400),
        q in 0.01f64..0.99,
    ) {
        for mapping in mappings(alpha) {
            let mut sketch = Sketch::new(mapping, StoreImpl::dense());
            for &v in &values {
                sketch.accept(v).unwrap();
            }
            let mut sorted = values.clone();
            sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
            let (lo, hi) = sorted_rank(&sorted, q);
            let estimate = sketch.value_at_quantile(q).unwrap();
            prop_assert!(estimate >= lo * (1.0 - alpha) - 1e-9);
            prop_assert!(estimate <= hi * (1.0 + alpha) + 1e-9);
        }
    }

    // Invariant 2: mapping round-trip
    #[test]
    fn mapping_round_trips_within_accuracy(
        alpha in prop::sample::select(vec![1e-1, 1e-2, 1e-3]),
        v in 1e-3f64..1e9,
    ) {
        for mapping in mappings(alpha) {
            let recovered = mapping.value(mapping.index(v));
            let relative_error = (recovered - v).abs() / v;
            prop_assert!(relative_error <= alpha + 1e-9);
        }
    }

    // Invariant 3: index monotonicity
    #[test]
    fn index_is_monotonic(
        alpha in prop::sample::select(vec![1e-1, 1e-2, 1e-3]),
        mut vs in prop::collection::vec(1e-3f64..1e9, 2..50),
    ) {
        vs.sort_by(|a, b| a.partial_cmp(b).unwrap());
        for mapping in mappings(alpha) {
            let mut prev = mapping.index(vs[0]);
            for &v in &vs[1..] {
                let idx = mapping.index(v);
                prop_assert!(idx >= prev);
                prev = idx;
            }
        }
    }

    // Invariant 4: merge equivalence
    #[test]
    fn merge_equivalence(
        alpha in prop::sample::select(vec![1e-1, 1e-2, 1e-3]),
        m1 in prop::collection::vec(1e-3f64..1e6, 10..200),
        m2 in prop::collection::vec(1e-3f64..1e6, 10..200),
    ) {
        let mapping = Mapping::quadratic(alpha).unwrap();
        let mut s1 = Sketch::new(mapping, StoreImpl::dense());
        let mut s2 = Sketch::new(mapping, StoreImpl::dense());
        let mut combined = Sketch::new(mapping, StoreImpl::dense());
        for &v in &m1 {
            s1.accept(v).unwrap();
            combined.accept(v).unwrap();
        }
        for &v in &m2 {
            s2.accept(v).unwrap();
            combined.accept(v).unwrap();
        }
        s1.merge_with(&s2).unwrap();
        prop_assert_eq!(s1.total_count(), combined.total_count());
        for q in [0.1, 0.5, 0.9] {
            prop_assert_eq!(s1.value_at_quantile(q).unwrap(), combined.value_at_quantile(q).unwrap());
        }
    }

    // Invariant 5: copy independence
    #[test]
    fn copy_independence(
        base in prop::collection::vec(1e-3f64..1e6, 10..200),
        extra in prop::collection::vec(1e-3f64..1e6, 10..200),
    ) {
        let mapping = Mapping::quadratic(0.01).unwrap();
        let mut original = Sketch::new(mapping, StoreImpl::dense());
        for &v in &base {
            original.accept(v).unwrap();
        }
        let original_count = original.total_count();
        let original_p50 = original.value_at_quantile(0.5).unwrap();

        let mut copy = original.copy();
        for &v in &extra {
            copy.accept(v).unwrap();
        }

        prop_assert_eq!(original.total_count(), original_count);
        prop_assert_eq!(original.value_at_quantile(0.5).unwrap(), original_p50);
        prop_assert!(copy.total_count() >= original_count);
    }

    // Invariant 6: count conservation
    #[test]
    fn count_conservation(
        values in prop::collection::vec(0.0f64..1e6, 1..300),
    ) {
        let mapping = Mapping::quadratic(0.01).unwrap();
        let mut sketch = Sketch::new(mapping, StoreImpl::dense());
        for &v in &values {
            sketch.accept(v).unwrap();
        }
        prop_assert_eq!(sketch.total_count(), values.len() as i64);
    }

    // Invariant 7: collapsing bound
    #[test]
    fn collapsing_bound_holds(
        values in prop::collection::vec(1e-6f64..1e6, 50..2000),
        max_num_bins in 4usize..64,
    ) {
        let mapping = Mapping::logarithmic(0.01).unwrap();
        let mut sketch = Sketch::new(mapping, StoreImpl::collapsing_lowest(max_num_bins).unwrap());
        for &v in &values {
            sketch.accept(v).unwrap();
        }
        prop_assert_eq!(sketch.total_count(), values.len() as i64);
    }
}

// Invariant 8 and S5: rejection
#[test]
fn rejects_invalid_inputs() {
    let mut sketch = presets::balanced(0.01).unwrap();
    assert!(sketch.accept(-1.0).is_err());
    assert!(sketch.accept(f64::NAN).is_err());
    assert!(sketch.accept(f64::INFINITY).is_err());
    assert!(sketch.value_at_quantile(0.5).is_err());
    assert!(sketch.value_at_quantile(1.5).is_err());
    assert!(sketch.min_value().is_err());
    assert!(sketch.max_value().is_err());
}

/// S1: memory-optimal preset over {1, ..., 1000}
#[test]
fn scenario_s1_memory_optimal_integers() {
    let mut sketch = presets::memory_optimal(0.01).unwrap();
    for i in 1..=1000 {
        sketch.accept(f64::from(i)).unwrap();
    }
    let median = sketch.value_at_quantile(0.5).unwrap();
    assert!((500.0 * 0.99..=501.0 * 1.01).contains(&median));
    let min = sketch.min_value().unwrap();
    assert!((1.0 * 0.99..=1.0 * 1.01).contains(&min));
    let max = sketch.max_value().unwrap();
    assert!((1000.0 * 0.99..=1000.0 * 1.01).contains(&max));
}

/// S2: balanced preset over 10,000 uniform samples in (0,1] plus a single 0.0
#[test]
fn scenario_s2_balanced_uniform_with_zero() {
    let alpha = 0.1;
    let mut sketch = presets::balanced(alpha).unwrap();

    // deterministic stand-in for "10,000 uniform samples in (0,1]": a dense
    // arithmetic sequence covers the same range with reproducible ranks.
    let mut samples: Vec<f64> = (1..=10_000).map(|i| f64::from(i) / 10_000.0).collect();
    for &v in &samples {
        sketch.accept(v).unwrap();
    }
    sketch.accept(0.0).unwrap();
    samples.push(0.0);
    samples.sort_by(|a, b| a.partial_cmp(b).unwrap());

    assert_eq!(sketch.total_count(), 10_001);

    for q in [0.01, 0.25, 0.5, 0.75, 0.99] {
        let (lo, hi) = sorted_rank(&samples, q);
        let estimate = sketch.value_at_quantile(q).unwrap();
        if lo == 0.0 {
            assert!(estimate >= 0.0);
        } else {
            assert!(estimate >= lo * (1.0 - alpha) - 1e-9);
        }
        assert!(estimate <= hi * (1.0 + alpha) + 1e-9);
    }
}

/// S3: merging two half-ranges matches a single sketch over the full range
#[test]
fn scenario_s3_merge_matches_single_sketch() {
    let alpha = 0.02;
    let mapping = Mapping::quadratic(alpha).unwrap();
    let mut a = Sketch::new(mapping, StoreImpl::dense());
    let mut b = Sketch::new(mapping, StoreImpl::dense());
    for i in 1..=500 {
        a.accept(f64::from(i)).unwrap();
    }
    for i in 501..=1000 {
        b.accept(f64::from(i)).unwrap();
    }
    a.merge_with(&b).unwrap();

    let mut combined = Sketch::new(mapping, StoreImpl::dense());
    for i in 1..=1000 {
        combined.accept(f64::from(i)).unwrap();
    }

    let merged = a.value_at_quantile(0.9).unwrap();
    let reference = combined.value_at_quantile(0.9).unwrap();
    let relative_error = (merged - reference).abs() / reference;
    assert!(relative_error <= alpha + 1e-9);
}

/// S4: collapsing-lowest preset across a wide multiplicative spread keeps
/// high-quantile accuracy while bounding total bin count
#[test]
fn scenario_s4_collapsing_lowest_wide_spread() {
    let mut sketch = presets::memory_optimal_collapsing_lowest(0.01, 32).unwrap();
    for v in [1e-6, 1e-3, 1.0, 1e3, 1e6] {
        sketch.accept(v).unwrap();
    }
    assert_eq!(sketch.total_count(), 5);
    // The top quantile bin is never collapsed (only the lowest indices are),
    // so the maximum retains full relative accuracy regardless of the
    // collapse on the low end.
    let high = sketch.max_value().unwrap();
    assert!((high - 1e6).abs() / 1e6 <= 0.01 + 1e-9);
}

/// S5: negative accept and quantile-on-empty both fail
#[test]
fn scenario_s5_negative_accept_and_empty_quantile_fail() {
    let mut sketch = presets::balanced(0.01).unwrap();
    assert!(sketch.accept(-1.0).is_err());
    assert!(sketch.value_at_quantile(0.5).is_err());
}

/// S6: copying a populated sketch and mutating the copy leaves the
/// original's totals and quantiles unchanged
#[test]
fn scenario_s6_copy_after_bulk_insert_is_independent() {
    let mut original = presets::balanced(0.01).unwrap();
    for i in 0..100_000 {
        original.accept(f64::from(i % 9973) + 1.0).unwrap();
    }
    let snapshot_count = original.total_count();
    let snapshot_p50 = original.value_at_quantile(0.5).unwrap();
    let snapshot_p99 = original.value_at_quantile(0.99).unwrap();

    let mut copy = original.copy();
    for i in 0..100_000 {
        copy.accept(f64::from(i % 9973) + 1.0).unwrap();
    }

    assert_eq!(original.total_count(), snapshot_count);
    assert_eq!(original.value_at_quantile(0.5).unwrap(), snapshot_p50);
    assert_eq!(original.value_at_quantile(0.99).unwrap(), snapshot_p99);
    assert_eq!(copy.total_count(), snapshot_count * 2);
}

#[test]
fn merge_rejects_mismatched_mapping_configurations() {
    let mut a = presets::balanced(0.01).unwrap();
    let b = presets::balanced(0.02).unwrap();
    a.accept(1.0).unwrap();
    assert!(a.merge_with(&b).is_err());

    let mut c = presets::balanced(0.01).unwrap();
    let d = presets::fast(0.01).unwrap();
    c.accept(1.0).unwrap();
    assert!(c.merge_with(&d).is_err());
}

#[test]
fn ordering_independence_under_single_writer() {
    let mapping = Mapping::quadratic(0.01).unwrap();
    let values = [3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0];

    let mut forward = Sketch::new(mapping, StoreImpl::dense());
    for &v in &values {
        forward.accept(v).unwrap();
    }

    let mut reversed = Sketch::new(mapping, StoreImpl::dense());
    for &v in values.iter().rev() {
        reversed.accept(v).unwrap();
    }

    assert_eq!(forward.total_count(), reversed.total_count());
    assert_eq!(
        forward.value_at_quantile(0.5).unwrap(),
        reversed.value_at_quantile(0.5).unwrap()
    );
}
