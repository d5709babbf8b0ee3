//! Unit tests for magnitude pruning.

use super::*;
use ndarray::{array, Array, Axis};

fn count_zeros(mask: &ArrayD<f32>) -> usize {
    mask.iter().filter(|&&m| m == 0.0).count()
}

fn grid_4x3() -> ArrayD<f32> {
    array![[1.0_f32, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0], [10.0, 11.0, 12.0]].into_dyn()
}

// =========================================================================
// Weight Granularity Tests
// =========================================================================

#[test]
fn test_weight_half_drops_smallest_per_output() {
    // TEST_ID: MAG-001
    // n = 3 elements per output, rank floor(0.5 * 3) = 1: the smallest
    // element of every output row falls strictly below its threshold.
    let w = grid_4x3();
    let mask = prune(w.view(), 0.5, PruneGranularity::Weight, Device::Cpu).unwrap();
    let expected =
        array![[0.0_f32, 1.0, 1.0], [0.0, 1.0, 1.0], [0.0, 1.0, 1.0], [0.0, 1.0, 1.0]].into_dyn();
    assert_eq!(mask, expected, "MAG-001 FALSIFIED: got {mask:?}");
}

#[test]
fn test_weight_uses_magnitude_not_sign() {
    // TEST_ID: MAG-002
    let w = array![[-9.0_f32, 0.1, -0.2, 5.0]].into_dyn();
    let mask = prune(w.view(), 0.5, PruneGranularity::Weight, Device::Cpu).unwrap();
    assert_eq!(mask, array![[1.0_f32, 0.0, 0.0, 1.0]].into_dyn(), "MAG-002 FALSIFIED");
}

#[test]
fn test_weight_thresholds_are_per_output() {
    // TEST_ID: MAG-003
    // FALSIFIES: a single threshold shared across output features
    let w = array![[100.0_f32, 200.0], [1.0, 2.0]].into_dyn();
    let mask = prune(w.view(), 0.5, PruneGranularity::Weight, Device::Cpu).unwrap();
    assert_eq!(mask, array![[0.0_f32, 1.0], [0.0, 1.0]].into_dyn(), "MAG-003 FALSIFIED");
}

#[test]
fn test_weight_zero_fraction_keeps_everything() {
    // TEST_ID: MAG-004
    // rank 0 is the row minimum; nothing is strictly below it
    let w = grid_4x3();
    let mask = prune(w.view(), 0.0, PruneGranularity::Weight, Device::Cpu).unwrap();
    assert_eq!(count_zeros(&mask), 0, "MAG-004 FALSIFIED: got {mask:?}");
}

#[test]
fn test_weight_full_fraction_drops_everything() {
    // TEST_ID: MAG-005
    // FALSIFIES: rank == population size indexes out of range
    let w = grid_4x3();
    let mask = prune(w.view(), 1.0, PruneGranularity::Weight, Device::Cpu).unwrap();
    assert_eq!(count_zeros(&mask), 12, "MAG-005 FALSIFIED: got {mask:?}");
}

#[test]
fn test_weight_ties_at_threshold_are_kept() {
    // TEST_ID: MAG-006
    let w = array![[1.0_f32, 1.0, 1.0, 1.0]].into_dyn();
    let mask = prune(w.view(), 0.75, PruneGranularity::Weight, Device::Cpu).unwrap();
    assert_eq!(count_zeros(&mask), 0, "MAG-006 FALSIFIED: strict < keeps ties");
}

#[test]
fn test_weight_conv_shape_preserved() {
    // TEST_ID: MAG-007
    // (out=2, c=2, kh=2, kw=2): 8 elements per output, rank floor(0.25 * 8) = 2
    let w = Array::from_shape_fn((2, 2, 2, 2), |(o, c, h, k)| {
        (o * 8 + c * 4 + h * 2 + k) as f32 + 1.0
    })
    .into_dyn();
    let mask = prune(w.view(), 0.25, PruneGranularity::Weight, Device::Cpu).unwrap();
    assert_eq!(mask.shape(), &[2, 2, 2, 2]);
    for output in mask.axis_iter(Axis(0)) {
        assert_eq!(output.iter().filter(|&&m| m == 0.0).count(), 2, "MAG-007 FALSIFIED");
    }
    assert_eq!(mask[[0, 0, 0, 0]], 0.0);
    assert_eq!(mask[[0, 0, 0, 1]], 0.0);
    assert_eq!(mask[[0, 0, 1, 0]], 1.0);
}

#[test]
fn test_weight_non_contiguous_view() {
    // TEST_ID: MAG-008
    // transposed storage must be read in logical order
    let w = array![[1.0_f32, 4.0], [2.0, 5.0], [3.0, 6.0]].reversed_axes().into_dyn();
    // logical rows: [1, 2, 3] and [4, 5, 6]
    let mask = prune(w.view(), 0.5, PruneGranularity::Weight, Device::Cpu).unwrap();
    assert_eq!(mask, array![[0.0_f32, 1.0, 1.0], [0.0, 1.0, 1.0]].into_dyn(), "MAG-008 FALSIFIED");
}

// =========================================================================
// Unit Granularity Tests
// =========================================================================

#[test]
fn test_unit_half_zeroes_lowest_norm_units() {
    // TEST_ID: MAG-010
    // 4 units, rank floor(0.5 * 4) = 2: the two smallest-norm rows go
    let w = grid_4x3();
    let mask = prune(w.view(), 0.5, PruneGranularity::Unit, Device::Cpu).unwrap();
    let expected =
        array![[0.0_f32, 0.0, 0.0], [0.0, 0.0, 0.0], [1.0, 1.0, 1.0], [1.0, 1.0, 1.0]].into_dyn();
    assert_eq!(mask, expected, "MAG-010 FALSIFIED: got {mask:?}");
}

#[test]
fn test_unit_ranks_by_l2_norm() {
    // TEST_ID: MAG-011
    // row 0 norm 5 (3-4), row 1 norm ~4.24 (3-3), row 2 norm 6 (0-6)
    let w = array![[3.0_f32, -4.0], [3.0, 3.0], [0.0, 6.0]].into_dyn();
    let mask = prune(w.view(), 0.34, PruneGranularity::Unit, Device::Cpu).unwrap();
    assert_eq!(
        mask,
        array![[1.0_f32, 1.0], [0.0, 0.0], [1.0, 1.0]].into_dyn(),
        "MAG-011 FALSIFIED: got {mask:?}"
    );
}

#[test]
fn test_unit_full_fraction_drops_all_units() {
    // TEST_ID: MAG-012
    let w = grid_4x3();
    let mask = prune(w.view(), 1.0, PruneGranularity::Unit, Device::Cpu).unwrap();
    assert_eq!(count_zeros(&mask), 12, "MAG-012 FALSIFIED");
}

#[test]
fn test_unit_zero_fraction_keeps_all_units() {
    // TEST_ID: MAG-013
    let w = grid_4x3();
    let mask = prune(w.view(), 0.0, PruneGranularity::Unit, Device::Cpu).unwrap();
    assert_eq!(count_zeros(&mask), 0, "MAG-013 FALSIFIED");
}

// =========================================================================
// Input Validation Tests
// =========================================================================

#[test]
fn test_invalid_fraction_rejected() {
    // TEST_ID: MAG-020
    let w = grid_4x3();
    for fraction in [-0.1_f32, 1.01, f32::NAN, f32::INFINITY] {
        let err = prune(w.view(), fraction, PruneGranularity::Weight, Device::Cpu).unwrap_err();
        assert!(
            matches!(err, Error::InvalidFraction(_)),
            "MAG-020 FALSIFIED: fraction {fraction} gave {err:?}"
        );
    }
}

#[test]
fn test_empty_and_scalar_weights_keep_all() {
    // TEST_ID: MAG-021
    let empty = ArrayD::<f32>::zeros(IxDyn(&[0, 3]));
    let mask = prune(empty.view(), 0.5, PruneGranularity::Weight, Device::Cpu).unwrap();
    assert_eq!(mask.shape(), &[0, 3]);

    let scalar = ArrayD::from_elem(IxDyn(&[]), 2.0_f32);
    let mask = prune(scalar.view(), 0.5, PruneGranularity::Unit, Device::Cpu).unwrap();
    assert_eq!(mask.shape(), &[] as &[usize]);
    assert_eq!(count_zeros(&mask), 0);
}

#[test]
fn test_parallel_device_matches_cpu() {
    // TEST_ID: MAG-022
    let w = Array::from_shape_fn((64, 128), |(o, i)| (((o * 131 + i * 71) % 997) as f32) - 498.0)
        .into_dyn();
    for granularity in [PruneGranularity::Weight, PruneGranularity::Unit] {
        let cpu = prune(w.view(), 0.6, granularity, Device::Cpu).unwrap();
        let par = prune(w.view(), 0.6, granularity, Device::Parallel).unwrap();
        assert_eq!(cpu, par, "MAG-022 FALSIFIED for {granularity}");
    }
}
