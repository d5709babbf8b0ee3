//! Property-based tests for magnitude pruning.

use super::*;
use ndarray::Axis;
use proptest::prelude::*;

/// Weights with pairwise-distinct magnitudes, shaped `(out, n)`.
fn distinct_weights() -> impl Strategy<Value = ArrayD<f32>> {
    (1usize..8, 1usize..8).prop_flat_map(|(out, n)| {
        prop::collection::btree_set(1i32..100_000, out * n)
            .prop_map(|set| set.into_iter().collect::<Vec<_>>())
            .prop_shuffle()
            .prop_map(move |values| {
                let data: Vec<f32> = values
                    .into_iter()
                    .map(|v| if v % 3 == 0 { -(v as f32) } else { v as f32 })
                    .collect();
                ArrayD::from_shape_vec(IxDyn(&[out, n]), data).unwrap()
            })
    })
}

fn fractions() -> impl Strategy<Value = f32> {
    prop_oneof![Just(0.0_f32), Just(0.25), Just(0.5), Just(0.75)]
}

proptest! {
    /// Every output feature loses exactly floor(f * n) elements
    #[test]
    fn weight_zeros_per_output(w in distinct_weights(), f in fractions()) {
        let n = w.shape()[1];
        let mask = prune(w.view(), f, PruneGranularity::Weight, Device::Cpu).unwrap();
        let expected = (f * n as f32).floor() as usize;
        for row in mask.axis_iter(Axis(0)) {
            prop_assert_eq!(row.iter().filter(|&&m| m == 0.0).count(), expected);
        }
    }

    /// Exactly floor(f * units) units are zeroed, and zeroing is all-or-nothing
    #[test]
    fn unit_zeroed_rows(w in distinct_weights(), f in fractions()) {
        let out = w.shape()[0];
        let mask = prune(w.view(), f, PruneGranularity::Unit, Device::Cpu).unwrap();
        let mut zeroed = 0;
        for row in mask.axis_iter(Axis(0)) {
            let zeros = row.iter().filter(|&&m| m == 0.0).count();
            prop_assert!(zeros == 0 || zeros == row.len());
            if zeros == row.len() {
                zeroed += 1;
            }
        }
        prop_assert_eq!(zeroed, (f * out as f32).floor() as usize);
    }

    /// Masks are binary and shaped like their weight
    #[test]
    fn mask_is_binary(w in distinct_weights(), f in 0.0f32..=1.0) {
        for granularity in [PruneGranularity::Weight, PruneGranularity::Unit] {
            let mask = prune(w.view(), f, granularity, Device::Cpu).unwrap();
            prop_assert_eq!(mask.shape(), w.shape());
            prop_assert!(mask.iter().all(|&m| m == 0.0 || m == 1.0));
        }
    }
}
