//! Property-based tests for the cyclic ramps.

use crate::prune::config::RampType;
use crate::prune::schedule::RampSchedule;
use proptest::prelude::*;

proptest! {
    /// HalfCycle stays within [0, final] for every step
    #[test]
    fn half_cycle_bounded(
        cycle in 1usize..5000,
        final_val in 0.0f32..=1.0,
        step in 0usize..1_000_000,
    ) {
        let schedule = RampSchedule::new(RampType::HalfCycle, 0.0, final_val, 0, 0, cycle).unwrap();
        let sparsity = schedule.compute_sparsity(step);
        prop_assert!(sparsity >= 0.0);
        prop_assert!(sparsity <= final_val + 1e-6);
    }

    /// FullCycle stays within [0, final] for every step
    #[test]
    fn full_cycle_bounded(
        cycle in 1usize..5000,
        final_val in 0.0f32..=1.0,
        step in 0usize..1_000_000,
    ) {
        let schedule = RampSchedule::new(RampType::FullCycle, 0.0, final_val, 0, 0, cycle).unwrap();
        let sparsity = schedule.compute_sparsity(step);
        prop_assert!(sparsity >= 0.0);
        prop_assert!(sparsity <= final_val + 1e-6);
    }
}
