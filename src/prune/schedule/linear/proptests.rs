//! Property-based tests for the linear ramp.

use crate::prune::config::RampType;
use crate::prune::schedule::RampSchedule;
use proptest::prelude::*;

proptest! {
    /// Linear sparsity never decreases inside the window when final >= initial
    #[test]
    fn linear_monotonic(
        start in 0usize..1000,
        duration in 1usize..1000,
        initial in 0.0f32..0.5,
        final_val in 0.5f32..1.0,
    ) {
        let schedule = RampSchedule::new(
            RampType::Linear, initial, final_val, start, start + duration, 0,
        ).unwrap();

        let mut prev = initial;
        for step in start..(start + duration) {
            let sparsity = schedule.compute_sparsity(step);
            prop_assert!(sparsity >= prev - 1e-5);
            prev = sparsity;
        }
    }

    /// Inside the window the ramp stays between initial and final
    #[test]
    fn linear_bounded_in_window(
        start in 0usize..100,
        duration in 1usize..100,
        initial in 0.0f32..0.5,
        final_val in 0.5f32..1.0,
        offset in 0usize..100,
    ) {
        let schedule = RampSchedule::new(
            RampType::Linear, initial, final_val, start, start + duration, 0,
        ).unwrap();

        let step = start + offset % duration;
        let sparsity = schedule.compute_sparsity(step);
        prop_assert!(sparsity >= initial - 1e-6);
        prop_assert!(sparsity <= final_val + 1e-6);
    }
}
