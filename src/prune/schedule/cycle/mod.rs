//! Cyclic ramp methods.
//!
//! HalfCycle: `s = s_f * sin(pi/2 * (step mod C) / C)`, a sawtooth that rises
//! to `s_f` once per cycle and then resets.
//!
//! FullCycle: `s = s_f * |sin(pi/2 * step / C)|`, a slower oscillation without
//! the modulo reset.

#[cfg(test)]
mod proptests;

use std::f64::consts::FRAC_PI_2;

use super::RampSchedule;
use crate::prune::config::RampType;

impl RampSchedule {
    pub(super) fn half_cycle_sparsity_at_step(
        cycle_step: usize,
        final_sparsity: f32,
        step: usize,
    ) -> f32 {
        let phase = (step % cycle_step) as f64 / cycle_step as f64;
        (f64::from(final_sparsity) * (FRAC_PI_2 * phase).sin()) as f32
    }

    pub(super) fn full_cycle_sparsity_at_step(
        cycle_step: usize,
        final_sparsity: f32,
        step: usize,
    ) -> f32 {
        let phase = step as f64 / cycle_step as f64;
        (f64::from(final_sparsity) * (FRAC_PI_2 * phase).sin().abs()) as f32
    }

    /// Validate the cycle length.
    pub(super) fn cycle_validate(ramp_type: RampType, cycle_step: usize) -> Result<(), String> {
        if cycle_step == 0 {
            return Err(format!("ramp_cycle_step must be > 0 for the {ramp_type} ramp"));
        }
        Ok(())
    }
}
