//! Sparsity schedule definitions
//!
//! Maps a training step to a target sparsity:
//! - Linear: interpolation from initial to final sparsity over the window
//! - HalfCycle: quarter sine that restarts every `ramp_cycle_step` steps
//! - FullCycle: absolute sine over the raw step, no restart
//!
//! The curves themselves are not clamped. The pruner only evaluates them
//! inside its active window, where linear stays between initial and final
//! sparsity and the cyclic ramps stay within `[0, final_sparsity]`.

mod cycle;
mod linear;
mod types;

pub use types::RampSchedule;

use crate::error::{Error, Result};
use crate::prune::config::{PrunerConfig, RampType};

impl RampSchedule {
    /// Create a schedule, rejecting parameters that leave a curve undefined.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] when a linear ramp has an empty window
    /// or a cyclic ramp has a zero cycle length.
    pub fn new(
        ramp_type: RampType,
        initial_sparsity: f32,
        final_sparsity: f32,
        start_step: usize,
        end_step: usize,
        ramp_cycle_step: usize,
    ) -> Result<Self> {
        let schedule = Self {
            ramp_type,
            initial_sparsity,
            final_sparsity,
            start_step,
            end_step,
            ramp_cycle_step,
        };
        schedule.validate()?;
        Ok(schedule)
    }

    /// Build the schedule described by a pruner configuration.
    pub fn from_config(config: &PrunerConfig) -> Result<Self> {
        Self::new(
            config.ramp_type(),
            config.initial_sparsity(),
            config.final_sparsity(),
            config.start_step_index(),
            config.end_step_index(),
            config.ramp_cycle_step(),
        )
    }

    /// Compute the target sparsity at a given training step.
    ///
    /// # Arguments
    ///
    /// * `step` - Current training step
    pub fn compute_sparsity(&self, step: usize) -> f32 {
        match self.ramp_type {
            RampType::Linear => Self::linear_sparsity_at_step(
                self.start_step,
                self.end_step,
                self.initial_sparsity,
                self.final_sparsity,
                step,
            ),
            RampType::HalfCycle => {
                Self::half_cycle_sparsity_at_step(self.ramp_cycle_step, self.final_sparsity, step)
            }
            RampType::FullCycle => {
                Self::full_cycle_sparsity_at_step(self.ramp_cycle_step, self.final_sparsity, step)
            }
        }
    }

    /// Check if `step` lies in the half-open window `[start_step, end_step)`.
    pub fn in_window(&self, step: usize) -> bool {
        self.start_step <= step && step < self.end_step
    }

    pub fn ramp_type(&self) -> RampType {
        self.ramp_type
    }

    pub fn start_step(&self) -> usize {
        self.start_step
    }

    pub fn end_step(&self) -> usize {
        self.end_step
    }

    pub fn final_sparsity(&self) -> f32 {
        self.final_sparsity
    }

    /// Check that the selected curve is defined for every step.
    pub fn validate(&self) -> Result<()> {
        match self.ramp_type {
            RampType::Linear => Self::linear_validate(self.start_step, self.end_step)
                .map_err(|message| Error::config("end_step", message)),
            RampType::HalfCycle | RampType::FullCycle => {
                Self::cycle_validate(self.ramp_type, self.ramp_cycle_step)
                    .map_err(|message| Error::config("ramp_cycle_step", message))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_resolves_window() {
        // TEST_ID: SCHED-001
        let config = PrunerConfig::default().with_window(0.1, 0.6).with_steps(1000);
        let schedule = RampSchedule::from_config(&config).unwrap();
        assert_eq!(schedule.start_step(), 100);
        assert_eq!(schedule.end_step(), 600);
        assert_eq!(schedule.ramp_type(), RampType::Linear);
    }

    #[test]
    fn test_in_window_half_open() {
        // TEST_ID: SCHED-002
        // FALSIFIES: window includes end_step
        let schedule = RampSchedule::new(RampType::Linear, 0.0, 0.5, 10, 20, 0).unwrap();
        assert!(!schedule.in_window(9));
        assert!(schedule.in_window(10));
        assert!(schedule.in_window(19));
        assert!(!schedule.in_window(20), "SCHED-002 FALSIFIED: end_step must be excluded");
    }

    #[test]
    fn test_new_rejects_undefined_curves() {
        // TEST_ID: SCHED-003
        assert!(RampSchedule::new(RampType::Linear, 0.0, 0.5, 10, 10, 0).is_err());
        assert!(RampSchedule::new(RampType::HalfCycle, 0.0, 0.5, 0, 0, 0).is_err());
        assert!(RampSchedule::new(RampType::FullCycle, 0.0, 0.5, 0, 0, 0).is_err());
        assert!(RampSchedule::new(RampType::FullCycle, 0.0, 0.5, 0, 0, 10).is_ok());
    }
}
