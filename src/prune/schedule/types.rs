//! Type definitions for the sparsity schedule.

use serde::{Deserialize, Serialize};

use crate::prune::config::RampType;

/// Sparsity ramp with its window already resolved to absolute steps.
///
/// # Example
///
/// ```
/// use advprune::prune::{RampSchedule, RampType};
///
/// let schedule = RampSchedule::new(RampType::Linear, 0.0, 0.5, 100, 1100, 0).unwrap();
/// assert_eq!(schedule.compute_sparsity(100), 0.0);
/// assert!((schedule.compute_sparsity(600) - 0.25).abs() < 1e-6);
/// assert!((schedule.compute_sparsity(1100) - 0.5).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RampSchedule {
    /// Ramp curve.
    pub(crate) ramp_type: RampType,
    /// Sparsity at `start_step` for the linear ramp.
    pub(crate) initial_sparsity: f32,
    /// Target sparsity.
    pub(crate) final_sparsity: f32,
    /// Absolute window start.
    pub(crate) start_step: usize,
    /// Absolute window end (exclusive).
    pub(crate) end_step: usize,
    /// Cycle length for the cyclic ramps.
    pub(crate) ramp_cycle_step: usize,
}
