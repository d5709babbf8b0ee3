//! Main pruner configuration struct.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::prune::floor_fraction;

use super::{PruneGranularity, RampType};

/// Configuration consumed by the [`Pruner`](crate::prune::Pruner) and its
/// sparsity schedule.
///
/// `start_step` and `end_step` are fractions of `steps`; the pruner turns
/// them into absolute indices with [`start_step_index`](Self::start_step_index)
/// and [`end_step_index`](Self::end_step_index).
///
/// # Example
///
/// ```
/// use advprune::prune::{PrunerConfig, PruneGranularity, RampType};
///
/// let config = PrunerConfig::default()
///     .with_ramp_type(RampType::Linear)
///     .with_sparsity(0.0, 0.8)
///     .with_window(0.1, 0.6)
///     .with_steps(1000)
///     .with_prune_type(PruneGranularity::Unit);
///
/// assert_eq!(config.start_step_index(), 100);
/// assert_eq!(config.end_step_index(), 600);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PrunerConfig {
    /// Ramp the sparsity over a window instead of pruning once.
    ramping: bool,

    /// Ramp curve.
    ramp_type: RampType,

    /// Sparsity at the start of a linear ramp.
    initial_sparsity: f32,

    /// Target sparsity (also the single-shot sparsity).
    final_sparsity: f32,

    /// Window start as a fraction of `steps`.
    start_step: f32,

    /// Window end as a fraction of `steps`.
    end_step: f32,

    /// Cycle length in steps for the cyclic ramps.
    ramp_cycle_step: usize,

    /// Recompute masks every N steps while ramping.
    prune_freq: usize,

    /// Threshold across all layers at once.
    global_prune: bool,

    /// Granularity for local pruning.
    prune_type: PruneGranularity,

    /// Compound local pruning on the current mask.
    carry_mask: bool,

    /// Total training steps.
    steps: usize,
}

impl Default for PrunerConfig {
    fn default() -> Self {
        Self {
            ramping: true,
            ramp_type: RampType::default(),
            initial_sparsity: 0.0,
            final_sparsity: 0.5,
            start_step: 0.0,
            end_step: 0.5,
            ramp_cycle_step: 1000,
            prune_freq: 100,
            global_prune: false,
            prune_type: PruneGranularity::default(),
            carry_mask: false,
            steps: 10_000,
        }
    }
}

impl PrunerConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a pruning section from YAML and validate it.
    ///
    /// # Errors
    ///
    /// An unknown `prune_type` or `ramp_type` name fails with
    /// [`Error::UnsupportedPruneType`] or [`Error::UnsupportedRampType`].
    /// Other malformed input fails with [`Error::Yaml`].
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let value: serde_yaml::Value = serde_yaml::from_str(yaml)?;
        Self::check_names(&value)?;
        let config: Self = serde_yaml::from_value(value)?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve the `prune_type` and `ramp_type` names of a raw pruning
    /// section through `FromStr`, so unknown names surface as their own
    /// errors instead of a generic parse failure.
    pub(crate) fn check_names(section: &serde_yaml::Value) -> Result<()> {
        if let Some(name) = section.get("prune_type").and_then(serde_yaml::Value::as_str) {
            name.parse::<PruneGranularity>()?;
        }
        if let Some(name) = section.get("ramp_type").and_then(serde_yaml::Value::as_str) {
            name.parse::<RampType>()?;
        }
        Ok(())
    }

    /// Enable ramping, or prune once at the window start.
    pub fn with_ramping(mut self, ramping: bool) -> Self {
        self.ramping = ramping;
        self
    }

    /// Set the ramp curve.
    pub fn with_ramp_type(mut self, ramp_type: RampType) -> Self {
        self.ramp_type = ramp_type;
        self
    }

    /// Set initial and final sparsity.
    pub fn with_sparsity(mut self, initial: f32, final_sparsity: f32) -> Self {
        self.initial_sparsity = initial;
        self.final_sparsity = final_sparsity;
        self
    }

    /// Set the pruning window as fractions of the total steps.
    pub fn with_window(mut self, start: f32, end: f32) -> Self {
        self.start_step = start;
        self.end_step = end;
        self
    }

    /// Set the cycle length of the cyclic ramps.
    pub fn with_ramp_cycle_step(mut self, cycle: usize) -> Self {
        self.ramp_cycle_step = cycle;
        self
    }

    /// Set the mask recompute cadence.
    pub fn with_prune_freq(mut self, freq: usize) -> Self {
        self.prune_freq = freq;
        self
    }

    /// Select global (true) or local (false) thresholding.
    pub fn with_global_prune(mut self, global: bool) -> Self {
        self.global_prune = global;
        self
    }

    /// Set the local pruning granularity.
    pub fn with_prune_type(mut self, prune_type: PruneGranularity) -> Self {
        self.prune_type = prune_type;
        self
    }

    /// Enable or disable compounding on the current mask.
    pub fn with_carry_mask(mut self, carry: bool) -> Self {
        self.carry_mask = carry;
        self
    }

    /// Set the total number of training steps.
    pub fn with_steps(mut self, steps: usize) -> Self {
        self.steps = steps;
        self
    }

    pub fn ramping(&self) -> bool {
        self.ramping
    }

    pub fn ramp_type(&self) -> RampType {
        self.ramp_type
    }

    pub fn initial_sparsity(&self) -> f32 {
        self.initial_sparsity
    }

    pub fn final_sparsity(&self) -> f32 {
        self.final_sparsity
    }

    /// Window start as a fraction of `steps`.
    pub fn start_step(&self) -> f32 {
        self.start_step
    }

    /// Window end as a fraction of `steps`.
    pub fn end_step(&self) -> f32 {
        self.end_step
    }

    pub fn ramp_cycle_step(&self) -> usize {
        self.ramp_cycle_step
    }

    pub fn prune_freq(&self) -> usize {
        self.prune_freq
    }

    pub fn global_prune(&self) -> bool {
        self.global_prune
    }

    pub fn prune_type(&self) -> PruneGranularity {
        self.prune_type
    }

    pub fn carry_mask(&self) -> bool {
        self.carry_mask
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Absolute window start, `floor(start_step * steps)`.
    pub fn start_step_index(&self) -> usize {
        floor_fraction(self.start_step, self.steps)
    }

    /// Absolute window end, `floor(end_step * steps)`.
    pub fn end_step_index(&self) -> usize {
        floor_fraction(self.end_step, self.steps)
    }

    /// Validate the configuration.
    ///
    /// Ramp-specific checks only apply when `ramping` is set, since single-shot
    /// pruning reads nothing but `start_step` and `final_sparsity`.
    pub fn validate(&self) -> Result<()> {
        check_unit_interval("initial_sparsity", self.initial_sparsity)?;
        check_unit_interval("final_sparsity", self.final_sparsity)?;
        check_unit_interval("start_step", self.start_step)?;
        check_unit_interval("end_step", self.end_step)?;

        if self.steps == 0 {
            return Err(Error::config("steps", "must be > 0"));
        }
        if self.start_step > self.end_step {
            return Err(Error::config(
                "start_step",
                format!(
                    "start_step ({}) must not exceed end_step ({})",
                    self.start_step, self.end_step
                ),
            ));
        }

        if !self.ramping {
            return Ok(());
        }

        if self.prune_freq == 0 {
            return Err(Error::config("prune_freq", "must be > 0 when ramping"));
        }
        if self.ramp_type.is_cyclic() && self.ramp_cycle_step == 0 {
            return Err(Error::config(
                "ramp_cycle_step",
                format!("must be > 0 for the {} ramp", self.ramp_type),
            ));
        }
        if self.ramp_type == RampType::Linear && self.end_step_index() <= self.start_step_index() {
            return Err(Error::config(
                "end_step",
                format!(
                    "linear ramp needs end step ({}) greater than start step ({})",
                    self.end_step_index(),
                    self.start_step_index()
                ),
            ));
        }

        Ok(())
    }
}

fn check_unit_interval(field: &str, value: f32) -> Result<()> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(Error::config(field, format!("{value} must be between 0.0 and 1.0")));
    }
    Ok(())
}
