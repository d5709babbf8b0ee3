//! Pruner orchestration
//!
//! Drives the sparsity schedule and the magnitude pruning function across all
//! prunable layers of a model. [`Pruner::step`] is called once per training
//! iteration and rewrites masks in place when the schedule says so.

mod global;
mod local;


use ndarray::ArrayD;
use tracing::{debug, info};

use crate::device::Device;
use crate::error::{Error, Result};
use crate::prune::config::PrunerConfig;
use crate::prune::prunable::PrunableModel;
use crate::prune::report::SparsityReport;
use crate::prune::schedule::RampSchedule;

/// Ramping or single-shot operation, fixed at construction.
#[derive(Debug, Clone)]
enum Mode {
    Ramping(RampSchedule),
    SingleShot,
}

/// Scheduled magnitude pruner.
///
/// # Example
///
/// ```
/// use advprune::nn::MaskedMlp;
/// use advprune::prune::{Pruner, PrunerConfig};
/// use advprune::Device;
///
/// let mut model = MaskedMlp::new(&[4, 8, 2], 7)?;
/// let config = PrunerConfig::default().with_steps(1000).with_sparsity(0.0, 0.8);
/// let mut pruner = Pruner::new(config, &model, Device::Cpu)?;
/// for step in 0..1000 {
///     // forward / backward / optimizer step ...
///     pruner.step(&mut model, step)?;
/// }
/// assert_eq!(pruner.last_prune_step(), Some(400));
/// # Ok::<(), advprune::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Pruner {
    /// Validated configuration.
    config: PrunerConfig,
    /// Ramp schedule when ramping.
    mode: Mode,
    /// Absolute window start.
    start_step: usize,
    /// Absolute window end.
    end_step: usize,
    /// Masks as they were when the pruner was built.
    initial_masks: Vec<ArrayD<f32>>,
    /// Execution context for threshold computation.
    device: Device,
    /// Step at which masks were last rewritten.
    last_prune_step: Option<usize>,
    /// Sparsity requested at `last_prune_step`.
    last_target: Option<f32>,
}

impl Pruner {
    /// Create a pruner for `model`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the configuration fails validation,
    /// including ramp curves that would be undefined for some step.
    pub fn new<M: PrunableModel + ?Sized>(
        config: PrunerConfig,
        model: &M,
        device: Device,
    ) -> Result<Self> {
        config.validate()?;

        let mode = if config.ramping() {
            Mode::Ramping(RampSchedule::from_config(&config)?)
        } else {
            Mode::SingleShot
        };
        let initial_masks = model.masks();

        debug!(
            start_step = config.start_step_index(),
            end_step = config.end_step_index(),
            ramping = config.ramping(),
            global = config.global_prune(),
            layers = initial_masks.len(),
            device = device.name(),
            "pruner created"
        );

        Ok(Self {
            start_step: config.start_step_index(),
            end_step: config.end_step_index(),
            config,
            mode,
            initial_masks,
            device,
            last_prune_step: None,
            last_target: None,
        })
    }

    /// Advance the pruner by one training step.
    ///
    /// Masks are mutated in place; the model is handed back for chaining.
    pub fn step<'m, M: PrunableModel + ?Sized>(
        &mut self,
        model: &'m mut M,
        step: usize,
    ) -> Result<&'m mut M> {
        if self.config.ramping() {
            self.ramping_prune(model, step)
        } else {
            self.single_shot_prune(model, step)
        }
    }

    /// Prune to the scheduled sparsity every `prune_freq` steps inside
    /// `[start_step, end_step)`. Masks persist unchanged between updates.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] when the pruner was built for
    /// single-shot pruning.
    pub fn ramping_prune<'m, M: PrunableModel + ?Sized>(
        &mut self,
        model: &'m mut M,
        step: usize,
    ) -> Result<&'m mut M> {
        let Mode::Ramping(schedule) = &self.mode else {
            return Err(Error::config("ramping", "pruner was built for single-shot pruning"));
        };

        let mut target = schedule.compute_sparsity(step);
        // Unreachable under the half-open window below; kept so that a
        // closed window only needs the range to change.
        if step == self.end_step {
            target = self.config.final_sparsity();
        }

        if schedule.in_window(step) && step % self.config.prune_freq() == 0 {
            self.apply(model, target, step)?;
        }
        Ok(model)
    }

    /// Prune once, to `final_sparsity`, at exactly `start_step`.
    pub fn single_shot_prune<'m, M: PrunableModel + ?Sized>(
        &mut self,
        model: &'m mut M,
        step: usize,
    ) -> Result<&'m mut M> {
        if step == self.start_step {
            self.apply(model, self.config.final_sparsity(), step)?;
        }
        Ok(model)
    }

    fn apply<M: PrunableModel + ?Sized>(
        &mut self,
        model: &mut M,
        target: f32,
        step: usize,
    ) -> Result<()> {
        let strategy = if self.config.global_prune() { "global" } else { "local" };
        debug!(step, target, strategy, "rewriting masks");

        if self.config.global_prune() {
            self.global_prune(model, target)?;
        } else {
            self.local_prune(model, target)?;
        }
        self.last_prune_step = Some(step);
        self.last_target = Some(target);

        let report = SparsityReport::from_model(model);
        info!(
            step,
            target,
            strategy,
            sparsity = report.achieved_sparsity,
            pruned = report.parameters_pruned,
            "pruned"
        );
        Ok(())
    }

    /// Target sparsity the schedule asks for at `step`, if masks would be
    /// rewritten there.
    pub fn scheduled_target(&self, step: usize) -> Option<f32> {
        match &self.mode {
            Mode::Ramping(schedule) => (schedule.in_window(step)
                && step % self.config.prune_freq() == 0)
                .then(|| schedule.compute_sparsity(step)),
            Mode::SingleShot => (step == self.start_step).then(|| self.config.final_sparsity()),
        }
    }

    /// Check if no later step can rewrite masks.
    pub fn is_complete(&self, step: usize) -> bool {
        match self.mode {
            Mode::Ramping(_) => step + 1 >= self.end_step,
            Mode::SingleShot => step >= self.start_step,
        }
    }

    pub fn config(&self) -> &PrunerConfig {
        &self.config
    }

    pub fn start_step(&self) -> usize {
        self.start_step
    }

    pub fn end_step(&self) -> usize {
        self.end_step
    }

    pub fn device(&self) -> Device {
        self.device
    }

    /// Masks captured at construction. Not read by the schedule.
    pub fn initial_masks(&self) -> &[ArrayD<f32>] {
        &self.initial_masks
    }

    /// Step at which masks were last rewritten.
    pub fn last_prune_step(&self) -> Option<usize> {
        self.last_prune_step
    }

    /// Sparsity requested at the last rewrite.
    pub fn last_target(&self) -> Option<f32> {
        self.last_target
    }
}
