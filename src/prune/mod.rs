//! Training-time magnitude pruning
//!
//! This module progressively sparsifies mask-bearing layers during training:
//!
//! - **Magnitude pruning**: [`prune`] computes a keep/prune mask for one weight
//!   tensor, element-wise or unit-wise
//! - **Sparsity schedule**: [`RampSchedule`] maps a step to a target sparsity
//!   (linear, half-cycle or full-cycle ramp)
//! - **Pruner**: [`Pruner`] applies the schedule across a model once per
//!   training step, with global or per-layer thresholds
//! - **Mask check**: [`SparsityReport`] summarises the current masks
//!
//! # Example
//!
//! ```
//! use advprune::nn::MaskedMlp;
//! use advprune::prune::{Pruner, PrunerConfig, RampType};
//! use advprune::Device;
//!
//! let mut model = MaskedMlp::new(&[16, 32, 10], 0)?;
//!
//! let config = PrunerConfig::default()
//!     .with_ramp_type(RampType::Linear)
//!     .with_sparsity(0.0, 0.9)
//!     .with_window(0.1, 0.8)
//!     .with_prune_freq(50)
//!     .with_steps(10_000);
//!
//! let mut pruner = Pruner::new(config, &model, Device::detect())?;
//! for step in 0..10_000 {
//!     pruner.step(&mut model, step)?;
//! }
//! assert_eq!(pruner.last_prune_step(), Some(7950));
//! # Ok::<(), advprune::Error>(())
//! ```
//!
//! # References
//!
//! - Han, S., et al. (2015). Learning both weights and connections. NeurIPS.
//! - Zhu, M., & Gupta, S. (2017). To prune, or not to prune. arXiv:1710.01878.

mod config;
mod magnitude;
mod prunable;
mod pruner;
mod report;
mod schedule;

pub use config::{PruneGranularity, PrunerConfig, RampType};
pub use magnitude::prune;
pub use prunable::{check_mask_shape, mask_sparsity, Prunable, PrunableModel};
pub use pruner::Pruner;
pub use report::SparsityReport;
pub use schedule::RampSchedule;

/// `floor(fraction * count)`, with products that land within f32 rounding
/// of an integer snapped to it.
///
/// This deliberately departs from plain truncation: `0.7` stored as
/// `0.69999999` yields 7 of 10, and `0.29 × 100` yields rank 29 where a
/// bare `floor` of the float product gives 28.
pub(crate) fn floor_fraction(fraction: f32, count: usize) -> usize {
    let exact = f64::from(fraction) * count as f64;
    let nearest = exact.round();
    let value = if (exact - nearest).abs() <= exact.abs() * f64::from(f32::EPSILON) {
        nearest
    } else {
        exact.floor()
    };
    value.max(0.0) as usize
}
