//! Adversarial training with scheduled magnitude pruning.
//!
//! - [`prune`]: the magnitude pruning function, sparsity ramps and the [`Pruner`](prune::Pruner)
//! - [`attack`]: projected gradient descent adversarial examples
//! - [`train`]: a training driver tying both together
//! - [`nn`]: a small mask-bearing reference network
//! - [`config`]: YAML run configuration
//!
//! # Example
//!
//! ```
//! use advprune::nn::MaskedMlp;
//! use advprune::prune::{PrunableModel, Pruner, PrunerConfig, SparsityReport};
//! use advprune::Device;
//!
//! let mut model = MaskedMlp::new(&[8, 16, 4], 0)?;
//! let config = PrunerConfig::default()
//!     .with_steps(100)
//!     .with_sparsity(0.0, 0.5)
//!     .with_window(0.0, 0.5)
//!     .with_prune_freq(10);
//! let mut pruner = Pruner::new(config, &model, Device::Cpu)?;
//!
//! for step in 0..100 {
//!     // forward / backward / optimizer update ...
//!     pruner.step(&mut model, step)?;
//! }
//!
//! // last rewrite at step 40 targets 0.4
//! let report = SparsityReport::from_model(&model);
//! assert!(report.achieved_sparsity > 0.3);
//! assert_eq!(model.masks().len(), 2);
//! # Ok::<(), advprune::Error>(())
//! ```

pub mod attack;
pub mod config;
pub mod device;
pub mod error;
pub mod nn;
pub mod prune;
pub mod train;

pub use device::Device;
pub use error::{Error, Result};
