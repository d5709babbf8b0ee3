//! Declarative run configuration
//!
//! A run is described by one YAML document:
//!
//! ```yaml
//! training:
//!   epochs: 10
//!   eval_step: 100
//!   lr: 0.05
//! pruning:
//!   ramp_type: half_cycle
//!   final_sparsity: 0.9
//!   ramp_cycle_step: 500
//! attack:
//!   eps: 0.1
//!   steps: 10
//! ```
//!
//! Every section and field is optional; omitted values take their defaults.
//! Leaving `attack` out trains on clean batches.

mod load;


pub use load::{load_config, parse_config};

use serde::{Deserialize, Serialize};

use crate::attack::PgdConfig;
use crate::error::Result;
use crate::prune::PrunerConfig;
use crate::train::TrainingConfig;

/// Complete configuration of an adversarial pruning run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    pub training: TrainingConfig,
    pub pruning: PrunerConfig,
    /// PGD settings; `None` disables adversarial training.
    pub attack: Option<PgdConfig>,
}

impl RunConfig {
    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        self.training.validate()?;
        self.pruning.validate()?;
        if let Some(attack) = &self.attack {
            attack.validate()?;
        }
        Ok(())
    }
}
