//! Training loop configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Training hyperparameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrainingConfig {
    /// Total optimizer steps; `None` means `epochs × batches`.
    pub steps: Option<usize>,
    /// Passes over the training source when `steps` is unset.
    pub epochs: usize,
    /// Evaluate on the test source every `eval_step` steps (and at step 0).
    pub eval_step: usize,
    /// SGD learning rate.
    pub lr: f32,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self { steps: None, epochs: 1, eval_step: 100, lr: 0.01 }
    }
}

impl TrainingConfig {
    pub fn with_steps(mut self, steps: usize) -> Self {
        self.steps = Some(steps);
        self
    }

    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    pub fn with_eval_step(mut self, eval_step: usize) -> Self {
        self.eval_step = eval_step;
        self
    }

    pub fn with_lr(mut self, lr: f32) -> Self {
        self.lr = lr;
        self
    }

    /// Steps the run will take over a source of `num_batches` batches.
    pub fn total_steps(&self, num_batches: usize) -> usize {
        self.steps.unwrap_or(self.epochs * num_batches)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.steps == Some(0) {
            return Err(Error::config("steps", "must be > 0 when set"));
        }
        if self.steps.is_none() && self.epochs == 0 {
            return Err(Error::config("epochs", "must be > 0 when steps is unset"));
        }
        if self.eval_step == 0 {
            return Err(Error::config("eval_step", "must be > 0"));
        }
        if !self.lr.is_finite() || self.lr <= 0.0 {
            return Err(Error::config("lr", format!("must be finite and > 0, got {}", self.lr)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_steps_defaults_to_epochs_times_batches() {
        let config = TrainingConfig::default().with_epochs(3);
        assert_eq!(config.total_steps(7), 21);
        assert_eq!(config.with_steps(5).total_steps(7), 5);
    }

    #[test]
    fn test_validate() {
        assert!(TrainingConfig::default().validate().is_ok());
        assert!(TrainingConfig::default().with_lr(0.0).validate().is_err());
        assert!(TrainingConfig::default().with_eval_step(0).validate().is_err());
        assert!(TrainingConfig::default().with_epochs(0).validate().is_err());
        assert!(TrainingConfig::default().with_epochs(0).with_steps(10).validate().is_ok());
        assert!(TrainingConfig::default().with_steps(0).validate().is_err());
    }
}
