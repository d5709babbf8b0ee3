//! Early stopping callback to halt training when the test loss plateaus

use tracing::info;

use super::traits::{CallbackAction, CallbackContext, TrainerCallback};

/// Stops training if the monitored loss has not improved by `min_delta`
/// for `patience` consecutive evaluations.
///
/// The test loss is monitored; evaluations without one fall back to the
/// last training loss.
///
/// # Example
///
/// ```rust
/// use advprune::train::callback::EarlyStopping;
///
/// let early_stop = EarlyStopping::new(5, 0.001);
/// assert_eq!(early_stop.best_loss(), f32::INFINITY);
/// ```
#[derive(Clone, Debug)]
pub struct EarlyStopping {
    patience: usize,
    min_delta: f32,
    best_loss: f32,
    evals_without_improvement: usize,
}

impl EarlyStopping {
    pub fn new(patience: usize, min_delta: f32) -> Self {
        Self { patience, min_delta, best_loss: f32::INFINITY, evals_without_improvement: 0 }
    }

    pub fn best_loss(&self) -> f32 {
        self.best_loss
    }

    /// Reset internal state
    pub fn reset(&mut self) {
        self.best_loss = f32::INFINITY;
        self.evals_without_improvement = 0;
    }

    fn check_improvement(&mut self, loss: f32) -> bool {
        if loss < self.best_loss - self.min_delta {
            self.best_loss = loss;
            self.evals_without_improvement = 0;
            true
        } else {
            self.evals_without_improvement += 1;
            false
        }
    }
}

impl TrainerCallback for EarlyStopping {
    fn on_evaluate(&mut self, ctx: &CallbackContext) -> CallbackAction {
        self.check_improvement(ctx.test_loss.unwrap_or(ctx.loss));

        if self.evals_without_improvement >= self.patience {
            info!(
                patience = self.patience,
                best_loss = self.best_loss,
                step = ctx.step,
                "early stopping: no improvement"
            );
            return CallbackAction::Stop;
        }
        CallbackAction::Continue
    }

    fn name(&self) -> &'static str {
        "EarlyStopping"
    }
}
