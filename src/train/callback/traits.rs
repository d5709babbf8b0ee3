//! Core traits and types for the callback system
//!
//! - `CallbackContext` - State passed to callbacks
//! - `CallbackAction` - Actions a callback can request
//! - `TrainerCallback` - The trait all callbacks implement

/// Context passed to callbacks with current training state
#[derive(Clone, Debug, Default)]
pub struct CallbackContext {
    /// Global step (0-indexed)
    pub step: usize,
    /// Total steps planned
    pub total_steps: usize,
    /// Current epoch (0-indexed)
    pub epoch: usize,
    /// Loss of the last training batch
    pub loss: f32,
    /// Running training accuracy
    pub train_accuracy: f32,
    /// Learning rate
    pub lr: f32,
    /// Overall mask sparsity after the pruner ran
    pub sparsity: f32,
    /// Test loss (set for evaluation events)
    pub test_loss: Option<f32>,
    /// Test accuracy (set for evaluation events)
    pub test_accuracy: Option<f32>,
    /// Training duration in seconds
    pub elapsed_secs: f64,
}

/// Action to take after a callback
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallbackAction {
    /// Continue training normally
    Continue,
    /// Stop training
    Stop,
}

/// Trait for training callbacks
///
/// All methods have default no-op implementations, so you only need to
/// implement the events you care about.
pub trait TrainerCallback: Send {
    /// Called before the first step
    fn on_train_begin(&mut self, _ctx: &CallbackContext) -> CallbackAction {
        CallbackAction::Continue
    }

    /// Called after training ends, including early stops
    fn on_train_end(&mut self, _ctx: &CallbackContext) {}

    /// Called after each step, once the pruner has run
    fn on_step_end(&mut self, _ctx: &CallbackContext) -> CallbackAction {
        CallbackAction::Continue
    }

    /// Called after each evaluation on the test source
    fn on_evaluate(&mut self, _ctx: &CallbackContext) -> CallbackAction {
        CallbackAction::Continue
    }

    /// Get callback name for logging
    fn name(&self) -> &'static str {
        "TrainerCallback"
    }
}
