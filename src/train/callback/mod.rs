//! Callback system for training events
//!
//! Provides extensible hooks for training loop events:
//! - `on_train_begin` / `on_train_end`
//! - `on_step_end`
//! - `on_evaluate`
//!
//! # Example
//!
//! ```rust
//! use advprune::train::callback::{CallbackAction, CallbackContext, TrainerCallback};
//!
//! struct StopWhenSparse(f32);
//!
//! impl TrainerCallback for StopWhenSparse {
//!     fn on_step_end(&mut self, ctx: &CallbackContext) -> CallbackAction {
//!         if ctx.sparsity >= self.0 {
//!             CallbackAction::Stop
//!         } else {
//!             CallbackAction::Continue
//!         }
//!     }
//! }
//! ```

mod early_stopping;
mod manager;
mod traits;

pub use early_stopping::EarlyStopping;
pub use manager::CallbackManager;
pub use traits::{CallbackAction, CallbackContext, TrainerCallback};
