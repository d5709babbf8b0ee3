//! Adversarial training driver
//!
//! - [`Trainer`] runs the step loop: optional PGD, optimizer step, pruner step
//! - [`BatchSource`] feeds labelled batches; [`InMemoryBatches`] holds them in memory
//! - [`Classifier`] is what the driver needs from a model
//! - [`evaluate`] / [`evaluate_adversarial`] report loss and accuracy
//! - [`callback`] hooks into training events

pub mod callback;
mod classifier;
mod config;
mod data;
mod evaluate;
mod trainer;

pub use callback::{CallbackAction, CallbackContext, CallbackManager, EarlyStopping, TrainerCallback};
pub use classifier::{Classifier, StepOutput};
pub use config::TrainingConfig;
pub use data::{BatchSource, InMemoryBatches};
pub use evaluate::{accuracy, correct_count, evaluate, evaluate_adversarial, predictions, Evaluation};
pub use trainer::{TrainSummary, Trainer};
