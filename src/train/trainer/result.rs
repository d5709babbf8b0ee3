//! Training result types

use crate::prune::SparsityReport;
use crate::train::Evaluation;

/// Result of a training run
#[derive(Debug, Clone)]
pub struct TrainSummary {
    /// Steps actually taken
    pub steps: usize,
    /// Loss of the last training batch
    pub final_loss: f32,
    /// Running training accuracy at the end of the run
    pub train_accuracy: f32,
    /// Final clean evaluation on the test source
    pub test: Evaluation,
    /// Final evaluation on PGD-perturbed test inputs
    pub adversarial_test: Option<Evaluation>,
    /// Mask check after training
    pub sparsity: SparsityReport,
    /// Whether a callback stopped training
    pub stopped_early: bool,
    /// Total training time in seconds
    pub elapsed_secs: f64,
}
