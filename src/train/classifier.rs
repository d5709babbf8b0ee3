//! Model-side contract of the training driver.

use ndarray::{Array2, ArrayD};

use crate::error::Result;

/// Output of one optimizer step.
#[derive(Debug, Clone)]
pub struct StepOutput {
    /// Mean loss of the batch before the update.
    pub loss: f32,
    /// Logits of the batch before the update, shape `(N, classes)`.
    pub logits: Array2<f32>,
}

/// A trainable classifier over batches shaped `(N, ...)`.
pub trait Classifier {
    /// Logits for a batch, shape `(N, classes)`.
    fn forward(&self, inputs: &ArrayD<f32>) -> Result<Array2<f32>>;

    /// Forward, backward and one optimizer update with learning rate `lr`.
    fn train_step(&mut self, inputs: &ArrayD<f32>, labels: &[usize], lr: f32) -> Result<StepOutput>;
}
