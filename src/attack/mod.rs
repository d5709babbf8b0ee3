//! Projected gradient descent adversarial examples
//!
//! [`Pgd`] crafts an L∞-bounded perturbation of a batch of images in `[0, 1]`
//! by repeatedly stepping along the sign of the loss gradient and projecting
//! back into the `eps` ball around the clean inputs. The model only has to
//! expose the loss gradient w.r.t. its inputs through [`AttackTarget`].

mod pgd;

#[cfg(test)]
mod tests;

pub use pgd::{Pgd, PgdConfig};

use ndarray::ArrayD;

use crate::error::Result;

/// A model that can differentiate its loss w.r.t. its inputs.
pub trait AttackTarget {
    /// Loss of `inputs` under `labels` and `∂loss/∂inputs` (same shape as `inputs`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`](crate::Error::InvalidInput) for malformed
    /// batches and [`Error::Gradient`](crate::Error::Gradient) when no gradient
    /// can be produced.
    fn loss_input_gradient(&self, inputs: &ArrayD<f32>, labels: &[usize]) -> Result<(f32, ArrayD<f32>)>;
}
