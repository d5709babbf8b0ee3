//! Reference mask-bearing network
//!
//! A small fully connected classifier whose linear layers carry a pruning
//! mask. It implements [`PrunableModel`](crate::prune::PrunableModel),
//! [`AttackTarget`](crate::attack::AttackTarget) and
//! [`Classifier`](crate::train::Classifier), so the pruner, the PGD attack and
//! the training driver can be exercised without an external framework.

mod linear;
mod loss;
mod mlp;

pub use linear::MaskedLinear;
pub use loss::{softmax, softmax_cross_entropy};
pub use mlp::MaskedMlp;

use ndarray::{Array2, ArrayD};

use crate::error::{Error, Result};

/// Flatten a `(N, ...)` batch into `(N, features)` in logical order.
pub(crate) fn flatten_batch(inputs: &ArrayD<f32>) -> Result<Array2<f32>> {
    let Some(&n) = inputs.shape().first() else {
        return Err(Error::InvalidInput("batch must have a leading batch dimension".to_string()));
    };
    let features = if n == 0 { 0 } else { inputs.len() / n };
    Array2::from_shape_vec((n, features), inputs.iter().copied().collect())
        .map_err(|e| Error::InvalidInput(format!("cannot flatten batch: {e}")))
}

/// Check labels against the batch size and the number of classes.
pub(crate) fn check_labels(labels: &[usize], batch: usize, classes: usize) -> Result<()> {
    if labels.len() != batch {
        return Err(Error::InvalidInput(format!(
            "expected {batch} labels, got {}",
            labels.len()
        )));
    }
    if let Some(&bad) = labels.iter().find(|&&l| l >= classes) {
        return Err(Error::InvalidInput(format!("label {bad} out of range for {classes} classes")));
    }
    Ok(())
}
