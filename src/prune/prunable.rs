//! Capability traits for mask-bearing layers and the models that own them.
//!
//! A layer takes part in pruning by implementing [`Prunable`]; a model exposes
//! its prunable layers through [`PrunableModel`] in declaration order. Global
//! pruning relies on that order being identical between the read and the
//! write pass of a single call.

use ndarray::ArrayD;

use crate::error::{Error, Result};

/// A weight-bearing layer gated by a binary mask of the same shape.
///
/// Forward computation is expected to use `weight * mask`.
pub trait Prunable {
    /// Layer name used in logs and reports.
    fn name(&self) -> &str;

    /// Current weight tensor, shape `(out, *rest)`.
    fn weight(&self) -> &ArrayD<f32>;

    /// Current mask tensor (1.0 keep, 0.0 pruned).
    fn mask(&self) -> &ArrayD<f32>;

    /// Replace the mask.
    ///
    /// # Errors
    ///
    /// Implementations must reject masks whose shape differs from the weight
    /// (see [`check_mask_shape`]).
    fn set_mask(&mut self, mask: ArrayD<f32>) -> Result<()>;

    /// Fraction of mask entries that are zero.
    fn sparsity(&self) -> f32 {
        mask_sparsity(self.mask())
    }

    /// Weight with the mask applied.
    fn masked_weight(&self) -> Result<ArrayD<f32>> {
        check_mask_shape(self.weight(), self.mask())?;
        Ok(self.weight() * self.mask())
    }
}

/// A model exposing its prunable layers in declaration order.
pub trait PrunableModel {
    /// Prunable layers, first to last.
    fn prunable_layers(&self) -> Vec<&dyn Prunable>;

    /// Mutable prunable layers, in the same order as [`prunable_layers`](Self::prunable_layers).
    fn prunable_layers_mut(&mut self) -> Vec<&mut dyn Prunable>;

    /// Snapshot of every layer's mask.
    fn masks(&self) -> Vec<ArrayD<f32>> {
        self.prunable_layers().into_iter().map(|layer| layer.mask().clone()).collect()
    }
}

/// Check that a mask can gate `weight`.
pub fn check_mask_shape(weight: &ArrayD<f32>, mask: &ArrayD<f32>) -> Result<()> {
    if weight.shape() != mask.shape() {
        return Err(Error::ShapeMismatch {
            expected: weight.shape().to_vec(),
            actual: mask.shape().to_vec(),
        });
    }
    Ok(())
}

/// `1 - mean(mask)`; an empty mask counts as dense.
pub fn mask_sparsity(mask: &ArrayD<f32>) -> f32 {
    if mask.is_empty() {
        return 0.0;
    }
    let kept: f64 = mask.iter().map(|&m| f64::from(m)).sum();
    (1.0 - kept / mask.len() as f64) as f32
}
