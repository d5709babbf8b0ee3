//! Per-layer thresholding.

use tracing::debug;

use super::Pruner;
use crate::error::Result;
use crate::prune::magnitude::{check_fraction, prune};
use crate::prune::prunable::{check_mask_shape, mask_sparsity, PrunableModel};

impl Pruner {
    /// Prune each layer independently to `fraction`.
    ///
    /// A layer is skipped once its observed sparsity, rounded to two decimals,
    /// exceeds the configured `final_sparsity`. The comparison is against the
    /// final target, not `fraction`. With `carry_mask` the magnitudes come
    /// from `weight * mask`, so pruned weights stay pruned; otherwise the raw
    /// weight is ranked and earlier pruned weights may come back. The new mask
    /// replaces the old one.
    pub fn local_prune<'m, M: PrunableModel + ?Sized>(
        &self,
        model: &'m mut M,
        fraction: f32,
    ) -> Result<&'m mut M> {
        check_fraction(fraction)?;
        let final_sparsity = self.config.final_sparsity();
        let granularity = self.config.prune_type();

        for layer in model.prunable_layers_mut() {
            let observed = round2(mask_sparsity(layer.mask()));
            if observed > final_sparsity {
                debug!(layer = layer.name(), observed, final_sparsity, "layer already at target");
                continue;
            }

            let mask = if self.config.carry_mask() {
                check_mask_shape(layer.weight(), layer.mask())?;
                let carried = layer.weight() * layer.mask();
                prune(carried.view(), fraction, granularity, self.device)?
            } else {
                prune(layer.weight().view(), fraction, granularity, self.device)?
            };
            layer.set_mask(mask)?;
        }
        Ok(model)
    }
}

/// Round to two decimal places.
fn round2(value: f32) -> f32 {
    ((f64::from(value) * 100.0).round() / 100.0) as f32
}
