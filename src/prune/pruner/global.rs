//! Global thresholding across every prunable layer.

use ndarray::ArrayD;

use super::Pruner;
use crate::error::Result;
use crate::prune::floor_fraction;
use crate::prune::magnitude::check_fraction;
use crate::prune::prunable::PrunableModel;

impl Pruner {
    /// Prune all layers against one magnitude threshold.
    ///
    /// Every weight of every prunable layer joins a single population. The
    /// threshold is its sorted magnitude at rank `floor(fraction * total)`
    /// (the last element when the rank equals the population size), and each
    /// layer keeps exactly the weights strictly above it. Masks are assigned
    /// in the layer order the weights were read in.
    pub fn global_prune<'m, M: PrunableModel + ?Sized>(
        &self,
        model: &'m mut M,
        fraction: f32,
    ) -> Result<&'m mut M> {
        check_fraction(fraction)?;

        let mut scores = Vec::new();
        for layer in model.prunable_layers() {
            scores.extend(layer.weight().iter().map(|w| w.abs()));
        }
        if scores.is_empty() {
            return Ok(model);
        }

        self.device.sort(&mut scores);
        let idx = floor_fraction(fraction, scores.len()).min(scores.len() - 1);
        let threshold = scores[idx];

        let masks: Vec<ArrayD<f32>> = model
            .prunable_layers()
            .into_iter()
            .map(|layer| layer.weight().mapv(|w| if w.abs() > threshold { 1.0 } else { 0.0 }))
            .collect();

        for (layer, mask) in model.prunable_layers_mut().into_iter().zip(masks) {
            layer.set_mask(mask)?;
        }
        Ok(model)
    }
}
