//! Mask sparsity report
//!
//! Summarises how much of a model is currently pruned, per layer and overall.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::prunable::PrunableModel;

/// Sparsity of every prunable layer of a model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparsityReport {
    /// Achieved sparsity over all prunable parameters (0.0 to 1.0).
    pub achieved_sparsity: f32,
    /// Total prunable parameters.
    pub total_parameters: usize,
    /// Parameters with a zero mask entry.
    pub parameters_pruned: usize,
    /// Parameters with a non-zero mask entry.
    pub parameters_remaining: usize,
    /// Per-layer sparsity, in layer order.
    pub layer_sparsity: Vec<(String, f32)>,
}

impl SparsityReport {
    /// Inspect the current masks of `model`.
    pub fn from_model<M: PrunableModel + ?Sized>(model: &M) -> Self {
        let mut report = Self::default();
        let mut pruned = 0;
        let mut total = 0;
        for layer in model.prunable_layers() {
            let mask = layer.mask();
            pruned += mask.iter().filter(|&&m| m == 0.0).count();
            total += mask.len();
            report.add_layer_sparsity(layer.name(), layer.sparsity());
        }
        report.update_sparsity(pruned, total);
        report
    }

    /// Update achieved sparsity and parameter counts.
    pub fn update_sparsity(&mut self, pruned: usize, total: usize) {
        self.total_parameters = total;
        self.parameters_pruned = pruned;
        self.parameters_remaining = total.saturating_sub(pruned);
        self.achieved_sparsity = if total > 0 { pruned as f32 / total as f32 } else { 0.0 };
    }

    /// Add layer sparsity.
    pub fn add_layer_sparsity(&mut self, name: impl Into<String>, sparsity: f32) {
        self.layer_sparsity.push((name.into(), sparsity));
    }

    /// Get mean layer sparsity.
    pub fn mean_layer_sparsity(&self) -> f32 {
        if self.layer_sparsity.is_empty() {
            return self.achieved_sparsity;
        }
        let sum: f32 = self.layer_sparsity.iter().map(|(_, s)| s).sum();
        sum / self.layer_sparsity.len() as f32
    }

    /// Get sparsity variance across layers.
    pub fn layer_sparsity_variance(&self) -> f32 {
        if self.layer_sparsity.is_empty() {
            return 0.0;
        }
        let mean = self.mean_layer_sparsity();
        self.layer_sparsity.iter().map(|(_, s)| (s - mean).powi(2)).sum::<f32>()
            / self.layer_sparsity.len() as f32
    }

    /// Check if the overall sparsity reached `target`.
    pub fn target_achieved(&self, target: f32) -> bool {
        self.achieved_sparsity >= target - 1e-4
    }

    /// Emit one `info` event per layer plus a summary.
    pub fn log(&self) {
        for (name, sparsity) in &self.layer_sparsity {
            info!(layer = %name, sparsity = *sparsity, "mask check");
        }
        info!(
            total = self.total_parameters,
            pruned = self.parameters_pruned,
            sparsity = self.achieved_sparsity,
            "mask check summary"
        );
    }
}
