//! Multi-layer perceptron built from [`MaskedLinear`] layers.

use ndarray::{Array2, ArrayD, Zip};
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::{check_labels, flatten_batch, softmax_cross_entropy, MaskedLinear};
use crate::attack::AttackTarget;
use crate::error::{Error, Result};
use crate::prune::{Prunable, PrunableModel};
use crate::train::{Classifier, StepOutput};

/// ReLU network; the last layer produces logits.
#[derive(Debug, Clone)]
pub struct MaskedMlp {
    layers: Vec<MaskedLinear>,
}

/// Activations kept for the backward pass.
struct ForwardTrace {
    /// Input of every layer, `inputs[0]` being the flattened batch.
    inputs: Vec<Array2<f32>>,
    logits: Array2<f32>,
}

impl MaskedMlp {
    /// Build a network with layer widths `sizes` (input first, classes last).
    ///
    /// Layers are named `fc1`, `fc2`, ...
    pub fn new(sizes: &[usize], seed: u64) -> Result<Self> {
        if sizes.len() < 2 {
            return Err(Error::config("layer_sizes", "need at least an input and an output width"));
        }
        let mut rng = StdRng::seed_from_u64(seed);
        let layers = sizes
            .windows(2)
            .enumerate()
            .map(|(i, w)| MaskedLinear::new(format!("fc{}", i + 1), w[0], w[1], &mut rng))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { layers })
    }

    /// Build a network from prepared layers.
    pub fn from_layers(layers: Vec<MaskedLinear>) -> Result<Self> {
        if layers.is_empty() {
            return Err(Error::config("layer_sizes", "network needs at least one layer"));
        }
        for pair in layers.windows(2) {
            if pair[0].out_features() != pair[1].in_features() {
                return Err(Error::ShapeMismatch {
                    expected: vec![pair[0].out_features()],
                    actual: vec![pair[1].in_features()],
                });
            }
        }
        Ok(Self { layers })
    }

    pub fn layers(&self) -> &[MaskedLinear] {
        &self.layers
    }

    pub fn num_classes(&self) -> usize {
        self.layers.last().map_or(0, MaskedLinear::out_features)
    }

    pub fn num_parameters(&self) -> usize {
        self.layers.iter().map(|l| l.weight().len() + l.bias().len()).sum()
    }

    fn trace(&self, inputs: &ArrayD<f32>) -> Result<ForwardTrace> {
        let mut x = flatten_batch(inputs)?;
        let mut kept = Vec::with_capacity(self.layers.len());
        let last = self.layers.len() - 1;
        for (i, layer) in self.layers.iter().enumerate() {
            let mut z = layer.forward(x.view())?;
            if i < last {
                z.mapv_inplace(|v| v.max(0.0));
            }
            kept.push(x);
            x = z;
        }
        Ok(ForwardTrace { inputs: kept, logits: x })
    }

    /// Backpropagate `grad` (w.r.t. the logits) through every layer.
    ///
    /// Returns per-layer `(grad_weight, grad_bias)` and the input gradient.
    #[allow(clippy::type_complexity)]
    fn backward(
        &self,
        trace: &ForwardTrace,
        mut grad: Array2<f32>,
    ) -> (Vec<(Array2<f32>, ndarray::Array1<f32>)>, Array2<f32>) {
        let mut param_grads = Vec::with_capacity(self.layers.len());
        for (i, layer) in self.layers.iter().enumerate().rev() {
            let x = &trace.inputs[i];
            let (gw, gb, mut gx) = layer.backward(x.view(), grad.view());
            if i > 0 {
                // x is the ReLU output of the previous layer
                Zip::from(&mut gx).and(x).for_each(|g, &a| {
                    if a <= 0.0 {
                        *g = 0.0;
                    }
                });
            }
            param_grads.push((gw, gb));
            grad = gx;
        }
        param_grads.reverse();
        (param_grads, grad)
    }

    fn loss_and_grads(
        &self,
        inputs: &ArrayD<f32>,
        labels: &[usize],
    ) -> Result<(ForwardTrace, f32, Array2<f32>)> {
        let trace = self.trace(inputs)?;
        check_labels(labels, trace.logits.nrows(), self.num_classes())?;
        let (loss, grad) = softmax_cross_entropy(trace.logits.view(), labels);
        if !loss.is_finite() {
            return Err(Error::Gradient(format!("non-finite loss {loss}")));
        }
        Ok((trace, loss, grad))
    }
}

impl PrunableModel for MaskedMlp {
    fn prunable_layers(&self) -> Vec<&dyn Prunable> {
        self.layers.iter().map(|l| l as &dyn Prunable).collect()
    }

    fn prunable_layers_mut(&mut self) -> Vec<&mut dyn Prunable> {
        self.layers.iter_mut().map(|l| l as &mut dyn Prunable).collect()
    }
}

impl AttackTarget for MaskedMlp {
    fn loss_input_gradient(&self, inputs: &ArrayD<f32>, labels: &[usize]) -> Result<(f32, ArrayD<f32>)> {
        let (trace, loss, grad) = self.loss_and_grads(inputs, labels)?;
        let (_, grad_input) = self.backward(&trace, grad);
        let grad_input = ArrayD::from_shape_vec(inputs.raw_dim(), grad_input.into_iter().collect())
            .map_err(|e| Error::Gradient(format!("cannot reshape input gradient: {e}")))?;
        Ok((loss, grad_input))
    }
}

impl Classifier for MaskedMlp {
    fn forward(&self, inputs: &ArrayD<f32>) -> Result<Array2<f32>> {
        Ok(self.trace(inputs)?.logits)
    }

    fn train_step(&mut self, inputs: &ArrayD<f32>, labels: &[usize], lr: f32) -> Result<StepOutput> {
        let (trace, loss, grad) = self.loss_and_grads(inputs, labels)?;
        let (param_grads, _) = self.backward(&trace, grad);
        for (layer, (gw, gb)) in self.layers.iter_mut().zip(&param_grads) {
            layer.sgd_update(gw, gb, lr);
        }
        Ok(StepOutput { loss, logits: trace.logits })
    }
}
