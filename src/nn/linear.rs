//! Fully connected layer gated by a pruning mask.

use ndarray::{Array1, Array2, ArrayD, ArrayView2, Axis, Ix2};
use rand::Rng;

use crate::error::{Error, Result};
use crate::prune::{check_mask_shape, Prunable};

/// `y = x · (W ⊙ M)ᵀ + b` with `W` of shape `(out, in)`.
#[derive(Debug, Clone)]
pub struct MaskedLinear {
    name: String,
    weight: ArrayD<f32>,
    bias: Array1<f32>,
    mask: ArrayD<f32>,
}

impl MaskedLinear {
    /// Uniform init in `±1/sqrt(in)` with a dense mask.
    pub fn new<R: Rng>(
        name: impl Into<String>,
        in_features: usize,
        out_features: usize,
        rng: &mut R,
    ) -> Result<Self> {
        if in_features == 0 || out_features == 0 {
            return Err(Error::config("layer_sizes", "layer widths must be > 0"));
        }
        let bound = 1.0 / (in_features as f32).sqrt();
        let weight = Array2::from_shape_simple_fn((out_features, in_features), || {
            rng.random_range(-bound..bound)
        });
        let bias = Array1::from_shape_simple_fn(out_features, || rng.random_range(-bound..bound));
        Self::from_parts(name, weight, bias)
    }

    /// Build a layer from explicit parameters.
    pub fn from_parts(name: impl Into<String>, weight: Array2<f32>, bias: Array1<f32>) -> Result<Self> {
        if bias.len() != weight.nrows() {
            return Err(Error::ShapeMismatch {
                expected: vec![weight.nrows()],
                actual: vec![bias.len()],
            });
        }
        let weight = weight.into_dyn();
        let mask = ArrayD::ones(weight.raw_dim());
        Ok(Self { name: name.into(), weight, bias, mask })
    }

    pub fn in_features(&self) -> usize {
        self.weight.shape()[1]
    }

    pub fn out_features(&self) -> usize {
        self.weight.shape()[0]
    }

    pub fn bias(&self) -> &Array1<f32> {
        &self.bias
    }

    /// `W ⊙ M` as a matrix.
    pub fn effective_weight(&self) -> Array2<f32> {
        let masked = &self.weight * &self.mask;
        // weight is built from an Array2 and masks are shape-checked
        masked.into_dimensionality::<Ix2>().unwrap_or_else(|_| Array2::zeros((0, 0)))
    }

    pub fn forward(&self, x: ArrayView2<'_, f32>) -> Result<Array2<f32>> {
        if x.ncols() != self.in_features() {
            return Err(Error::ShapeMismatch {
                expected: vec![x.nrows(), self.in_features()],
                actual: x.shape().to_vec(),
            });
        }
        Ok(x.dot(&self.effective_weight().t()) + &self.bias)
    }

    /// Gradients of the loss w.r.t. the weight, the bias and the input.
    ///
    /// The weight gradient is masked, so pruned positions receive none.
    pub(crate) fn backward(
        &self,
        x: ArrayView2<'_, f32>,
        grad_out: ArrayView2<'_, f32>,
    ) -> (Array2<f32>, Array1<f32>, Array2<f32>) {
        let effective = self.effective_weight();
        let grad_input = grad_out.dot(&effective);
        let mut grad_weight = grad_out.t().dot(&x);
        let mask = self.mask.view().into_dimensionality::<Ix2>();
        if let Ok(mask) = mask {
            grad_weight *= &mask;
        }
        let grad_bias = grad_out.sum_axis(Axis(0));
        (grad_weight, grad_bias, grad_input)
    }

    /// Plain SGD update.
    pub(crate) fn sgd_update(&mut self, grad_weight: &Array2<f32>, grad_bias: &Array1<f32>, lr: f32) {
        if let Ok(mut weight) = self.weight.view_mut().into_dimensionality::<Ix2>() {
            weight.scaled_add(-lr, grad_weight);
        }
        self.bias.scaled_add(-lr, grad_bias);
    }
}

impl Prunable for MaskedLinear {
    fn name(&self) -> &str {
        &self.name
    }

    fn weight(&self) -> &ArrayD<f32> {
        &self.weight
    }

    fn mask(&self) -> &ArrayD<f32> {
        &self.mask
    }

    fn set_mask(&mut self, mask: ArrayD<f32>) -> Result<()> {
        check_mask_shape(&self.weight, &mask)?;
        self.mask = mask;
        Ok(())
    }
}
