//! Softmax cross-entropy for integer class labels.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

/// Compute softmax: exp(x_i) / sum(exp(x_j))
pub fn softmax(x: ArrayView1<'_, f32>) -> Array1<f32> {
    let max = x.iter().fold(f32::NEG_INFINITY, |a, &b| a.max(b));
    let exp_x: Array1<f32> = x.mapv(|v| (v - max).exp());
    let sum: f32 = exp_x.sum();
    exp_x / sum
}

/// Mean cross-entropy over a batch of logits and its gradient w.r.t. the logits.
///
/// Labels must already be validated against the logits' shape.
pub fn softmax_cross_entropy(logits: ArrayView2<'_, f32>, labels: &[usize]) -> (f32, Array2<f32>) {
    let n = logits.nrows().max(1) as f32;
    let mut grad = Array2::zeros(logits.raw_dim());
    let mut loss = 0.0;

    for ((row, mut grad_row), &label) in
        logits.axis_iter(Axis(0)).zip(grad.axis_iter_mut(Axis(0))).zip(labels)
    {
        let probs = softmax(row);
        loss -= (probs[label] + 1e-10).max(f32::MIN_POSITIVE).ln();
        grad_row.assign(&probs);
        grad_row[label] -= 1.0;
    }

    grad /= n;
    (loss / n, grad)
}
