//! Loss and accuracy over a batch source.

use ndarray::{Array2, Axis};

use super::{BatchSource, Classifier};
use crate::attack::{AttackTarget, Pgd};
use crate::error::Result;
use crate::nn::{check_labels, softmax_cross_entropy};

/// Mean loss and accuracy of a model on a batch source.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Evaluation {
    /// Batch-weighted mean cross-entropy.
    pub loss: f32,
    /// Fraction of correctly classified samples.
    pub accuracy: f32,
    pub samples: usize,
}

/// Index of the largest logit per row; ties pick the first.
pub fn predictions(logits: &Array2<f32>) -> Vec<usize> {
    logits
        .axis_iter(Axis(0))
        .map(|row| {
            row.iter()
                .enumerate()
                .fold((0, f32::NEG_INFINITY), |best, (i, &v)| if v > best.1 { (i, v) } else { best })
                .0
        })
        .collect()
}

/// Number of rows whose argmax equals the label.
pub fn correct_count(logits: &Array2<f32>, labels: &[usize]) -> usize {
    predictions(logits).iter().zip(labels).filter(|(p, l)| p == l).count()
}

/// Fraction of rows whose argmax equals the label (0 for an empty batch).
pub fn accuracy(logits: &Array2<f32>, labels: &[usize]) -> f32 {
    if labels.is_empty() {
        return 0.0;
    }
    correct_count(logits, labels) as f32 / labels.len() as f32
}

/// Evaluate on clean inputs.
pub fn evaluate<M, S>(model: &M, source: &S) -> Result<Evaluation>
where
    M: Classifier + ?Sized,
    S: BatchSource + ?Sized,
{
    run(model, source, |_, inputs, _| Ok(inputs))
}

/// Evaluate on PGD-perturbed inputs.
pub fn evaluate_adversarial<M, S>(model: &M, source: &S, pgd: &mut Pgd) -> Result<Evaluation>
where
    M: Classifier + AttackTarget + ?Sized,
    S: BatchSource + ?Sized,
{
    run(model, source, |model, inputs, labels| pgd.perturb(model, &inputs, labels, None))
}

fn run<M, S, F>(model: &M, source: &S, mut prepare: F) -> Result<Evaluation>
where
    M: Classifier + ?Sized,
    S: BatchSource + ?Sized,
    F: FnMut(&M, ndarray::ArrayD<f32>, &[usize]) -> Result<ndarray::ArrayD<f32>>,
{
    let mut loss_sum = 0.0_f64;
    let mut correct = 0;
    let mut samples = 0;

    for index in 0..source.num_batches() {
        let (inputs, labels) = source.batch(index)?;
        let inputs = prepare(model, inputs, &labels)?;
        let logits = model.forward(&inputs)?;
        check_labels(&labels, logits.nrows(), logits.ncols())?;
        let (loss, _) = softmax_cross_entropy(logits.view(), &labels);
        loss_sum += f64::from(loss) * labels.len() as f64;
        correct += correct_count(&logits, &labels);
        samples += labels.len();
    }

    if samples == 0 {
        return Ok(Evaluation::default());
    }
    Ok(Evaluation {
        loss: (loss_sum / samples as f64) as f32,
        accuracy: correct as f32 / samples as f32,
        samples,
    })
}
