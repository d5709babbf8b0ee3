//! Batch sources for training and evaluation.

use ndarray::{ArrayD, Axis, Slice};

use crate::error::{Error, Result};

/// An indexable, finite sequence of labelled batches.
pub trait BatchSource {
    fn num_batches(&self) -> usize;

    /// Batch `index` as `(inputs, labels)`, with `index < num_batches()`.
    fn batch(&self, index: usize) -> Result<(ArrayD<f32>, Vec<usize>)>;
}

/// Samples held in memory, split into fixed-size batches along axis 0.
///
/// The last batch may be short.
#[derive(Debug, Clone)]
pub struct InMemoryBatches {
    inputs: ArrayD<f32>,
    labels: Vec<usize>,
    batch_size: usize,
}

impl InMemoryBatches {
    pub fn new(inputs: ArrayD<f32>, labels: Vec<usize>, batch_size: usize) -> Result<Self> {
        if batch_size == 0 {
            return Err(Error::config("batch_size", "must be > 0"));
        }
        let samples = inputs.shape().first().copied().unwrap_or(0);
        if inputs.ndim() == 0 || samples != labels.len() {
            return Err(Error::InvalidInput(format!(
                "{} labels for inputs of shape {:?}",
                labels.len(),
                inputs.shape()
            )));
        }
        Ok(Self { inputs, labels, batch_size })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl BatchSource for InMemoryBatches {
    fn num_batches(&self) -> usize {
        self.labels.len().div_ceil(self.batch_size)
    }

    fn batch(&self, index: usize) -> Result<(ArrayD<f32>, Vec<usize>)> {
        if index >= self.num_batches() {
            return Err(Error::InvalidInput(format!(
                "batch {index} out of range for {} batches",
                self.num_batches()
            )));
        }
        let start = index * self.batch_size;
        let end = (start + self.batch_size).min(self.labels.len());
        let inputs = self.inputs.slice_axis(Axis(0), Slice::from(start..end)).to_owned();
        Ok((inputs, self.labels[start..end].to_vec()))
    }
}
