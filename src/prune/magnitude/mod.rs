//! Magnitude pruning of a single weight tensor.
//!
//! The weight is viewed as `(out, n)`: one row per output feature holding its
//! `n` incoming parameters.
//!
//! - `weight` granularity ranks the magnitudes inside each output feature and
//!   drops every element strictly below the value at rank `floor(f * n)`.
//! - `unit` granularity ranks output features by the L2 norm of their row and
//!   drops every unit strictly below the norm at rank `floor(f * out)`.
//!
//! A rank equal to the population size (`f = 1`) drops everything. At `f = 0`
//! the threshold is the minimum itself, so the strict comparison keeps all.

#[cfg(test)]
mod proptests;
#[cfg(test)]
mod tests;

use ndarray::{ArrayD, ArrayViewD, IxDyn};

use crate::device::Device;
use crate::error::{Error, Result};
use crate::prune::config::PruneGranularity;
use crate::prune::floor_fraction;

/// Compute a keep/prune mask (1.0 / 0.0) for `weight`.
///
/// # Arguments
///
/// * `weight` - Weight tensor of shape `(out, *rest)`
/// * `fraction` - Fraction of mask units to remove, in `[0, 1]`
/// * `granularity` - Element-wise or unit-wise removal
/// * `device` - Execution strategy for the per-row sorts
///
/// # Errors
///
/// Returns [`Error::InvalidFraction`] for a fraction outside `[0, 1]`.
///
/// # Example
///
/// ```
/// use advprune::prune::{prune, PruneGranularity};
/// use advprune::Device;
/// use ndarray::array;
///
/// let w = array![[1.0_f32, -3.0, 2.0, 0.5]].into_dyn();
/// let mask = prune(w.view(), 0.5, PruneGranularity::Weight, Device::Cpu).unwrap();
/// assert_eq!(mask, array![[0.0_f32, 1.0, 1.0, 0.0]].into_dyn());
/// ```
pub fn prune(
    weight: ArrayViewD<'_, f32>,
    fraction: f32,
    granularity: PruneGranularity,
    device: Device,
) -> Result<ArrayD<f32>> {
    check_fraction(fraction)?;

    let shape = weight.shape().to_vec();
    if shape.is_empty() || weight.is_empty() {
        return Ok(ArrayD::ones(IxDyn(&shape)));
    }

    let out = shape[0];
    let per_output = weight.len() / out;
    let values: Vec<f32> = weight.iter().copied().collect();

    let mask = match granularity {
        PruneGranularity::Weight => weight_mask(&values, per_output, fraction, device),
        PruneGranularity::Unit => unit_mask(&values, out, per_output, fraction, device),
    };

    ArrayD::from_shape_vec(IxDyn(&shape), mask).map_err(|_| Error::ShapeMismatch {
        expected: shape.clone(),
        actual: vec![weight.len()],
    })
}

/// Reject fractions that do not describe a share of a population.
pub(crate) fn check_fraction(fraction: f32) -> Result<()> {
    if !fraction.is_finite() || !(0.0..=1.0).contains(&fraction) {
        return Err(Error::InvalidFraction(fraction));
    }
    Ok(())
}

/// Element-wise mask, thresholded independently inside every output row.
fn weight_mask(values: &[f32], per_output: usize, fraction: f32, device: Device) -> Vec<f32> {
    let idx = floor_fraction(fraction, per_output);
    let mut mask = vec![0.0; values.len()];

    device.map_rows(values, &mut mask, per_output, |row, out| {
        let mut sorted: Vec<f32> = row.iter().map(|v| v.abs()).collect();
        sorted.sort_unstable_by(f32::total_cmp);
        match sorted.get(idx) {
            Some(&threshold) => {
                for (m, v) in out.iter_mut().zip(row) {
                    *m = if v.abs() < threshold { 0.0 } else { 1.0 };
                }
            }
            None => out.fill(0.0),
        }
    });

    mask
}

/// Unit-wise mask: whole output rows ranked by L2 norm.
fn unit_mask(
    values: &[f32],
    out: usize,
    per_output: usize,
    fraction: f32,
    device: Device,
) -> Vec<f32> {
    let norms: Vec<f32> = values
        .chunks(per_output)
        .map(|row| row.iter().map(|v| v * v).sum::<f32>().sqrt())
        .collect();

    let mut sorted = norms.clone();
    device.sort(&mut sorted);
    let threshold = sorted.get(floor_fraction(fraction, out)).copied();

    let mut mask = Vec::with_capacity(values.len());
    for norm in norms {
        let pruned = match threshold {
            Some(t) => norm < t,
            None => true,
        };
        let value = if pruned { 0.0 } else { 1.0 };
        mask.extend(std::iter::repeat(value).take(per_output));
    }
    mask
}
