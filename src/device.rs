//! Compute context threaded through the pruner and the attack.
//!
//! The driver picks a [`Device`] once and hands it to every constructor that
//! does heavy numeric work. Results never depend on the choice; only the
//! execution strategy of sort-heavy threshold computation does.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Slices at or below this length are always processed on the calling thread.
const PARALLEL_MIN_LEN: usize = 4096;

/// Where threshold computation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Device {
    /// Sequential execution on the calling thread.
    #[default]
    Cpu,
    /// Data-parallel execution on the rayon thread pool.
    Parallel,
}

impl Device {
    /// Pick `Parallel` when more than one hardware thread is available.
    pub fn detect() -> Self {
        match std::thread::available_parallelism() {
            Ok(n) if n.get() > 1 => Device::Parallel,
            _ => Device::Cpu,
        }
    }

    /// Sort values ascending under `f32::total_cmp`.
    pub fn sort(&self, values: &mut [f32]) {
        match self {
            Device::Parallel if values.len() > PARALLEL_MIN_LEN => {
                values.par_sort_unstable_by(f32::total_cmp);
            }
            _ => values.sort_unstable_by(f32::total_cmp),
        }
    }

    /// Apply `f` to each `width`-long row of `input`, writing the matching row of `output`.
    pub fn map_rows<F>(&self, input: &[f32], output: &mut [f32], width: usize, f: F)
    where
        F: Fn(&[f32], &mut [f32]) + Send + Sync,
    {
        if width == 0 {
            return;
        }
        match self {
            Device::Parallel if input.len() > PARALLEL_MIN_LEN => output
                .par_chunks_mut(width)
                .zip(input.par_chunks(width))
                .for_each(|(out, row)| f(row, out)),
            _ => output.chunks_mut(width).zip(input.chunks(width)).for_each(|(out, row)| f(row, out)),
        }
    }

    /// Update `out[i]` from `out[i]`, `a[i]` and `b[i]` for every index.
    ///
    /// Iteration stops at the shortest of the three slices.
    pub fn zip_apply<F>(&self, out: &mut [f32], a: &[f32], b: &[f32], f: F)
    where
        F: Fn(&mut f32, f32, f32) + Send + Sync,
    {
        match self {
            Device::Parallel if out.len() > PARALLEL_MIN_LEN => out
                .par_iter_mut()
                .zip(a.par_iter().zip(b.par_iter()))
                .for_each(|(o, (&x, &y))| f(o, x, y)),
            _ => out.iter_mut().zip(a.iter().zip(b)).for_each(|(o, (&x, &y))| f(o, x, y)),
        }
    }

    /// Display name used in log fields.
    pub fn name(&self) -> &'static str {
        match self {
            Device::Cpu => "cpu",
            Device::Parallel => "parallel",
        }
    }
}
