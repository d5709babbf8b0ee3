//! Linear ramp methods.

#[cfg(test)]
mod proptests;

use super::RampSchedule;

impl RampSchedule {
    /// `initial + rate * (step - start)` with `rate = (final - initial) / (end - start)`.
    ///
    /// Evaluated in signed double precision; steps outside the window
    /// extrapolate along the same line.
    pub(super) fn linear_sparsity_at_step(
        start_step: usize,
        end_step: usize,
        initial_sparsity: f32,
        final_sparsity: f32,
        step: usize,
    ) -> f32 {
        let initial = f64::from(initial_sparsity);
        let rate = (f64::from(final_sparsity) - initial) / (end_step as f64 - start_step as f64);
        (initial + rate * (step as f64 - start_step as f64)) as f32
    }

    /// Validate the linear window.
    pub(super) fn linear_validate(start_step: usize, end_step: usize) -> Result<(), String> {
        if end_step <= start_step {
            return Err(format!(
                "end_step ({end_step}) must be greater than start_step ({start_step})"
            ));
        }
        Ok(())
    }
}
