use ndarray::ArrayD;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::AttackTarget;
use crate::device::Device;
use crate::error::{Error, Result};

/// Configuration for the PGD attack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PgdConfig {
    /// L∞ radius of the perturbation.
    pub eps: f32,
    /// Step size of each signed-gradient update.
    pub alpha: f32,
    /// Number of gradient steps.
    pub steps: usize,
    /// Start from a uniform random point inside the ball.
    pub random_start: bool,
    /// Seed for the random start.
    pub seed: u64,
}

impl Default for PgdConfig {
    fn default() -> Self {
        Self { eps: 0.3, alpha: 2.0 / 255.0, steps: 40, random_start: false, seed: 42 }
    }
}

impl PgdConfig {
    pub fn with_eps(mut self, eps: f32) -> Self {
        self.eps = eps;
        self
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_steps(mut self, steps: usize) -> Self {
        self.steps = steps;
        self
    }

    pub fn with_random_start(mut self, random_start: bool) -> Self {
        self.random_start = random_start;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        check_eps(self.eps)?;
        if !self.alpha.is_finite() || self.alpha <= 0.0 {
            return Err(Error::config("alpha", format!("must be finite and > 0, got {}", self.alpha)));
        }
        Ok(())
    }
}

fn check_eps(eps: f32) -> Result<()> {
    if !eps.is_finite() || eps < 0.0 {
        return Err(Error::config("eps", format!("must be finite and >= 0, got {eps}")));
    }
    Ok(())
}

/// Sign with `sign(0) = 0`; NaN maps to 0.
fn sign(v: f32) -> f32 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// PGD attacker.
///
/// The random generator lives in the attacker, so successive calls draw
/// fresh random starts while a run stays reproducible from `seed`.
#[derive(Debug, Clone)]
pub struct Pgd {
    config: PgdConfig,
    device: Device,
    rng: StdRng,
}

impl Pgd {
    pub fn new(config: PgdConfig, device: Device) -> Result<Self> {
        config.validate()?;
        let rng = StdRng::seed_from_u64(config.seed);
        Ok(Self { config, device, rng })
    }

    pub fn config(&self) -> &PgdConfig {
        &self.config
    }

    /// Craft adversarial versions of `images`.
    ///
    /// `eps` overrides the configured radius for this call. The returned
    /// array satisfies `|adv - images| <= eps` and `0 <= adv <= 1`
    /// element-wise.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidInput`] if `labels` does not match the batch dimension
    /// - [`Error::ShapeMismatch`] if the model returns a gradient of the wrong shape
    /// - any error raised by the model's gradient computation
    pub fn perturb<M: AttackTarget + ?Sized>(
        &mut self,
        model: &M,
        images: &ArrayD<f32>,
        labels: &[usize],
        eps: Option<f32>,
    ) -> Result<ArrayD<f32>> {
        let eps = eps.unwrap_or(self.config.eps);
        check_eps(eps)?;
        let batch = images
            .shape()
            .first()
            .copied()
            .ok_or_else(|| Error::InvalidInput("images must have a leading batch dimension".into()))?;
        if labels.len() != batch {
            return Err(Error::InvalidInput(format!("expected {batch} labels, got {}", labels.len())));
        }

        let clean = images.as_standard_layout().into_owned();
        let mut adv = clean.clone();

        if self.config.random_start {
            let rng = &mut self.rng;
            adv.mapv_inplace(|x| (x + rng.random_range(-eps..=eps)).clamp(0.0, 1.0));
        }

        let alpha = self.config.alpha;
        for step in 0..self.config.steps {
            let (loss, grad) = model.loss_input_gradient(&adv, labels)?;
            if grad.shape() != adv.shape() {
                return Err(Error::ShapeMismatch {
                    expected: adv.shape().to_vec(),
                    actual: grad.shape().to_vec(),
                });
            }
            trace!(step, loss, "pgd step");

            let grad = grad.as_standard_layout();
            let (Some(adv_slice), Some(grad_slice), Some(clean_slice)) =
                (adv.as_slice_mut(), grad.as_slice(), clean.as_slice())
            else {
                return Err(Error::InvalidInput("arrays are not contiguous".into()));
            };
            self.device.zip_apply(adv_slice, grad_slice, clean_slice, |a, g, x| {
                let stepped = *a + alpha * sign(g);
                let delta = (stepped - x).clamp(-eps, eps);
                *a = (x + delta).clamp(0.0, 1.0);
            });
        }

        debug!(
            eps,
            alpha,
            steps = self.config.steps,
            batch,
            device = self.device.name(),
            "crafted adversarial batch"
        );
        Ok(adv)
    }
}
