//! Unit tests for the PGD attack.

use super::*;
use crate::device::Device;
use crate::error::Error;
use crate::nn::MaskedMlp;
use crate::prune::{Prunable, PrunableModel};
use ndarray::{array, ArrayD, IxDyn};

/// `loss = sum(w * x)`, so the input gradient is `w` everywhere.
struct LinearLoss {
    w: ArrayD<f32>,
}

impl AttackTarget for LinearLoss {
    fn loss_input_gradient(&self, inputs: &ArrayD<f32>, _labels: &[usize]) -> Result<(f32, ArrayD<f32>)> {
        Ok(((&self.w * inputs).sum(), self.w.clone()))
    }
}

struct WrongShape;

impl AttackTarget for WrongShape {
    fn loss_input_gradient(&self, _inputs: &ArrayD<f32>, _labels: &[usize]) -> Result<(f32, ArrayD<f32>)> {
        Ok((0.0, ArrayD::zeros(IxDyn(&[1]))))
    }
}

struct Broken;

impl AttackTarget for Broken {
    fn loss_input_gradient(&self, _inputs: &ArrayD<f32>, _labels: &[usize]) -> Result<(f32, ArrayD<f32>)> {
        Err(Error::Gradient("no gradient path".into()))
    }
}

fn images() -> ArrayD<f32> {
    array![[0.0_f32, 0.5, 1.0, 0.25], [0.9, 0.1, 0.6, 0.4]].into_dyn()
}

fn within_ball(adv: &ArrayD<f32>, clean: &ArrayD<f32>, eps: f32) -> bool {
    adv.iter()
        .zip(clean.iter())
        .all(|(&a, &x)| (a - x).abs() <= eps + 1e-6 && (0.0..=1.0).contains(&a))
}

#[test]
fn test_default_config() {
    // TEST_ID: PGD-001
    let config = PgdConfig::default();
    assert_eq!(config.eps, 0.3);
    assert!((config.alpha - 2.0 / 255.0).abs() < 1e-9);
    assert_eq!(config.steps, 40);
    assert!(!config.random_start);
    assert!(config.validate().is_ok());
}

#[test]
fn test_signed_steps_saturate_at_eps() {
    // TEST_ID: PGD-002
    let x = images();
    let model = LinearLoss { w: array![[1.0_f32, -1.0, 1.0, -1.0], [1.0, 1.0, -1.0, -1.0]].into_dyn() };
    let mut pgd = Pgd::new(PgdConfig::default().with_eps(0.1).with_alpha(0.05).with_steps(10), Device::Cpu)
        .unwrap();
    let adv = pgd.perturb(&model, &x, &[0, 1], None).unwrap();
    let expected = array![[0.1_f32, 0.4, 1.0, 0.15], [1.0, 0.2, 0.5, 0.3]].into_dyn();
    for (a, e) in adv.iter().zip(expected.iter()) {
        assert!((a - e).abs() < 1e-5, "PGD-002 FALSIFIED: got {adv:?}");
    }
}

#[test]
fn test_zero_gradient_leaves_input_unchanged() {
    // TEST_ID: PGD-003
    // FALSIFIES: sign(0) treated as +1
    let x = images();
    let model = LinearLoss { w: ArrayD::zeros(x.raw_dim()) };
    let mut pgd = Pgd::new(PgdConfig::default().with_steps(5), Device::Cpu).unwrap();
    let adv = pgd.perturb(&model, &x, &[0, 0], None).unwrap();
    assert_eq!(adv, x, "PGD-003 FALSIFIED");
}

#[test]
fn test_eps_override() {
    // TEST_ID: PGD-004
    let x = images();
    let model = LinearLoss { w: ArrayD::ones(x.raw_dim()) };
    let mut pgd = Pgd::new(PgdConfig::default().with_random_start(true), Device::Cpu).unwrap();
    let adv = pgd.perturb(&model, &x, &[0, 1], Some(0.0)).unwrap();
    assert_eq!(adv, x, "PGD-004 FALSIFIED: eps = 0 must be a no-op");
    assert!(pgd.perturb(&model, &x, &[0, 1], Some(-0.1)).is_err());
}

#[test]
fn test_random_start_stays_in_ball() {
    // TEST_ID: PGD-005
    let x = images();
    let model = LinearLoss { w: ArrayD::zeros(x.raw_dim()) };
    let mut pgd = Pgd::new(
        PgdConfig::default().with_eps(0.2).with_steps(0).with_random_start(true),
        Device::Cpu,
    )
    .unwrap();
    let adv = pgd.perturb(&model, &x, &[0, 1], None).unwrap();
    assert!(within_ball(&adv, &x, 0.2), "PGD-005 FALSIFIED: {adv:?}");
    assert_ne!(adv, x);
}

#[test]
fn test_random_start_reproducible_from_seed() {
    // TEST_ID: PGD-006
    let x = images();
    let model = LinearLoss { w: ArrayD::zeros(x.raw_dim()) };
    let config = PgdConfig::default().with_random_start(true).with_steps(0).with_seed(9);
    let a = Pgd::new(config.clone(), Device::Cpu).unwrap().perturb(&model, &x, &[0, 1], None).unwrap();
    let b = Pgd::new(config, Device::Parallel).unwrap().perturb(&model, &x, &[0, 1], None).unwrap();
    assert_eq!(a, b, "PGD-006 FALSIFIED");
}

#[test]
fn test_label_count_must_match_batch() {
    // TEST_ID: PGD-007
    let x = images();
    let model = LinearLoss { w: ArrayD::ones(x.raw_dim()) };
    let mut pgd = Pgd::new(PgdConfig::default(), Device::Cpu).unwrap();
    let err = pgd.perturb(&model, &x, &[0], None).unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)), "PGD-007 FALSIFIED: {err}");
}

#[test]
fn test_gradient_shape_mismatch() {
    // TEST_ID: PGD-008
    let mut pgd = Pgd::new(PgdConfig::default(), Device::Cpu).unwrap();
    let err = pgd.perturb(&WrongShape, &images(), &[0, 1], None).unwrap_err();
    assert!(matches!(err, Error::ShapeMismatch { .. }), "PGD-008 FALSIFIED: {err}");
}

#[test]
fn test_gradient_failure_propagates() {
    // TEST_ID: PGD-009
    let mut pgd = Pgd::new(PgdConfig::default(), Device::Cpu).unwrap();
    let err = pgd.perturb(&Broken, &images(), &[0, 1], None).unwrap_err();
    assert!(matches!(err, Error::Gradient(_)), "PGD-009 FALSIFIED: {err}");
}

#[test]
fn test_mlp_attack_bounded_and_model_untouched() {
    // TEST_ID: PGD-010
    let model = MaskedMlp::new(&[4, 6, 3], 1).unwrap();
    let before = model.masks();
    let weights_before = model.layers()[0].weight().clone();
    let x = images();
    let mut pgd = Pgd::new(PgdConfig::default().with_eps(0.05).with_steps(8).with_alpha(0.02), Device::Cpu)
        .unwrap();
    let adv = pgd.perturb(&model, &x, &[2, 0], None).unwrap();
    assert!(within_ball(&adv, &x, 0.05), "PGD-010 FALSIFIED: {adv:?}");
    assert_eq!(model.masks(), before);
    assert_eq!(model.layers()[0].weight(), &weights_before);
}

#[test]
fn test_invalid_config_rejected() {
    // TEST_ID: PGD-011
    assert!(Pgd::new(PgdConfig::default().with_alpha(0.0), Device::Cpu).is_err());
    assert!(Pgd::new(PgdConfig::default().with_eps(f32::NAN), Device::Cpu).is_err());
}

#[test]
fn test_config_from_partial_yaml() {
    // TEST_ID: PGD-012
    let config: PgdConfig = serde_yaml::from_str("eps: 0.1\nrandom_start: true\n").unwrap();
    assert_eq!(config.eps, 0.1);
    assert!(config.random_start);
    assert_eq!(config.steps, 40);
}
