//! Adversarial training loop with scheduled pruning
//!
//! Each step draws the next training batch (cycling over the source),
//! optionally replaces it with its PGD adversarial version, takes one
//! optimizer step and then lets the [`Pruner`] rewrite masks. The test
//! source is evaluated at step 0, every `eval_step` steps and once more at
//! the end.

mod result;


pub use result::TrainSummary;

use std::time::Instant;

use tracing::{info, warn};

use super::callback::{CallbackAction, CallbackContext, CallbackManager, TrainerCallback};
use super::evaluate::{correct_count, evaluate, evaluate_adversarial};
use super::{BatchSource, Classifier, TrainingConfig};
use crate::attack::{AttackTarget, Pgd};
use crate::config::RunConfig;
use crate::device::Device;
use crate::error::{Error, Result};
use crate::prune::{PrunableModel, Pruner, SparsityReport};

/// Training driver owning the pruner, the optional attack and the callbacks.
pub struct Trainer {
    config: TrainingConfig,
    pruner: Pruner,
    attack: Option<Pgd>,
    callbacks: CallbackManager,
}

impl Trainer {
    /// Create a trainer around a prepared pruner.
    pub fn new(config: TrainingConfig, pruner: Pruner) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, pruner, attack: None, callbacks: CallbackManager::new() })
    }

    /// Build the pruner and the attack described by `run` for `model`.
    ///
    /// The pruner's step budget is set to the run's total steps over a
    /// training source of `num_batches` batches.
    pub fn from_run_config<M: PrunableModel + ?Sized>(
        run: &RunConfig,
        model: &M,
        num_batches: usize,
        device: Device,
    ) -> Result<Self> {
        run.training.validate()?;
        let steps = run.training.total_steps(num_batches);
        let pruning = run.pruning.clone().with_steps(steps);
        let pruner = Pruner::new(pruning, model, device)?;
        let mut trainer = Self::new(run.training.clone(), pruner)?;
        if let Some(attack) = &run.attack {
            trainer = trainer.with_attack(Pgd::new(attack.clone(), device)?);
        }
        Ok(trainer)
    }

    /// Train on PGD adversarial batches instead of clean ones.
    pub fn with_attack(mut self, pgd: Pgd) -> Self {
        self.attack = Some(pgd);
        self
    }

    pub fn add_callback<C: TrainerCallback + 'static>(&mut self, callback: C) {
        self.callbacks.add(callback);
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    pub fn pruner(&self) -> &Pruner {
        &self.pruner
    }

    pub fn is_adversarial(&self) -> bool {
        self.attack.is_some()
    }

    /// Run the training loop.
    ///
    /// # Errors
    ///
    /// Aborts on the first error from the batch sources, the model, the
    /// attack or the pruner.
    pub fn train<M, S, T>(&mut self, model: &mut M, train: &S, test: &T) -> Result<TrainSummary>
    where
        M: Classifier + AttackTarget + PrunableModel + ?Sized,
        S: BatchSource + ?Sized,
        T: BatchSource + ?Sized,
    {
        let started = Instant::now();
        let num_batches = train.num_batches();
        if num_batches == 0 {
            return Err(Error::InvalidInput("training source has no batches".into()));
        }
        let total_steps = self.config.total_steps(num_batches);
        if total_steps != self.pruner.config().steps() {
            warn!(
                total_steps,
                pruner_steps = self.pruner.config().steps(),
                "pruner step budget differs from the training length"
            );
        }

        info!(total_steps, num_batches, adversarial = self.is_adversarial(), "mask check before training");
        let mut sparsity = SparsityReport::from_model(model);
        sparsity.log();

        let mut ctx = CallbackContext {
            total_steps,
            lr: self.config.lr,
            sparsity: sparsity.achieved_sparsity,
            ..Default::default()
        };
        let mut stopped_early = self.callbacks.on_train_begin(&ctx) == CallbackAction::Stop;
        let mut steps_taken = 0;
        let mut correct = 0;
        let mut seen = 0;

        if !stopped_early {
            for step in 0..total_steps {
                let (inputs, labels) = train.batch(step % num_batches)?;
                let inputs = match self.attack.as_mut() {
                    Some(pgd) => pgd.perturb(&*model, &inputs, &labels, None)?,
                    None => inputs,
                };
                let output = model.train_step(&inputs, &labels, self.config.lr)?;
                correct += correct_count(&output.logits, &labels);
                seen += labels.len();

                self.pruner.step(model, step)?;
                if self.pruner.last_prune_step() == Some(step) {
                    sparsity = SparsityReport::from_model(model);
                }
                steps_taken = step + 1;

                ctx.step = step;
                ctx.epoch = step / num_batches;
                ctx.loss = output.loss;
                ctx.train_accuracy = ratio(correct, seen);
                ctx.sparsity = sparsity.achieved_sparsity;
                ctx.test_loss = None;
                ctx.test_accuracy = None;
                ctx.elapsed_secs = started.elapsed().as_secs_f64();

                if step % self.config.eval_step == 0 {
                    let eval = evaluate(&*model, test)?;
                    info!(
                        step,
                        train_loss = output.loss,
                        train_accuracy = ctx.train_accuracy,
                        test_loss = eval.loss,
                        test_accuracy = eval.accuracy,
                        lr = self.config.lr,
                        sparsity = ctx.sparsity,
                        "evaluation"
                    );
                    ctx.test_loss = Some(eval.loss);
                    ctx.test_accuracy = Some(eval.accuracy);
                    if self.callbacks.on_evaluate(&ctx) == CallbackAction::Stop {
                        stopped_early = true;
                        break;
                    }
                }

                if self.callbacks.on_step_end(&ctx) == CallbackAction::Stop {
                    stopped_early = true;
                    break;
                }
            }
        }

        info!(steps = steps_taken, stopped_early, "training completed");
        let final_test = evaluate(&*model, test)?;
        let adversarial_test = match self.attack.as_mut() {
            Some(pgd) => Some(evaluate_adversarial(&*model, test, pgd)?),
            None => None,
        };
        info!(
            test_loss = final_test.loss,
            test_accuracy = final_test.accuracy,
            adversarial_accuracy = adversarial_test.map(|e| e.accuracy),
            "final evaluation"
        );

        info!("mask check after training");
        let sparsity = SparsityReport::from_model(model);
        sparsity.log();

        ctx.test_loss = Some(final_test.loss);
        ctx.test_accuracy = Some(final_test.accuracy);
        ctx.sparsity = sparsity.achieved_sparsity;
        ctx.elapsed_secs = started.elapsed().as_secs_f64();
        self.callbacks.on_train_end(&ctx);

        Ok(TrainSummary {
            steps: steps_taken,
            final_loss: ctx.loss,
            train_accuracy: ctx.train_accuracy,
            test: final_test,
            adversarial_test,
            sparsity,
            stopped_early,
            elapsed_secs: ctx.elapsed_secs,
        })
    }
}

fn ratio(num: usize, den: usize) -> f32 {
    if den == 0 {
        0.0
    } else {
        num as f32 / den as f32
    }
}
