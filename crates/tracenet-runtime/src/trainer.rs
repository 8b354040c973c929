//! Trainer — epoch loop over a set of examples.
//!
//! One epoch activates and propagates every example once, in order, and
//! averages the configured cost over the set. Training stops as soon as
//! that mean drops below `max_error_rate`; running out of iterations is
//! reported, not treated as a failure.

use serde::{Deserialize, Serialize};
use tracenet_core::cost::{Cost, Coster};
use tracenet_core::error::Result;
use tracenet_core::trainable::Trainable;
use tracenet_core::types::TrainSet;
use tracing::{debug, info, trace};

/// Trainer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    /// Step size applied to every weight and bias update (default: 0.2).
    pub learning_rate: f64,
    /// Maximum number of epochs (default: 20000).
    pub iterations: usize,
    /// Mean cost below which training stops (default: 0.005).
    pub max_error_rate: f64,
    /// Cost measured per example (default: mse).
    pub cost: Cost,
    /// Epochs between progress log lines; 0 disables them (default: 1000).
    pub log_every: usize,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.2,
            iterations: 20_000,
            max_error_rate: 0.005,
            cost: Cost::default(),
            log_every: 1_000,
        }
    }
}

/// Snapshot handed to a training observer after each epoch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    /// Mean cost over the example set.
    pub error: f64,
}

/// Outcome of a training run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    /// Epochs actually run.
    pub epochs: usize,
    /// Mean cost of the last epoch.
    pub error: f64,
    /// Whether the mean cost fell below the threshold.
    pub converged: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Trainer {
    config: TrainerConfig,
}

impl Trainer {
    pub fn new(config: TrainerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    /// Train `network` on `examples`.
    ///
    /// Fails only on a shape mismatch between an example and the network.
    pub fn train<T: Trainable + ?Sized>(&self, network: &mut T, examples: &[TrainSet]) -> Result<TrainingReport> {
        self.train_with(network, examples, |_| {})
    }

    /// Like [`Trainer::train`], calling `observer` after every epoch.
    pub fn train_with<T, F>(&self, network: &mut T, examples: &[TrainSet], mut observer: F) -> Result<TrainingReport>
    where
        T: Trainable + ?Sized,
        F: FnMut(&EpochStats),
    {
        if examples.is_empty() {
            debug!("Empty training set, nothing to do");
            return Ok(TrainingReport {
                epochs: 0,
                error: 0.0,
                converged: true,
            });
        }

        let config = &self.config;
        let mut error = f64::INFINITY;
        for epoch in 1..=config.iterations {
            error = self.epoch(network, examples)? / examples.len() as f64;
            observer(&EpochStats { epoch, error });
            trace!("Epoch {} error {}", epoch, error);

            if error < config.max_error_rate {
                info!("Converged after {} epochs with error {:.6}", epoch, error);
                return Ok(TrainingReport {
                    epochs: epoch,
                    error,
                    converged: true,
                });
            }
            if config.log_every > 0 && epoch % config.log_every == 0 {
                debug!("Epoch {} of {}: error {:.6}", epoch, config.iterations, error);
            }
        }

        info!(
            "Stopped after {} epochs with error {:.6} (target {})",
            config.iterations, error, config.max_error_rate
        );
        Ok(TrainingReport {
            epochs: config.iterations,
            error,
            converged: false,
        })
    }

    /// One pass over every example; returns the summed cost.
    fn epoch<T: Trainable + ?Sized>(&self, network: &mut T, examples: &[TrainSet]) -> Result<f64> {
        let mut sum = 0.0;
        for example in examples {
            let output = network.activate(&example.input)?;
            network.propagate(self.config.learning_rate, &example.output)?;
            sum += self.config.cost.cost(&example.output, &output);
        }
        Ok(sum)
    }
}
