//! Trainable — the contract between a network and the trainer.
//!
//! A plain network and a Hopfield network train the same way; the Hopfield
//! variant only post-processes its output. This is a trait rather than a
//! concrete type so the trainer drives either without knowing which.

use crate::error::Result;

/// Anything that can run a forward pass and learn from a target.
pub trait Trainable {
    /// Feed `input` forward and return the output activations.
    ///
    /// Fails with a shape mismatch when `input` does not match the input
    /// layer; nothing is activated in that case.
    fn activate(&mut self, input: &[f64]) -> Result<Vec<f64>>;

    /// Propagate the error against `target` backwards and update weights.
    ///
    /// Must follow an `activate` call for the same example.
    fn propagate(&mut self, rate: f64, target: &[f64]) -> Result<()>;

    /// Number of values `activate` expects.
    fn input_size(&self) -> usize;

    /// Number of values `activate` returns.
    fn output_size(&self) -> usize;
}

impl<T: Trainable + ?Sized> Trainable for &mut T {
    fn activate(&mut self, input: &[f64]) -> Result<Vec<f64>> {
        (**self).activate(input)
    }

    fn propagate(&mut self, rate: f64, target: &[f64]) -> Result<()> {
        (**self).propagate(rate, target)
    }

    fn input_size(&self) -> usize {
        (**self).input_size()
    }

    fn output_size(&self) -> usize {
        (**self).output_size()
    }
}
