//! Hopfield-style associative memory.
//!
//! An input layer fully projected onto an equally sized output layer. It
//! trains like any other network; only the final reading is thresholded
//! to binary values.

use crate::layer::{FanOut, Layer};
use crate::network::Network;
use crate::table::IdentityTable;
use tracenet_core::error::Result;
use tracenet_core::trainable::Trainable;
use tracing::debug;

/// Outputs at or above this value read as 1, below it as 0.
pub const RECALL_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone)]
pub struct Hopfield {
    network: Network,
}

impl Hopfield {
    /// Build a Hopfield network with `size` input and `size` output neurons,
    /// typically one per pixel of the patterns to store.
    pub fn new(mut table: IdentityTable, size: usize) -> Result<Self> {
        let mut input = Layer::new(&mut table, size);
        let output = Layer::new(&mut table, size);
        input.project(&mut table, &output, FanOut::AllToAll)?;
        debug!(size, "built hopfield network");
        Ok(Self {
            network: Network::new(table, input, Vec::new(), output)?,
        })
    }

    /// Activate with `pattern` and return the thresholded output.
    pub fn recall(&mut self, pattern: &[f64]) -> Result<Vec<f64>> {
        self.activate(pattern)
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn into_network(self) -> Network {
        self.network
    }
}

impl Trainable for Hopfield {
    fn activate(&mut self, input: &[f64]) -> Result<Vec<f64>> {
        let output = self.network.activate(input)?;
        Ok(output
            .into_iter()
            .map(|x| if x < RECALL_THRESHOLD { 0.0 } else { 1.0 })
            .collect())
    }

    fn propagate(&mut self, rate: f64, target: &[f64]) -> Result<()> {
        self.network.propagate(rate, target)
    }

    fn input_size(&self) -> usize {
        self.network.input().len()
    }

    fn output_size(&self) -> usize {
        self.network.output().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_is_binary() {
        let mut hopfield = Hopfield::new(IdentityTable::with_seed(2), 4).unwrap();
        let output = hopfield.recall(&[0.0, 1.0, 1.0, 0.0]).unwrap();
        assert_eq!(output.len(), 4);
        assert!(output.iter().all(|&x| x == 0.0 || x == 1.0));
    }

    #[test]
    fn input_is_fully_connected_to_output() {
        let hopfield = Hopfield::new(IdentityTable::with_seed(2), 3).unwrap();
        let stats = hopfield.network().stats();
        assert_eq!(stats.connections, 6 + 9);
        assert_eq!((hopfield.input_size(), hopfield.output_size()), (3, 3));
    }
}
