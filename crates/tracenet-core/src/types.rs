//! Shared types used across the tracenet crates.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a neuron within one identity table.
///
/// Identities are dense indices: the table issues them monotonically and
/// never reuses one, so an id stays valid for the lifetime of its table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NeuronId(pub usize);

impl NeuronId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NeuronId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Identity of a connection within one identity table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ConnectionId(pub usize);

impl ConnectionId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

/// One labelled training example: an input vector and its expected output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainSet {
    pub input: Vec<f64>,
    pub output: Vec<f64>,
}

impl TrainSet {
    pub fn new(input: impl Into<Vec<f64>>, output: impl Into<Vec<f64>>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
        }
    }
}
