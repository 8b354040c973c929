//! Error types for tracenet operations.
//!
//! Every failure is reported synchronously to the immediate caller; nothing
//! is retried internally.

use crate::types::{ConnectionId, NeuronId};
use thiserror::Error;

/// Result type for tracenet operations.
pub type Result<T> = std::result::Result<T, NetworkError>;

/// Errors that can occur while building, activating or training a network.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NetworkError {
    /// An input or target vector does not match the layer it is applied to.
    /// Raised before any neuron is touched.
    #[error("{operation}: expected {expected} values, got {got}")]
    ShapeMismatch {
        operation: &'static str,
        expected: usize,
        got: usize,
    },

    /// A topology request that cannot be built.
    #[error("invalid topology: {0}")]
    InvalidTopology(String),

    /// A neuron identity with no record behind it.
    #[error("neuron {0} is not registered in the identity table")]
    UnknownNeuron(NeuronId),

    /// A connection identity with no record behind it.
    #[error("connection {0} is not registered in the identity table")]
    UnknownConnection(ConnectionId),
}

impl NetworkError {
    pub fn shape_mismatch(operation: &'static str, expected: usize, got: usize) -> Self {
        NetworkError::ShapeMismatch {
            operation,
            expected,
            got,
        }
    }

    pub fn invalid_topology(reason: impl Into<String>) -> Self {
        NetworkError::InvalidTopology(reason.into())
    }

    /// True for the identity-table misses, which indicate a construction bug.
    pub fn is_identity_miss(&self) -> bool {
        matches!(
            self,
            NetworkError::UnknownNeuron(_) | NetworkError::UnknownConnection(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_mismatch_names_the_operation() {
        let err = NetworkError::shape_mismatch("activate", 3, 2);
        assert_eq!(err.to_string(), "activate: expected 3 values, got 2");
        assert!(!err.is_identity_miss());
    }

    #[test]
    fn misses_are_distinct_from_other_errors() {
        assert!(NetworkError::UnknownNeuron(NeuronId(9)).is_identity_miss());
        assert!(NetworkError::UnknownConnection(ConnectionId(1)).is_identity_miss());
        assert!(!NetworkError::invalid_topology("x").is_identity_miss());
    }
}
