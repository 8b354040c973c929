//! Connections — directed, weighted edges between two neuron identities.

use crate::table::IdentityTable;
use tracenet_core::types::{ConnectionId, NeuronId};

/// A directed edge `from -> to`.
///
/// The effective weight is `weight * gain`. Gain stays at 1 unless a gater
/// neuron writes its activation into it on every activation step.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub(crate) id: ConnectionId,
    from: NeuronId,
    to: NeuronId,
    pub(crate) gater: Option<NeuronId>,
    pub(crate) weight: f64,
    pub(crate) gain: f64,
}

impl Connection {
    /// A detached connection record. It receives its identity when registered.
    pub fn new(from: NeuronId, to: NeuronId, weight: f64) -> Self {
        Self {
            id: ConnectionId(0),
            from,
            to,
            gater: None,
            weight,
            gain: 1.0,
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn from(&self) -> NeuronId {
        self.from
    }

    pub fn to(&self) -> NeuronId {
        self.to
    }

    /// The neuron modulating this connection's gain, if any.
    pub fn gater(&self) -> Option<NeuronId> {
        self.gater
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn set_weight(&mut self, weight: f64) {
        self.weight = weight;
    }

    pub fn gain(&self) -> f64 {
        self.gain
    }

    pub fn is_self_connection(&self) -> bool {
        self.from == self.to
    }
}

impl IdentityTable {
    /// Create and register a connection. Without an explicit weight, the
    /// initial weight is a small random value.
    pub fn create_connection(
        &mut self,
        from: NeuronId,
        to: NeuronId,
        weight: Option<f64>,
    ) -> &Connection {
        let weight = weight.unwrap_or_else(|| self.random_weight());
        self.insert_connection(Connection::new(from, to, weight))
    }
}
