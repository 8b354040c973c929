//! Identity table — the arena every graph element is addressed through.
//!
//! Neurons and connections never hold references to each other. They hold
//! identities, and every access resolves the identity here. One table backs
//! one network, so independent networks never share an identity space.
//!
//! Storage is two dense vectors indexed by identity. Identities are issued
//! monotonically and never reused; replacing a connection overwrites its
//! slot in place.

use crate::connection::Connection;
use crate::neuron::Neuron;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracenet_core::error::{NetworkError, Result};
use tracenet_core::types::{ConnectionId, NeuronId};

/// Range initial connection weights are drawn from.
const WEIGHT_RANGE: std::ops::Range<f64> = -0.1..0.1;
/// Range initial neuron biases are drawn from.
const BIAS_RANGE: std::ops::Range<f64> = -0.25..0.25;

/// Append-only arena of neurons and connections.
#[derive(Debug, Clone)]
pub struct IdentityTable {
    neurons: Vec<Neuron>,
    connections: Vec<Option<Connection>>,
    rng: StdRng,
}

impl IdentityTable {
    /// Create an empty table whose random initial weights are seeded from entropy.
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Create an empty table with reproducible initial weights.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            neurons: Vec::new(),
            connections: Vec::new(),
            rng,
        }
    }

    /// The identity the next registered neuron will receive.
    pub fn next_neuron_id(&self) -> NeuronId {
        NeuronId(self.neurons.len())
    }

    /// Register a neuron and return its identity.
    pub(crate) fn register_neuron(&mut self, mut neuron: Neuron) -> NeuronId {
        let id = self.next_neuron_id();
        neuron.id = id;
        self.neurons.push(neuron);
        id
    }

    /// Look up a neuron. `None` means the identity was never issued by this table.
    pub fn neuron(&self, id: NeuronId) -> Option<&Neuron> {
        self.neurons.get(id.index())
    }

    pub fn neuron_mut(&mut self, id: NeuronId) -> Option<&mut Neuron> {
        self.neurons.get_mut(id.index())
    }

    /// Register a connection and return its identity.
    pub fn register_connection(&mut self, connection: Connection) -> ConnectionId {
        self.insert_connection(connection).id
    }

    pub(crate) fn insert_connection(&mut self, mut connection: Connection) -> &Connection {
        let slot = self.connections.len();
        connection.id = ConnectionId(slot);
        self.connections.push(None);
        self.connections[slot].insert(connection)
    }

    /// Overwrite the connection stored under `id`, growing the table with
    /// empty slots when `id` lies beyond its current end.
    pub fn replace_connection(&mut self, id: ConnectionId, mut connection: Connection) {
        if id.index() >= self.connections.len() {
            self.connections.resize(id.index() + 1, None);
        }
        connection.id = id;
        self.connections[id.index()] = Some(connection);
    }

    /// Look up a connection. `None` for identities beyond the table and for
    /// padding slots that were never filled.
    pub fn connection(&self, id: ConnectionId) -> Option<&Connection> {
        self.connections.get(id.index()).and_then(Option::as_ref)
    }

    pub fn connection_mut(&mut self, id: ConnectionId) -> Option<&mut Connection> {
        self.connections.get_mut(id.index()).and_then(Option::as_mut)
    }

    /// Look up a neuron, treating a miss as a construction bug.
    pub fn try_neuron(&self, id: NeuronId) -> Result<&Neuron> {
        self.neuron(id).ok_or(NetworkError::UnknownNeuron(id))
    }

    pub fn try_neuron_mut(&mut self, id: NeuronId) -> Result<&mut Neuron> {
        self.neuron_mut(id).ok_or(NetworkError::UnknownNeuron(id))
    }

    /// Look up a connection, treating a miss as a construction bug.
    pub fn try_connection(&self, id: ConnectionId) -> Result<&Connection> {
        self.connection(id).ok_or(NetworkError::UnknownConnection(id))
    }

    pub fn try_connection_mut(&mut self, id: ConnectionId) -> Result<&mut Connection> {
        self.connection_mut(id).ok_or(NetworkError::UnknownConnection(id))
    }

    pub fn neuron_count(&self) -> usize {
        self.neurons.len()
    }

    /// Number of registered connections, self-connections included.
    pub fn connection_count(&self) -> usize {
        self.connections.iter().flatten().count()
    }

    pub fn neurons(&self) -> impl Iterator<Item = &Neuron> {
        self.neurons.iter()
    }

    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.iter().flatten()
    }

    pub(crate) fn random_weight(&mut self) -> f64 {
        self.rng.gen_range(WEIGHT_RANGE)
    }

    pub(crate) fn random_bias(&mut self) -> f64 {
        self.rng.gen_range(BIAS_RANGE)
    }
}

impl Default for IdentityTable {
    fn default() -> Self {
        Self::new()
    }
}
