//! Layers — ordered groups of neurons that activate and learn together.
//!
//! A layer only owns neuron identities. Wiring between layers is recorded
//! as a [`LayerConnection`] bundle, which is what gating operates on.

use crate::table::IdentityTable;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracenet_core::error::{NetworkError, Result};
use tracenet_core::squash::Squash;
use tracenet_core::types::{ConnectionId, NeuronId};
use tracing::debug;

/// How neurons of one layer are paired with neurons of another.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FanOut {
    /// One-to-one onto the same layer, all-to-all otherwise.
    #[default]
    Auto,
    /// Position `i` projects only to position `i`; surplus positions stay unconnected.
    OneToOne,
    AllToAll,
    /// All-to-all, skipping pairs where a neuron would project onto itself.
    AllButSelf,
}

impl FanOut {
    pub fn name(self) -> &'static str {
        match self {
            FanOut::Auto => "auto",
            FanOut::OneToOne => "one_to_one",
            FanOut::AllToAll => "all_to_all",
            FanOut::AllButSelf => "all_but_self",
        }
    }
}

impl fmt::Display for FanOut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FanOut {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "auto" => Ok(FanOut::Auto),
            "one_to_one" => Ok(FanOut::OneToOne),
            "all_to_all" => Ok(FanOut::AllToAll),
            "all_but_self" => Ok(FanOut::AllButSelf),
            other => Err(NetworkError::invalid_topology(format!(
                "unknown fan-out policy '{other}'"
            ))),
        }
    }
}

/// Which connections of a bundle each gating neuron controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateKind {
    /// Gater `i` controls every bundle connection arriving at target `i`.
    Input,
    /// Gater `i` controls the self-connection of target `i`.
    SelfConnection,
    /// Gater `i` controls every bundle connection leaving source `i`.
    Output,
}

/// The connections created by one layer-to-layer projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerConnection {
    pub from: Vec<NeuronId>,
    pub to: Vec<NeuronId>,
    /// Policy the projection actually used (`Auto` is resolved).
    pub fan_out: FanOut,
    pub connections: Vec<ConnectionId>,
}

impl LayerConnection {
    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    pub fn contains(&self, connection: ConnectionId) -> bool {
        self.connections.contains(&connection)
    }
}

/// Result of [`Layer::project`].
#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    Created(LayerConnection),
    /// Some pair of neurons was already connected; nothing was wired.
    AlreadyConnected,
}

impl Projection {
    pub fn connection(&self) -> Option<&LayerConnection> {
        match self {
            Projection::Created(bundle) => Some(bundle),
            Projection::AlreadyConnected => None,
        }
    }

    pub fn into_connection(self) -> Option<LayerConnection> {
        match self {
            Projection::Created(bundle) => Some(bundle),
            Projection::AlreadyConnected => None,
        }
    }
}

/// An ordered group of neurons living in one identity table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layer {
    neurons: Vec<NeuronId>,
    connected_to: Vec<LayerConnection>,
}

impl Layer {
    /// Create `size` fresh neurons in `table`.
    pub fn new(table: &mut IdentityTable, size: usize) -> Self {
        let neurons = (0..size).map(|_| table.create_neuron()).collect();
        Self::from_neurons(neurons)
    }

    /// Wrap neurons that already exist in a table.
    pub fn from_neurons(neurons: Vec<NeuronId>) -> Self {
        Self {
            neurons,
            connected_to: Vec::new(),
        }
    }

    pub fn neurons(&self) -> &[NeuronId] {
        &self.neurons
    }

    /// Bundles this layer has projected, in creation order.
    pub fn connected_to(&self) -> &[LayerConnection] {
        &self.connected_to
    }

    pub fn len(&self) -> usize {
        self.neurons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neurons.is_empty()
    }

    pub fn set_bias(&self, table: &mut IdentityTable, bias: f64) -> Result<()> {
        for &id in &self.neurons {
            table.try_neuron_mut(id)?.set_bias(bias);
        }
        Ok(())
    }

    pub fn set_squash(&self, table: &mut IdentityTable, squash: Squash) -> Result<()> {
        for &id in &self.neurons {
            table.try_neuron_mut(id)?.set_squash(squash);
        }
        Ok(())
    }

    /// Activate every neuron, clamped to `inputs` when given.
    ///
    /// A length mismatch is reported before any neuron is touched.
    pub fn activate(&self, table: &mut IdentityTable, inputs: Option<&[f64]>) -> Result<Vec<f64>> {
        match inputs {
            Some(inputs) => {
                self.check_len("activate", inputs)?;
                self.neurons
                    .iter()
                    .zip(inputs)
                    .map(|(&id, &x)| table.activate_neuron(id, Some(x)))
                    .collect()
            }
            None => self
                .neurons
                .iter()
                .map(|&id| table.activate_neuron(id, None))
                .collect(),
        }
    }

    /// Propagate error through every neuron, last neuron first.
    pub fn propagate(&self, table: &mut IdentityTable, rate: f64, targets: Option<&[f64]>) -> Result<()> {
        if let Some(targets) = targets {
            self.check_len("propagate", targets)?;
        }
        for (i, &id) in self.neurons.iter().enumerate().rev() {
            table.propagate_neuron(id, rate, targets.map(|t| t[i]))?;
        }
        Ok(())
    }

    /// Project this layer onto `target`.
    ///
    /// Returns [`Projection::AlreadyConnected`] without wiring anything when
    /// any neuron of this layer is already connected to any neuron of the target.
    pub fn project(&mut self, table: &mut IdentityTable, target: &Layer, fan_out: FanOut) -> Result<Projection> {
        self.project_neurons(table, &target.neurons, fan_out)
    }

    /// Project this layer onto itself (one-to-one under `Auto`), switching on
    /// each neuron's self-connection.
    pub fn project_onto_self(&mut self, table: &mut IdentityTable, fan_out: FanOut) -> Result<Projection> {
        let own = self.neurons.clone();
        self.project_neurons(table, &own, fan_out)
    }

    fn project_neurons(&mut self, table: &mut IdentityTable, to: &[NeuronId], fan_out: FanOut) -> Result<Projection> {
        if self.is_connected_to(table, to)? {
            debug!(from = self.len(), to = to.len(), "layers already connected");
            return Ok(Projection::AlreadyConnected);
        }

        let fan_out = match fan_out {
            FanOut::Auto if self.neurons == to => FanOut::OneToOne,
            FanOut::Auto => FanOut::AllToAll,
            other => other,
        };

        let mut connections = Vec::new();
        match fan_out {
            FanOut::OneToOne => {
                for (&from, &target) in self.neurons.iter().zip(to) {
                    connections.push(table.project(from, target, None)?);
                }
            }
            FanOut::AllToAll | FanOut::AllButSelf | FanOut::Auto => {
                for &from in &self.neurons {
                    for &target in to {
                        if fan_out == FanOut::AllButSelf && from == target {
                            continue;
                        }
                        connections.push(table.project(from, target, None)?);
                    }
                }
            }
        }

        debug!(
            from = self.len(),
            to = to.len(),
            %fan_out,
            connections = connections.len(),
            "projected layer"
        );
        let bundle = LayerConnection {
            from: self.neurons.clone(),
            to: to.to_vec(),
            fan_out,
            connections,
        };
        self.connected_to.push(bundle.clone());
        Ok(Projection::Created(bundle))
    }

    /// Whether any neuron here already has a connection with any neuron of `target`.
    pub fn is_connected(&self, table: &IdentityTable, target: &Layer) -> Result<bool> {
        self.is_connected_to(table, &target.neurons)
    }

    fn is_connected_to(&self, table: &IdentityTable, to: &[NeuronId]) -> Result<bool> {
        for &from in &self.neurons {
            for &target in to {
                if table.connection_for_neuron(from, target)?.is_some() {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    /// Let this layer's neurons gate the connections of `bundle`, pairing
    /// gater `i` with position `i` on the side `kind` selects.
    pub fn gate(&self, table: &mut IdentityTable, bundle: &LayerConnection, kind: GateKind) -> Result<()> {
        let side = match kind {
            GateKind::Input | GateKind::SelfConnection => &bundle.to,
            GateKind::Output => &bundle.from,
        };
        if side.len() != self.len() {
            return Err(NetworkError::shape_mismatch("gate", self.len(), side.len()));
        }

        let mut gated = 0;
        for (&gater, &neuron) in self.neurons.iter().zip(side) {
            let targets: Vec<ConnectionId> = {
                let neuron = table.try_neuron(neuron)?;
                match kind {
                    GateKind::Input => neuron
                        .inputs()
                        .iter()
                        .copied()
                        .filter(|&cid| bundle.contains(cid))
                        .collect(),
                    GateKind::Output => neuron
                        .projected()
                        .iter()
                        .copied()
                        .filter(|&cid| bundle.contains(cid))
                        .collect(),
                    GateKind::SelfConnection => vec![neuron.self_connection()],
                }
            };
            for cid in targets {
                table.gate(gater, cid)?;
                gated += 1;
            }
        }

        debug!(gaters = self.len(), ?kind, gated, "gated layer connection");
        Ok(())
    }

    fn check_len(&self, operation: &'static str, values: &[f64]) -> Result<()> {
        if values.len() != self.len() {
            return Err(NetworkError::shape_mismatch(operation, self.len(), values.len()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> IdentityTable {
        IdentityTable::with_seed(11)
    }

    #[test]
    fn fan_out_names_parse() {
        assert_eq!("auto".parse::<FanOut>().unwrap(), FanOut::Auto);
        assert_eq!("one-to-one".parse::<FanOut>().unwrap(), FanOut::OneToOne);
        assert_eq!("ALL_TO_ALL".parse::<FanOut>().unwrap(), FanOut::AllToAll);
        assert_eq!(FanOut::AllButSelf.to_string().parse::<FanOut>().unwrap(), FanOut::AllButSelf);
        assert!(matches!(
            "sideways".parse::<FanOut>(),
            Err(NetworkError::InvalidTopology(_))
        ));
    }

    #[test]
    fn all_to_all_connects_every_pair() {
        let mut table = table();
        let mut a = Layer::new(&mut table, 2);
        let b = Layer::new(&mut table, 3);
        let bundle = a.project(&mut table, &b, FanOut::Auto).unwrap().into_connection().unwrap();
        assert_eq!(bundle.fan_out, FanOut::AllToAll);
        assert_eq!(bundle.len(), 6);
        assert_eq!(a.connected_to().len(), 1);
        assert!(a.is_connected(&table, &b).unwrap());
    }

    #[test]
    fn one_to_one_ignores_surplus_positions() {
        let mut table = table();
        let mut a = Layer::new(&mut table, 3);
        let b = Layer::new(&mut table, 2);
        let bundle = a.project(&mut table, &b, FanOut::OneToOne).unwrap().into_connection().unwrap();
        assert_eq!(bundle.len(), 2);
        let first = table.connection(bundle.connections[0]).unwrap();
        assert_eq!((first.from(), first.to()), (a.neurons()[0], b.neurons()[0]));
    }

    #[test]
    fn all_but_self_skips_self_pairs() {
        let mut table = table();
        let mut a = Layer::new(&mut table, 3);
        let bundle = a
            .project_onto_self(&mut table, FanOut::AllButSelf)
            .unwrap()
            .into_connection()
            .unwrap();
        assert_eq!(bundle.len(), 6);
        for &cid in &bundle.connections {
            assert!(!table.connection(cid).unwrap().is_self_connection());
        }
    }

    #[test]
    fn auto_onto_self_switches_on_self_connections() {
        let mut table = table();
        let mut a = Layer::new(&mut table, 2);
        let before = table.connection_count();
        let bundle = a.project_onto_self(&mut table, FanOut::Auto).unwrap().into_connection().unwrap();
        assert_eq!(bundle.fan_out, FanOut::OneToOne);
        assert_eq!(table.connection_count(), before);
        for (&id, &cid) in a.neurons().iter().zip(&bundle.connections) {
            assert_eq!(cid, table.neuron(id).unwrap().self_connection());
            assert_eq!(table.connection(cid).unwrap().weight(), 1.0);
        }
    }

    #[test]
    fn second_projection_reports_already_connected() {
        let mut table = table();
        let mut a = Layer::new(&mut table, 2);
        let b = Layer::new(&mut table, 2);
        a.project(&mut table, &b, FanOut::AllToAll).unwrap();
        let count = table.connection_count();
        assert_eq!(
            a.project(&mut table, &b, FanOut::AllToAll).unwrap(),
            Projection::AlreadyConnected
        );
        assert_eq!(table.connection_count(), count);
        assert_eq!(a.connected_to().len(), 1);
    }

    #[test]
    fn activate_rejects_wrong_length_without_mutation() {
        let mut table = table();
        let a = Layer::new(&mut table, 3);
        let err = a.activate(&mut table, Some(&[1.0, 2.0][..])).unwrap_err();
        assert_eq!(err, NetworkError::shape_mismatch("activate", 3, 2));
        for &id in a.neurons() {
            assert_eq!(table.neuron(id).unwrap().activation(), 0.0);
        }
        assert!(a.propagate(&mut table, 0.1, Some(&[1.0][..])).is_err());
    }

    #[test]
    fn clamped_activation_returns_inputs() {
        let mut table = table();
        let a = Layer::new(&mut table, 3);
        assert_eq!(a.activate(&mut table, Some(&[0.1, 0.2, 0.3][..])).unwrap(), vec![0.1, 0.2, 0.3]);
        assert_eq!(a.activate(&mut table, None).unwrap().len(), 3);
    }

    #[test]
    fn input_gating_pairs_gater_with_target() {
        let mut table = table();
        let mut source = Layer::new(&mut table, 2);
        let target = Layer::new(&mut table, 2);
        let gates = Layer::new(&mut table, 2);
        let bundle = source.project(&mut table, &target, FanOut::AllToAll).unwrap().into_connection().unwrap();
        gates.gate(&mut table, &bundle, GateKind::Input).unwrap();

        for &cid in &bundle.connections {
            let conn = table.connection(cid).unwrap();
            let position = target.neurons().iter().position(|&n| n == conn.to()).unwrap();
            assert_eq!(conn.gater(), Some(gates.neurons()[position]));
        }
        assert_eq!(table.neuron(gates.neurons()[0]).unwrap().gated().len(), 2);
    }

    #[test]
    fn output_gating_pairs_gater_with_source() {
        let mut table = table();
        let mut source = Layer::new(&mut table, 2);
        let target = Layer::new(&mut table, 3);
        let gates = Layer::new(&mut table, 2);
        let bundle = source.project(&mut table, &target, FanOut::AllToAll).unwrap().into_connection().unwrap();
        gates.gate(&mut table, &bundle, GateKind::Output).unwrap();

        for &cid in &bundle.connections {
            let conn = table.connection(cid).unwrap();
            let position = source.neurons().iter().position(|&n| n == conn.from()).unwrap();
            assert_eq!(conn.gater(), Some(gates.neurons()[position]));
        }
    }

    #[test]
    fn self_connection_gating_targets_self_loops() {
        let mut table = table();
        let mut cells = Layer::new(&mut table, 2);
        let gates = Layer::new(&mut table, 2);
        let bundle = cells.project_onto_self(&mut table, FanOut::Auto).unwrap().into_connection().unwrap();
        gates.gate(&mut table, &bundle, GateKind::SelfConnection).unwrap();
        for (&cell, &gater) in cells.neurons().iter().zip(gates.neurons()) {
            let own = table.neuron(cell).unwrap().self_connection();
            assert_eq!(table.connection(own).unwrap().gater(), Some(gater));
        }
    }

    #[test]
    fn gating_with_mismatched_layer_fails_first() {
        let mut table = table();
        let mut source = Layer::new(&mut table, 2);
        let target = Layer::new(&mut table, 2);
        let gates = Layer::new(&mut table, 3);
        let bundle = source.project(&mut table, &target, FanOut::AllToAll).unwrap().into_connection().unwrap();
        assert_eq!(
            gates.gate(&mut table, &bundle, GateKind::Input),
            Err(NetworkError::shape_mismatch("gate", 3, 2))
        );
        assert!(bundle.connections.iter().all(|&c| table.connection(c).unwrap().gater().is_none()));
    }
}
