//! Networks — an input layer, ordered hidden layers and an output layer
//! sharing one identity table.

use crate::layer::{FanOut, Layer, Projection};
use crate::table::IdentityTable;
use serde::{Deserialize, Serialize};
use tracenet_core::error::{NetworkError, Result};
use tracenet_core::trainable::Trainable;

/// A layered network that owns its identity table.
#[derive(Debug, Clone)]
pub struct Network {
    table: IdentityTable,
    input: Layer,
    hidden: Vec<Layer>,
    output: Layer,
}

/// Size summary of a network.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkStats {
    pub input_size: usize,
    pub hidden_sizes: Vec<usize>,
    pub output_size: usize,
    pub neurons: usize,
    /// Every registered connection, inactive self-connections included.
    pub connections: usize,
    pub gated_connections: usize,
    /// Self-connections with a non-zero weight.
    pub recurrent_connections: usize,
}

impl Network {
    /// Assemble a network from layers whose neurons live in `table`.
    pub fn new(table: IdentityTable, input: Layer, hidden: Vec<Layer>, output: Layer) -> Result<Self> {
        for layer in std::iter::once(&input).chain(&hidden).chain(std::iter::once(&output)) {
            for &id in layer.neurons() {
                table.try_neuron(id)?;
            }
        }
        Ok(Self {
            table,
            input,
            hidden,
            output,
        })
    }

    pub fn input(&self) -> &Layer {
        &self.input
    }

    pub fn hidden(&self) -> &[Layer] {
        &self.hidden
    }

    pub fn output(&self) -> &Layer {
        &self.output
    }

    /// All layers in activation order.
    pub fn layers(&self) -> impl Iterator<Item = &Layer> {
        std::iter::once(&self.input)
            .chain(&self.hidden)
            .chain(std::iter::once(&self.output))
    }

    pub fn table(&self) -> &IdentityTable {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut IdentityTable {
        &mut self.table
    }

    /// Feed `input` forward: the input layer is clamped to it, every hidden
    /// layer then activates in order, and the output activations are returned.
    pub fn activate(&mut self, input: &[f64]) -> Result<Vec<f64>> {
        self.input.activate(&mut self.table, Some(input))?;
        for layer in &self.hidden {
            layer.activate(&mut self.table, None)?;
        }
        self.output.activate(&mut self.table, None)
    }

    /// Propagate error against `target` from the output layer back through
    /// the hidden layers in reverse order.
    pub fn propagate(&mut self, rate: f64, target: &[f64]) -> Result<()> {
        self.output.propagate(&mut self.table, rate, Some(target))?;
        for layer in self.hidden.iter().rev() {
            layer.propagate(&mut self.table, rate, None)?;
        }
        Ok(())
    }

    /// Project the output layer onto another layer of this network's table.
    pub fn project_layer(&mut self, target: &Layer, fan_out: FanOut) -> Result<Projection> {
        for &id in target.neurons() {
            self.table.try_neuron(id)?;
        }
        self.output.project(&mut self.table, target, fan_out)
    }

    pub fn stats(&self) -> NetworkStats {
        let connections = self.table.connections();
        let (mut total, mut gated, mut recurrent) = (0, 0, 0);
        for conn in connections {
            total += 1;
            if conn.gater().is_some() {
                gated += 1;
            }
            if conn.is_self_connection() && conn.weight() != 0.0 {
                recurrent += 1;
            }
        }
        NetworkStats {
            input_size: self.input.len(),
            hidden_sizes: self.hidden.iter().map(Layer::len).collect(),
            output_size: self.output.len(),
            neurons: self.table.neuron_count(),
            connections: total,
            gated_connections: gated,
            recurrent_connections: recurrent,
        }
    }
}

impl Trainable for Network {
    fn activate(&mut self, input: &[f64]) -> Result<Vec<f64>> {
        Network::activate(self, input)
    }

    fn propagate(&mut self, rate: f64, target: &[f64]) -> Result<()> {
        Network::propagate(self, rate, target)
    }

    fn input_size(&self) -> usize {
        self.input.len()
    }

    fn output_size(&self) -> usize {
        self.output.len()
    }
}

/// Reject builder requests with fewer than `minimum` layer sizes.
pub(crate) fn require_sizes(sizes: &[usize], minimum: usize, what: &str) -> Result<()> {
    if sizes.len() < minimum {
        return Err(NetworkError::invalid_topology(format!(
            "{what} needs at least {minimum} layer sizes, got {}",
            sizes.len()
        )));
    }
    Ok(())
}
