//! Long short-term memory builder.
//!
//! Each memory block is four co-sized hidden layers, stored in the order
//! input gate, forget gate, memory cell, output gate. Blocks are chained
//! through their memory cells.

use crate::layer::{FanOut, GateKind, Layer, LayerConnection, Projection};
use crate::network::Network;
use crate::table::IdentityTable;
use tracenet_core::error::{NetworkError, Result};
use tracing::debug;

/// Bias every gate layer starts with, so gates begin mostly open.
const GATE_BIAS: f64 = 1.0;

/// Layer indices of one block within [`Network::hidden`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryBlock {
    pub input_gate: usize,
    pub forget_gate: usize,
    pub memory_cell: usize,
    pub output_gate: usize,
}

impl MemoryBlock {
    /// Indices of the block with position `block` in the network.
    pub fn at(block: usize) -> Self {
        let base = block * 4;
        Self {
            input_gate: base,
            forget_gate: base + 1,
            memory_cell: base + 2,
            output_gate: base + 3,
        }
    }
}

impl Network {
    /// Build an LSTM network with one memory block per entry of
    /// `memory_blocks`, each entry giving the number of cells in that block.
    pub fn lstm(
        mut table: IdentityTable,
        input_size: usize,
        memory_blocks: &[usize],
        output_size: usize,
    ) -> Result<Network> {
        let mut input = Layer::new(&mut table, input_size);
        let output = Layer::new(&mut table, output_size);
        let mut hidden: Vec<Layer> = Vec::with_capacity(memory_blocks.len() * 4);
        let mut previous_cell: Option<usize> = None;

        for &cells in memory_blocks {
            let input_gate = Layer::new(&mut table, cells);
            input_gate.set_bias(&mut table, GATE_BIAS)?;
            let forget_gate = Layer::new(&mut table, cells);
            forget_gate.set_bias(&mut table, GATE_BIAS)?;
            let output_gate = Layer::new(&mut table, cells);
            output_gate.set_bias(&mut table, GATE_BIAS)?;
            let mut memory_cell = Layer::new(&mut table, cells);

            // from the input layer
            let input_bundle = created(
                input.project(&mut table, &memory_cell, FanOut::Auto)?,
                "input to memory cell",
            )?;
            input.project(&mut table, &input_gate, FanOut::Auto)?;
            input.project(&mut table, &forget_gate, FanOut::Auto)?;
            input.project(&mut table, &output_gate, FanOut::Auto)?;

            // from the previous block
            let cell_bundle = match previous_cell {
                Some(index) => {
                    let previous = &mut hidden[index];
                    let bundle = previous.project(&mut table, &memory_cell, FanOut::Auto)?;
                    previous.project(&mut table, &input_gate, FanOut::Auto)?;
                    previous.project(&mut table, &forget_gate, FanOut::Auto)?;
                    previous.project(&mut table, &output_gate, FanOut::Auto)?;
                    Some(created(bundle, "previous memory cell to memory cell")?)
                }
                None => None,
            };

            // from the memory cell
            let output_bundle = created(
                memory_cell.project(&mut table, &output, FanOut::Auto)?,
                "memory cell to output",
            )?;
            let self_bundle = created(
                memory_cell.project_onto_self(&mut table, FanOut::Auto)?,
                "memory cell to itself",
            )?;

            // peepholes
            memory_cell.project(&mut table, &input_gate, FanOut::AllToAll)?;
            memory_cell.project(&mut table, &forget_gate, FanOut::AllToAll)?;
            memory_cell.project(&mut table, &output_gate, FanOut::AllToAll)?;

            input_gate.gate(&mut table, &input_bundle, GateKind::Input)?;
            forget_gate.gate(&mut table, &self_bundle, GateKind::SelfConnection)?;
            output_gate.gate(&mut table, &output_bundle, GateKind::Output)?;
            if let Some(bundle) = &cell_bundle {
                input_gate.gate(&mut table, bundle, GateKind::Input)?;
            }

            hidden.push(input_gate);
            hidden.push(forget_gate);
            hidden.push(memory_cell);
            hidden.push(output_gate);
            previous_cell = Some(hidden.len() - 2);
        }

        input.project(&mut table, &output, FanOut::Auto)?;

        debug!(input_size, ?memory_blocks, output_size, "built lstm network");
        Network::new(table, input, hidden, output)
    }
}

fn created(projection: Projection, what: &str) -> Result<LayerConnection> {
    projection
        .into_connection()
        .ok_or_else(|| NetworkError::invalid_topology(format!("{what} was already connected")))
}
