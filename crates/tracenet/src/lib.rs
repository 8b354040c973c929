//! # tracenet
//!
//! Neural networks of arbitrary topology, trained online with eligibility
//! traces so that recurrent and gated wiring learns with the same rule as
//! plain feed-forward layers.
//!
//! ## Quick Start
//!
//! ```rust
//! use tracenet::prelude::*;
//!
//! // 2 inputs, 3 hidden, 1 output
//! let mut net = Network::perceptron(IdentityTable::with_seed(1), &[2, 3, 1]).unwrap();
//!
//! let trainer = Trainer::new(TrainerConfig {
//!     learning_rate: 0.3,
//!     iterations: 2_000,
//!     ..TrainerConfig::default()
//! });
//! let report = trainer.train(&mut net, &[
//!     TrainSet::new([0.0, 0.0], [0.0]),
//!     TrainSet::new([0.0, 1.0], [1.0]),
//!     TrainSet::new([1.0, 0.0], [1.0]),
//!     TrainSet::new([1.0, 1.0], [0.0]),
//! ]).unwrap();
//!
//! println!("{} epochs, error {:.4}", report.epochs, report.error);
//! ```
//!
//! ## Architecture
//!
//! - [`tracenet_core`] - identities, error taxonomy, squashing and cost strategies, the `Trainable` contract
//! - [`tracenet_runtime`] - identity table, neuron engine, layers, networks, builders, trainer
//!
//! ## Key Concepts
//!
//! | Concept | What It Does |
//! |---------|--------------|
//! | Identity table | Owns every neuron and connection of one network; elements refer to each other by id |
//! | Eligibility trace | Per incoming connection, how much it recently fed the neuron's recurrent state |
//! | Extended trace | Per gated neighbour and connection, credit routed through a gate |
//! | Gain | Connection multiplier, overwritten by the gater's activation each step |
//!
//! ### Topologies
//!
//! - **Perceptron** - `Network::perceptron(table, &[2, 3, 1])`
//! - **Hopfield** - `Hopfield::new(table, 49)`, binary recall of stored patterns
//! - **LSTM** - `Network::lstm(table, inputs, &[cells_per_block], outputs)`
//!
//! Custom topologies are built from [`Layer`](tracenet_runtime::layer::Layer)s
//! with `project` and `gate`, then assembled with `Network::new`.

// Re-export all subcrates
pub use tracenet_core as core;
pub use tracenet_runtime as runtime;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports.
///
/// ```rust
/// use tracenet::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use tracenet_core::types::{ConnectionId, NeuronId, TrainSet};

    // Strategies and contracts
    pub use tracenet_core::cost::{Cost, Coster};
    pub use tracenet_core::squash::{Squash, Squasher};
    pub use tracenet_core::trainable::Trainable;

    // Error types
    pub use tracenet_core::error::{NetworkError, Result};

    // Graph
    pub use tracenet_runtime::connection::Connection;
    pub use tracenet_runtime::neuron::Neuron;
    pub use tracenet_runtime::table::IdentityTable;

    // Layers and networks
    pub use tracenet_runtime::layer::{FanOut, GateKind, Layer, LayerConnection, Projection};
    pub use tracenet_runtime::network::{Network, NetworkStats};
    pub use tracenet_runtime::hopfield::Hopfield;
    pub use tracenet_runtime::lstm::MemoryBlock;

    // Training
    pub use tracenet_runtime::trainer::{EpochStats, Trainer, TrainerConfig, TrainingReport};
}
