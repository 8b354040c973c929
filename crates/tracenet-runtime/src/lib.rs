//! # tracenet Runtime
//!
//! The neuron graph and its learning engine.
//!
//! Every neuron and connection of a network lives in one [`IdentityTable`]
//! and is addressed by identity. On top of that sit:
//!
//! - **Neurons** — second-order state update, eligibility and extended traces, gating
//! - **Layers** — ordered neuron groups, fan-out policies, gate kinds
//! - **Networks** — input, hidden and output layers driven forward and backward
//! - **Builders** — perceptron, Hopfield and LSTM topologies
//! - **Trainer** — epoch loop with a cost threshold and iteration budget
//!
//! ## Quick Start
//!
//! ```rust
//! use tracenet_runtime::prelude::*;
//!
//! let mut net = Network::perceptron(IdentityTable::with_seed(7), &[2, 3, 1]).unwrap();
//! let examples = vec![
//!     TrainSet::new([0.0, 0.0], [0.0]),
//!     TrainSet::new([1.0, 1.0], [1.0]),
//! ];
//! let report = Trainer::new(TrainerConfig::default()).train(&mut net, &examples).unwrap();
//! assert!(report.epochs > 0);
//! ```

pub mod connection;
pub mod hopfield;
pub mod layer;
pub mod lstm;
pub mod network;
pub mod neuron;
pub mod perceptron;
pub mod prelude;
pub mod table;
pub mod trainer;

pub use table::IdentityTable;
