//! tracenet Runtime Prelude — convenient imports for common usage.
//!
//! ```rust
//! use tracenet_runtime::prelude::*;
//! ```

// Re-export the graph
pub use crate::connection::Connection;
pub use crate::neuron::Neuron;
pub use crate::table::IdentityTable;

// Re-export layers and networks
pub use crate::layer::{FanOut, GateKind, Layer, LayerConnection, Projection};
pub use crate::network::{Network, NetworkStats};

// Re-export builders
pub use crate::hopfield::Hopfield;
pub use crate::lstm::MemoryBlock;

// Re-export trainer
pub use crate::trainer::{EpochStats, Trainer, TrainerConfig, TrainingReport};

// Re-export from core
pub use tracenet_core::prelude::*;
