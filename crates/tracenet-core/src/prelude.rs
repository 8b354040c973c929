//! tracenet Core Prelude — convenient imports for common usage.
//!
//! ```rust
//! use tracenet_core::prelude::*;
//! ```

// Re-export commonly used types
pub use crate::types::{ConnectionId, NeuronId, TrainSet};

// Re-export the numeric strategies and their contracts
pub use crate::cost::{Cost, Coster};
pub use crate::squash::{Squash, Squasher};

// Re-export the Trainable trait
pub use crate::trainable::Trainable;

// Re-export error types
pub use crate::error::{NetworkError, Result};
