//! # tracenet Core
//!
//! Core types, numeric strategies and contracts shared by every tracenet crate.
//!
//! This crate holds no graph state. It defines what the runtime is built from:
//!
//! - **Identities** — `NeuronId` / `ConnectionId`, dense indices issued by an identity table
//! - **Squashing** — activation functions and their derivatives (`Squash`)
//! - **Cost** — scalar loss over a target/output pair (`Cost`)
//! - **Trainable** — the activate/propagate contract the trainer drives
//! - **Errors** — shape mismatches, invalid topologies, identity-table misses
//!
//! ## Quick Start
//!
//! ```rust
//! use tracenet_core::prelude::*;
//!
//! assert_eq!(Squash::Logistic.squash(0.0, false), 0.5);
//! assert_eq!(Cost::MeanSquaredError.cost(&[1.0, 0.0], &[1.0, 0.0]), 0.0);
//! ```

pub mod cost;
pub mod error;
pub mod prelude;
pub mod squash;
pub mod trainable;
pub mod types;
