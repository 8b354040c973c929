//! Squashing (activation) functions.
//!
//! A squashing function maps a neuron's accumulated state to its activation,
//! usually bounding it at one or both ends so the network can model
//! non-linear relationships. The neuron engine also needs the derivative at
//! the same point, so one call serves both.

use crate::error::NetworkError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The squashing contract consumed by the neuron engine.
pub trait Squasher {
    /// Squash `x`. When `derivative` is true, return f'(x) instead of f(x).
    fn squash(&self, x: f64, derivative: bool) -> f64;
}

/// The closed set of squashing functions a neuron can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Squash {
    /// `1 / (1 + e^-x)`, derivative `fx (1 - fx)`.
    #[default]
    Logistic,
    /// `tanh(x)`, derivative `1 - tanh(x)^2`.
    Tanh,
    /// `x`, derivative `1`.
    Identity,
    /// `max(x, 0)`, derivative `1` for positive x and `0` otherwise.
    Relu,
}

impl Squasher for Squash {
    fn squash(&self, x: f64, derivative: bool) -> f64 {
        match self {
            Squash::Logistic => {
                let fx = 1.0 / (1.0 + (-x).exp());
                if derivative {
                    fx * (1.0 - fx)
                } else {
                    fx
                }
            }
            Squash::Tanh => {
                let fx = x.tanh();
                if derivative {
                    1.0 - fx * fx
                } else {
                    fx
                }
            }
            Squash::Identity => {
                if derivative {
                    1.0
                } else {
                    x
                }
            }
            Squash::Relu => match (x > 0.0, derivative) {
                (true, true) => 1.0,
                (true, false) => x,
                (false, _) => 0.0,
            },
        }
    }
}

impl Squash {
    pub const ALL: [Squash; 4] = [Squash::Logistic, Squash::Tanh, Squash::Identity, Squash::Relu];

    pub fn name(&self) -> &'static str {
        match self {
            Squash::Logistic => "logistic",
            Squash::Tanh => "tanh",
            Squash::Identity => "identity",
            Squash::Relu => "relu",
        }
    }
}

impl fmt::Display for Squash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Squash {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Squash::ALL
            .into_iter()
            .find(|squash| squash.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| NetworkError::invalid_topology(format!("unknown squashing function '{}'", s)))
    }
}
