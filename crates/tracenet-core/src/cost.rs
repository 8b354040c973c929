//! Cost functions used by the trainer.

use crate::error::NetworkError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Added inside the logarithms of cross-entropy so `ln(0)` never happens.
const NUDGE: f64 = 1e-15;

/// The cost contract consumed by the trainer.
pub trait Coster {
    /// Cost of `output` against `target`. Both slices have the same length.
    fn cost(&self, target: &[f64], output: &[f64]) -> f64;
}

/// The closed set of cost functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cost {
    /// `mean((t - o)^2)`.
    #[default]
    #[serde(rename = "mse", alias = "mean_squared_error")]
    MeanSquaredError,
    /// `-sum(t ln(o + e) + (1 - t) ln(1 + e - o))`.
    CrossEntropy,
    /// Number of positions where `round(2t) != round(2o)`.
    Binary,
}

impl Coster for Cost {
    fn cost(&self, target: &[f64], output: &[f64]) -> f64 {
        match self {
            Cost::MeanSquaredError => {
                if output.is_empty() {
                    return 0.0;
                }
                let sum: f64 = target
                    .iter()
                    .zip(output)
                    .map(|(t, o)| (t - o).powi(2))
                    .sum();
                sum / output.len() as f64
            }
            Cost::CrossEntropy => target
                .iter()
                .zip(output)
                .map(|(t, o)| -(t * (o + NUDGE).ln() + (1.0 - t) * ((1.0 + NUDGE) - o).ln()))
                .sum(),
            Cost::Binary => target
                .iter()
                .zip(output)
                .filter(|(t, o)| round_half_up(2.0 * **t) != round_half_up(2.0 * **o))
                .count() as f64,
        }
    }
}

fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

impl Cost {
    pub const ALL: [Cost; 3] = [Cost::MeanSquaredError, Cost::CrossEntropy, Cost::Binary];

    pub fn name(&self) -> &'static str {
        match self {
            Cost::MeanSquaredError => "mse",
            Cost::CrossEntropy => "cross_entropy",
            Cost::Binary => "binary",
        }
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Cost {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.to_ascii_lowercase().replace('-', "_");
        if normalized == "mean_squared_error" {
            return Ok(Cost::MeanSquaredError);
        }
        Cost::ALL
            .into_iter()
            .find(|cost| cost.name() == normalized)
            .ok_or_else(|| NetworkError::invalid_topology(format!("unknown cost function '{}'", s)))
    }
}
