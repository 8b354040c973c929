//! Built-in problems and dataset loading.

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use std::f64::consts::PI;
use std::path::Path;
use tracenet::prelude::*;

/// Built-in problems, each with its own topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    /// Exclusive or, 2-3-1 perceptron
    Xor,
    /// Logical and, single 2-1 layer
    And,
    /// Squashed sine over one period, 1-12-1 perceptron
    Sine,
    /// 7x7 digit bitmaps 1 to 5, Hopfield recall
    Digits,
    /// Repeat the previous bit of a sequence, LSTM with one 4-cell block
    LstmEcho,
}

/// A network ready to train: either a plain network or a Hopfield wrapper.
pub enum Model {
    Network(Network),
    Hopfield(Hopfield),
}

impl Model {
    pub fn network(&self) -> &Network {
        match self {
            Model::Network(net) => net,
            Model::Hopfield(hopfield) => hopfield.network(),
        }
    }

    pub fn trainable(&mut self) -> &mut dyn Trainable {
        match self {
            Model::Network(net) => net,
            Model::Hopfield(hopfield) => hopfield,
        }
    }

    pub fn stats(&self) -> NetworkStats {
        self.network().stats()
    }

    /// Set the squashing function of every neuron outside the input layer.
    pub fn set_squash(&mut self, squash: Squash) -> Result<()> {
        if squash == Squash::default() {
            return Ok(());
        }
        let Model::Network(net) = self else {
            bail!("Hopfield networks only support the default squashing function");
        };
        let layers: Vec<Layer> = net.layers().skip(1).cloned().collect();
        for layer in layers {
            layer.set_squash(net.table_mut(), squash)?;
        }
        Ok(())
    }
}

impl Preset {
    pub fn build(self, mut table: IdentityTable) -> Result<Model> {
        let model = match self {
            Preset::Xor => Model::Network(Network::perceptron(table, &[2, 3, 1])?),
            Preset::And => {
                let mut input = Layer::new(&mut table, 2);
                let output = Layer::new(&mut table, 1);
                input.project(&mut table, &output, FanOut::Auto)?;
                Model::Network(Network::new(table, input, Vec::new(), output)?)
            }
            Preset::Sine => Model::Network(Network::perceptron(table, &[1, 12, 1])?),
            Preset::Digits => Model::Hopfield(Hopfield::new(table, 49)?),
            Preset::LstmEcho => Model::Network(Network::lstm(table, 1, &[4], 1)?),
        };
        Ok(model)
    }

    pub fn examples(self) -> Vec<TrainSet> {
        match self {
            Preset::Xor => vec![
                TrainSet::new([0.0, 0.0], [0.0]),
                TrainSet::new([0.0, 1.0], [1.0]),
                TrainSet::new([1.0, 0.0], [1.0]),
                TrainSet::new([1.0, 1.0], [0.0]),
            ],
            Preset::And => vec![
                TrainSet::new([0.0, 0.0], [0.0]),
                TrainSet::new([0.0, 1.0], [0.0]),
                TrainSet::new([1.0, 0.0], [0.0]),
                TrainSet::new([1.0, 1.0], [1.0]),
            ],
            Preset::Sine => (0..100)
                .map(|i| {
                    let x = i as f64 * 2.0 * PI / 100.0;
                    TrainSet::new([x], [(x.sin() + 1.0) / 2.0])
                })
                .collect(),
            Preset::Digits => DIGITS
                .iter()
                .map(|image| {
                    let pattern = bitmap_to_vector(image);
                    TrainSet::new(pattern.clone(), pattern)
                })
                .collect(),
            Preset::LstmEcho => {
                let mut previous = 0.0;
                ECHO_SEQUENCE
                    .iter()
                    .map(|&bit| {
                        let example = TrainSet::new([bit], [previous]);
                        previous = bit;
                        example
                    })
                    .collect()
            }
        }
    }
}

/// Convert a bitmap drawn with `0` and `1` into a vector, ignoring every
/// other character (line breaks, spaces).
pub fn bitmap_to_vector(image: &str) -> Vec<f64> {
    image
        .chars()
        .filter_map(|c| match c {
            '0' => Some(0.0),
            '1' => Some(1.0),
            _ => None,
        })
        .collect()
}

/// Load a JSON array of examples.
pub fn load_examples(path: &Path) -> Result<Vec<TrainSet>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read dataset: {}", path.display()))?;
    let examples: Vec<TrainSet> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse dataset: {}", path.display()))?;
    if let Some(first) = examples.first() {
        for (i, example) in examples.iter().enumerate() {
            if example.input.len() != first.input.len() || example.output.len() != first.output.len() {
                bail!("Example {} does not have the same shape as example 0", i);
            }
        }
    }
    Ok(examples)
}

/// Layer sizes for a dataset: the explicit sizes, or input, twice the
/// input and output when none are given.
pub fn layer_sizes(examples: &[TrainSet], layers: Option<Vec<usize>>) -> Result<Vec<usize>> {
    let Some(first) = examples.first() else {
        bail!("Dataset is empty");
    };
    let (inputs, outputs) = (first.input.len(), first.output.len());
    let sizes = layers.unwrap_or_else(|| vec![inputs, inputs * 2, outputs]);
    if sizes.first() != Some(&inputs) || sizes.last() != Some(&outputs) {
        bail!(
            "Layer sizes {:?} do not match the dataset ({} inputs, {} outputs)",
            sizes,
            inputs,
            outputs
        );
    }
    Ok(sizes)
}

const DIGITS: [&str; 5] = [
    "0001000
     0001000
     0001000
     0001000
     0001000
     0001000
     0001000",
    "1111111
     0000001
     0000001
     1111111
     1000000
     1000000
     1111111",
    "1111111
     0000001
     0000001
     1111111
     0000001
     0000001
     1111111",
    "1000001
     1000001
     1000001
     1111111
     0000001
     0000001
     0000001",
    "1111111
     1000000
     1000000
     1111111
     0000001
     0000001
     1111111",
];

const ECHO_SEQUENCE: [f64; 16] = [
    1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 1.0, 0.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0,
];
