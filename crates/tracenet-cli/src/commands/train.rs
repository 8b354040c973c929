//! Train a network on a preset or a JSON dataset.

use anyhow::{Context, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::Path;
use tracenet::prelude::*;
use tracing::debug;

use crate::commands::inspect::print_stats;
use crate::config::Config;
use crate::datasets::{layer_sizes, load_examples, Model, Preset};

/// Where the network and examples come from.
pub enum Source {
    Preset(Preset),
    Data {
        path: String,
        layers: Option<Vec<usize>>,
    },
}

/// Command-line values that take precedence over tracenet.toml.
#[derive(Debug, Default)]
pub struct Overrides {
    pub rate: Option<f64>,
    pub iterations: Option<usize>,
    pub max_error: Option<f64>,
    pub cost: Option<String>,
    pub seed: Option<u64>,
}

impl Overrides {
    fn apply(self, config: &mut Config) -> Result<()> {
        if let Some(rate) = self.rate {
            config.trainer.learning_rate = rate;
        }
        if let Some(iterations) = self.iterations {
            config.trainer.iterations = iterations;
        }
        if let Some(max_error) = self.max_error {
            config.trainer.max_error_rate = max_error;
        }
        if let Some(cost) = self.cost {
            config.trainer.cost = cost.parse()?;
        }
        if let Some(seed) = self.seed {
            config.network.seed = Some(seed);
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct Prediction<'a> {
    input: &'a [f64],
    target: &'a [f64],
    output: Vec<f64>,
}

#[derive(Serialize)]
struct Summary<'a> {
    report: TrainingReport,
    stats: NetworkStats,
    predictions: Vec<Prediction<'a>>,
}

pub fn run(source: Source, overrides: Overrides, json: bool, verbose: bool) -> Result<()> {
    let mut config = Config::load()?;
    overrides.apply(&mut config)?;
    debug!("Trainer config: {:?}", config.trainer);

    let table = config.table();
    let (title, mut model, examples) = match source {
        Source::Preset(preset) => (format!("{:?}", preset), preset.build(table)?, preset.examples()),
        Source::Data { path, layers } => {
            let examples = load_examples(Path::new(&path))?;
            let sizes = layer_sizes(&examples, layers)?;
            let net = Network::perceptron(table, &sizes)
                .with_context(|| format!("Failed to build a perceptron with layers {:?}", sizes))?;
            (path, Model::Network(net), examples)
        }
    };
    model.set_squash(config.network.squash)?;

    let trainer = Trainer::new(config.trainer.clone());
    let report = if json {
        trainer.train(model.trainable(), &examples)?
    } else {
        println!(
            "{} Training {} on {} examples...",
            "→".blue(),
            title.cyan(),
            examples.len().to_string().cyan()
        );
        train_with_progress(&trainer, &mut model, &examples, verbose)?
    };

    let mut predictions = Vec::with_capacity(examples.len());
    for example in &examples {
        predictions.push(Prediction {
            input: &example.input,
            target: &example.output,
            output: model.trainable().activate(&example.input)?,
        });
    }

    if json {
        let summary = Summary {
            report,
            stats: model.stats(),
            predictions,
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!();
    if report.converged {
        println!(
            "{} Converged after {} epochs (error {:.6})",
            "✓".green().bold(),
            report.epochs.to_string().cyan(),
            report.error
        );
    } else {
        println!(
            "{} Stopped after {} epochs (error {:.6}, target {})",
            "•".yellow().bold(),
            report.epochs.to_string().cyan(),
            report.error,
            config.trainer.max_error_rate
        );
    }
    println!();

    println!("{}", "Predictions".blue().bold());
    for prediction in predictions.iter().take(MAX_PRINTED) {
        println!(
            "  {} → {} (want {})",
            format_vector(prediction.input),
            format_vector(&prediction.output).cyan(),
            format_vector(prediction.target)
        );
    }
    if predictions.len() > MAX_PRINTED {
        println!("  {} more", (predictions.len() - MAX_PRINTED).to_string().dimmed());
    }
    println!();

    print_stats("Network", &model.stats());
    Ok(())
}

const MAX_PRINTED: usize = 8;

fn train_with_progress(
    trainer: &Trainer,
    model: &mut Model,
    examples: &[TrainSet],
    verbose: bool,
) -> Result<TrainingReport> {
    let pb = ProgressBar::new(trainer.config().iterations as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} epochs {msg}")?
            .progress_chars("#>-"),
    );

    let log_every = trainer.config().log_every;
    let report = trainer.train_with(model.trainable(), examples, |stats| {
        pb.set_position(stats.epoch as u64);
        pb.set_message(format!("error {:.6}", stats.error));
        if verbose && log_every > 0 && stats.epoch % log_every == 0 {
            pb.println(format!("  epoch {}: error {:.6}", stats.epoch, stats.error));
        }
    })?;
    pb.finish_with_message("done");
    Ok(report)
}

fn format_vector(values: &[f64]) -> String {
    let cells: Vec<String> = values.iter().map(|v| format!("{:.3}", v)).collect();
    format!("[{}]", cells.join(", "))
}
