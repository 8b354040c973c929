//! tracenet CLI - train and inspect neural networks from the command line.

mod commands;
mod config;
mod datasets;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use datasets::Preset;

#[derive(Parser)]
#[command(name = "tracenet")]
#[command(author, version, about = "tracenet - neural networks trained with eligibility traces", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (debug logging unless RUST_LOG is set)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default tracenet.toml
    Init {
        /// Project directory (default: current directory)
        #[arg(short, long)]
        path: Option<String>,
    },

    /// Train a network on a preset or a JSON dataset
    Train {
        /// Built-in problem to train on
        #[arg(value_enum, required_unless_present = "data")]
        preset: Option<Preset>,

        /// JSON file holding an array of {"input": [..], "output": [..]} examples
        #[arg(short, long, conflicts_with = "preset")]
        data: Option<String>,

        /// Perceptron layer sizes for --data, e.g. "2,3,1"
        #[arg(short, long, value_delimiter = ',')]
        layers: Option<Vec<usize>>,

        /// Learning rate (overrides tracenet.toml)
        #[arg(short, long)]
        rate: Option<f64>,

        /// Maximum number of epochs (overrides tracenet.toml)
        #[arg(short, long)]
        iterations: Option<usize>,

        /// Mean cost at which training stops (overrides tracenet.toml)
        #[arg(short = 'e', long)]
        max_error: Option<f64>,

        /// Cost function: mse, cross_entropy or binary (overrides tracenet.toml)
        #[arg(short, long)]
        cost: Option<String>,

        /// Seed for initial weights (overrides tracenet.toml)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the topology of a preset network
    Inspect {
        /// Built-in network to describe
        #[arg(value_enum)]
        preset: Preset,

        /// Print the statistics as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Init { path } => commands::init::run(path),
        Commands::Train {
            preset,
            data,
            layers,
            rate,
            iterations,
            max_error,
            cost,
            seed,
            json,
        } => {
            let source = match (preset, data) {
                (Some(preset), _) => commands::train::Source::Preset(preset),
                (None, Some(path)) => commands::train::Source::Data { path, layers },
                (None, None) => anyhow::bail!("Either a preset or --data is required"),
            };
            let overrides = commands::train::Overrides {
                rate,
                iterations,
                max_error,
                cost,
                seed,
            };
            commands::train::run(source, overrides, json, cli.verbose)
        }
        Commands::Inspect { preset, json } => commands::inspect::run(preset, json),
    }
}
