//! Initialize a tracenet project.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;

use crate::config::{Config, CONFIG_FILE};

pub fn run(path: Option<String>) -> Result<()> {
    let base_path = match path {
        Some(p) => PathBuf::from(p),
        None => std::env::current_dir().context("Failed to read the current directory")?,
    };

    println!("{} Initializing tracenet project...", "→".blue());

    std::fs::create_dir_all(&base_path)
        .with_context(|| format!("Failed to create {}", base_path.display()))?;

    let config_path = base_path.join(CONFIG_FILE);
    if !config_path.exists() {
        Config::default().save(&config_path)?;
        println!("  {} Created {}", "✓".green(), config_path.display());
    } else {
        println!("  {} {} already exists", "•".yellow(), config_path.display());
    }

    println!();
    println!("{} tracenet project initialized!", "✓".green().bold());
    println!();
    println!("Next steps:");
    println!("  {} tracenet inspect xor", "1.".blue());
    println!("  {} tracenet train xor", "2.".blue());
    println!("  {} tracenet train --data examples.json --layers 2,3,1", "3.".blue());

    Ok(())
}
