//! Configuration management for tracenet CLI.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracenet::prelude::*;

pub const CONFIG_FILE: &str = "tracenet.toml";

/// tracenet project configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub trainer: TrainerConfig,
    #[serde(default)]
    pub network: NetworkConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Seed for initial weights; absent means a fresh seed every run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Squashing function of every non-input neuron.
    #[serde(default = "default_squash")]
    pub squash: Squash,
}

// Default value functions
fn default_squash() -> Squash { Squash::Logistic }

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            seed: None,
            squash: default_squash(),
        }
    }
}

impl Config {
    /// Load config from tracenet.toml in the current or parent directories.
    pub fn load() -> Result<Self> {
        match find_config_file() {
            Some(path) => Self::load_from(&path),
            None => Ok(Config::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    /// Save config to the specified path.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// A table seeded from the config, or from entropy when no seed is set.
    pub fn table(&self) -> IdentityTable {
        match self.network.seed {
            Some(seed) => IdentityTable::with_seed(seed),
            None => IdentityTable::new(),
        }
    }
}

/// Find tracenet.toml in current or parent directories.
fn find_config_file() -> Option<PathBuf> {
    let mut dir = std::env::current_dir().ok()?;
    loop {
        let config_path = dir.join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }
        if !dir.pop() {
            break;
        }
    }
    None
}
