//! Generation settings loaded from TOML.
//!
//! Lookup order for the file: `--config PATH`, then `./galois.toml`, then
//! `<config_dir>/galois/config.toml`. Output format precedence (highest
//! wins): `--format`, `GALOIS_FORMAT`, the file's `format`, then text.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::output::OutputFormat;

/// Which generator builds the lattice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// Bordat's algorithm: the Hasse diagram and the dependency graph.
    #[default]
    Diagram,
    /// Every closed set, linked by inclusion.
    Complete,
}

/// Reduction applied to the lattice before output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Reduction {
    #[default]
    None,
    Join,
    Meet,
    Irreducibles,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default)]
    pub algorithm: Algorithm,
    /// Reduce a complete lattice to its covering relation.
    #[serde(default = "default_true")]
    pub hasse: bool,
    #[serde(default)]
    pub edge_valuation: bool,
    #[serde(default)]
    pub reduction: Reduction,
    #[serde(default)]
    pub format: Option<String>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            hasse: default_true(),
            edge_valuation: false,
            reduction: Reduction::default(),
            format: None,
        }
    }
}

/// Load the configuration, falling back to defaults when no file exists.
///
/// An explicit path must exist; a malformed file is an error either way.
pub fn load_config(explicit: Option<&Path>, cwd: &Path) -> Result<GenerationConfig> {
    if let Some(path) = explicit {
        return read_config(path);
    }
    match discover(cwd) {
        Some(path) => read_config(&path),
        None => Ok(GenerationConfig::default()),
    }
}

fn discover(cwd: &Path) -> Option<PathBuf> {
    let local = cwd.join("galois.toml");
    if local.exists() {
        return Some(local);
    }
    let user = dirs::config_dir()?.join("galois/config.toml");
    user.exists().then_some(user)
}

fn read_config(path: &Path) -> Result<GenerationConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config = toml::from_str::<GenerationConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    tracing::debug!(path = %path.display(), ?config, "configuration loaded");
    Ok(config)
}

/// Resolve the output format. Unknown names in the environment or the file
/// are skipped.
pub fn resolve_format(
    cli: Option<OutputFormat>,
    env_format: Option<&str>,
    config_format: Option<&str>,
) -> OutputFormat {
    if let Some(format) = cli {
        return format;
    }
    if let Some(format) = env_format.and_then(OutputFormat::normalize) {
        return format;
    }
    config_format
        .and_then(OutputFormat::normalize)
        .unwrap_or(OutputFormat::Text)
}

const fn default_true() -> bool {
    true
}
