//! CLI command definitions.
//!
//! Each subcommand runs one part of the generation pipeline, or all of it.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use tracing::debug;

use forge_api::ClientConfig;

pub mod analyze;
pub mod levels;
pub mod prototype;
pub mod run;

/// Genre Forge - market analysis, level design and playable prototypes for a game genre
#[derive(Parser)]
#[command(name = "genreforge")]
#[command(version, about = "Genre Forge - from a game genre to a playable prototype")]
#[command(long_about = r#"
Genre Forge asks a Gemini model for a market analysis of a game genre,
designs two levels informed by it and turns one level into a playable
HTML prototype.

COMMANDS:
  analyze     → Market analysis for a genre
  levels      → Two level designs for a genre
  prototype   → Playable prototype for a saved level
  run         → Full pipeline, written to a sandboxed HTML page

CONFIGURATION:
  GEMINI_API_KEY / API_KEY   API key
  FORGE_MODEL                Model for every request
  FORGE_BASE_URL             API endpoint
  forge.toml                 Optional file in the working directory

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments
  3 - Credential error
  4 - Model response error
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file (defaults to ./forge.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze the market for a game genre
    Analyze(analyze::AnalyzeArgs),

    /// Design two levels for a game genre
    Levels(levels::LevelsArgs),

    /// Generate a playable prototype for a saved level
    Prototype(prototype::PrototypeArgs),

    /// Run the whole pipeline interactively
    Run(run::RunArgs),
}

/// Layer defaults, the config file and the environment.
pub fn load_config(path: Option<&Path>) -> Result<ClientConfig> {
    let config = match path {
        Some(path) => ClientConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?
            .apply_env(),
        None => {
            let current_dir = std::env::current_dir()?;
            ClientConfig::load(&current_dir).context("Failed to load forge.toml")?
        }
    };

    debug!(
        base_url = %config.base_url,
        analysis_model = %config.analysis_model,
        level_model = %config.level_model,
        prototype_model = %config.prototype_model,
        has_api_key = config.has_api_key(),
        "Configuration loaded"
    );
    Ok(config)
}

/// Read a JSON document produced by an earlier `--json` run.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid argument: {} is not in the expected format", path.display()))
}

/// Convert a 1-based level number from the command line.
pub fn level_index(number: u8) -> Result<usize> {
    match number {
        1 | 2 => Ok(usize::from(number) - 1),
        _ => anyhow::bail!("Invalid argument: level must be 1 or 2, got {}", number),
    }
}
