//! Levels command - Two level designs for a genre.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use forge_api::{ForgeClient, MarketAnalysis};

use super::{load_config, read_json};
use crate::output;

#[derive(Args)]
pub struct LevelsArgs {
    /// Game genre the levels are for
    #[arg(short, long)]
    genre: String,

    /// Saved market analysis (JSON); generated when omitted
    #[arg(short, long)]
    analysis: Option<PathBuf>,

    /// Print the levels as JSON
    #[arg(long)]
    json: bool,
}

pub async fn execute(args: LevelsArgs, config: Option<&Path>) -> Result<()> {
    let genre = args.genre.trim();
    if genre.is_empty() {
        anyhow::bail!("Invalid argument: {}", forge_app::GENRE_REQUIRED);
    }

    let client = ForgeClient::gemini(load_config(config)?);

    let analysis: MarketAnalysis = match &args.analysis {
        Some(path) => {
            info!("Using saved analysis: {}", path.display());
            read_json(path)?
        }
        None => {
            info!("Analyzing genre: {}", genre);
            client
                .generate_market_analysis(genre)
                .await
                .context("Market analysis failed")?
        }
    };

    info!("Designing levels for: {}", genre);
    let levels = client
        .generate_game_levels(genre, &analysis)
        .await
        .context("Level generation failed")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&levels)?);
    } else {
        for (i, level) in levels.iter().enumerate() {
            println!("{}", output::format_level(i + 1, level));
        }
    }

    Ok(())
}
