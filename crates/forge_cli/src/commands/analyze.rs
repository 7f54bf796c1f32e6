//! Analyze command - Market analysis for a genre.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use forge_api::ForgeClient;

use super::load_config;
use crate::output;

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Game genre to analyze
    #[arg(short, long)]
    genre: String,

    /// Print the analysis as JSON
    #[arg(long)]
    json: bool,
}

pub async fn execute(args: AnalyzeArgs, config: Option<&Path>) -> Result<()> {
    let genre = args.genre.trim();
    if genre.is_empty() {
        anyhow::bail!("Invalid argument: {}", forge_app::GENRE_REQUIRED);
    }

    info!("Analyzing genre: {}", genre);
    let client = ForgeClient::gemini(load_config(config)?);
    let analysis = client
        .generate_market_analysis(genre)
        .await
        .context("Market analysis failed")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        print!("{}", output::format_analysis(genre, &analysis));
    }

    Ok(())
}
