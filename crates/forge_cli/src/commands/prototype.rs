//! Prototype command - Playable prototype for a saved level.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use forge_api::{ForgeClient, LevelPair, PrototypeResult};
use forge_app::render_host_page;

use super::{level_index, load_config, read_json};
use crate::output;

#[derive(Args)]
pub struct PrototypeArgs {
    /// Levels saved with `levels --json`
    #[arg(long)]
    levels: PathBuf,

    /// Level to build (1 or 2)
    #[arg(short, long, default_value_t = 1)]
    level: u8,

    /// Write a sandboxed host page here instead of printing the prototype
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub async fn execute(args: PrototypeArgs, config: Option<&Path>) -> Result<()> {
    let index = level_index(args.level)?;
    let levels: LevelPair = read_json(&args.levels)?;
    let level = &levels[index];

    info!("Generating prototype for level {}: {}", args.level, level.level_description);
    let client = ForgeClient::gemini(load_config(config)?);
    let prototype = client
        .generate_prototype(level)
        .await
        .context("Prototype generation failed")?;

    eprintln!("{}", output::format_prototype_summary(&prototype));

    match &args.output {
        Some(path) => {
            let page = render_host_page(&level.level_description, &prototype);
            tokio::fs::write(path, page)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("✅ Prototype page written to {}", path.display());
        }
        None => match &prototype {
            PrototypeResult::Html(markup) => println!("{}", markup),
            PrototypeResult::Text(_) => {}
        },
    }

    Ok(())
}
