//! Run command - Drive the whole pipeline from genre to prototype page.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use forge_api::{ApiServiceError, ForgeClient};
use forge_app::{render_host_page, AppState, KeySelector, PipelineController, Stage};

use super::{level_index, load_config};
use crate::host::{self, Console, TerminalKeySelector};
use crate::output;

#[derive(Args)]
pub struct RunArgs {
    /// Game genre to build for
    #[arg(short, long)]
    genre: String,

    /// Level to prototype (1 or 2); asked interactively when omitted
    #[arg(short, long)]
    level: Option<u8>,

    /// Where to write the prototype page
    #[arg(short, long, default_value = "prototype.html")]
    output: PathBuf,
}

pub async fn execute(args: RunArgs, config: Option<&Path>) -> Result<()> {
    let config = load_config(config)?;
    let console = Arc::new(Console::stdin());
    let selector: Arc<dyn KeySelector> =
        Arc::new(TerminalKeySelector::new(config.has_api_key(), console.clone()));
    let mut controller = PipelineController::new(ForgeClient::gemini(config), Some(selector));
    info!(session = %controller.session_id(), "Starting pipeline for: {}", args.genre.trim());

    if !controller.check_api_key().await {
        controller.select_api_key().await;
    }
    if !controller.client().has_api_key() {
        return Err(ApiServiceError::invalid_key("API key is not configured.").into());
    }

    controller.begin()?;

    println!("🔍 Analyzing market and designing levels...");
    if controller.submit_genre(&args.genre).await? != Stage::IdeaComplete {
        return Err(stopped(controller.state()));
    }

    let state = controller.state();
    let analysis = state.analysis().context("Analysis missing after success")?;
    let levels = state.levels().context("Levels missing after success")?;
    print!("{}", output::format_analysis(state.genre(), analysis));
    println!();
    for (i, level) in levels.iter().enumerate() {
        println!("{}", output::format_level(i + 1, level));
    }

    let number = match args.level {
        Some(number) => number,
        None => choose_level(&console).await?,
    };
    let index = level_index(number)?;

    println!("🎮 Building prototype for level {}...", number);
    if controller.select_level(index).await? != Stage::PrototypeComplete {
        return Err(stopped(controller.state()));
    }

    let state = controller.state();
    let level = state.selected_level().context("Selected level missing")?;
    let prototype = state.prototype().context("Prototype missing after success")?;
    println!("{}", output::format_prototype_summary(prototype));

    let page = render_host_page(&level.level_description, prototype);
    tokio::fs::write(&args.output, page)
        .await
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    println!("✅ Prototype page written to {}", args.output.display());

    Ok(())
}

async fn choose_level(console: &Console) -> Result<u8> {
    loop {
        let line = console.prompt("Which level should become a prototype? [1/2]: ").await?;
        if line.is_empty() {
            anyhow::bail!("Invalid argument: no level chosen");
        }
        match host::parse_level_choice(&line) {
            Some(number) => return Ok(number),
            None => println!("Please answer 1 or 2."),
        }
    }
}

/// Error for a pipeline that fell back to an earlier stage.
fn stopped(state: &AppState) -> anyhow::Error {
    match state.error() {
        Some(error) => match error.kind {
            Some(kind) => {
                let detail = error.detail.as_deref().unwrap_or(&error.message);
                ApiServiceError::new(kind, detail).into()
            }
            None => anyhow::anyhow!("Invalid argument: {}", error.message),
        },
        None => anyhow::anyhow!("Pipeline stopped at {}", state.stage()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forge_api::{ClientConfig, ErrorKind, MockReply, MockTransport, TransportError};

    #[tokio::test]
    async fn test_stopped_carries_client_message() {
        let transport = MockTransport::new()
            .add_reply(MockReply::failure(TransportError::status(429, "Quota exceeded for model")));
        let client = ForgeClient::new(
            Arc::new(transport),
            ClientConfig::default().with_api_key("key"),
        );
        let console = Arc::new(Console::new(&b""[..]));
        let selector: Arc<dyn KeySelector> = Arc::new(TerminalKeySelector::new(true, console));
        let mut controller = PipelineController::new(client, Some(selector));
        controller.check_api_key().await;
        controller.begin().unwrap();
        controller.submit_genre("Racing").await.unwrap();

        let err = stopped(controller.state());
        let api = err.downcast_ref::<ApiServiceError>().unwrap();
        assert_eq!(api.kind, ErrorKind::RateLimit);
        assert_eq!(api.message, "Quota exceeded for model");
    }

    #[test]
    fn test_stopped_without_error_names_the_stage() {
        let state = AppState::default();
        let err = stopped(&state);
        assert!(err.to_string().contains("Pipeline stopped at"));
    }
}
