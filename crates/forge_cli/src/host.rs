//! Key selection and prompts for a terminal session.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWriteExt, BufReader, Stdin};
use tokio::sync::Mutex;
use tracing::warn;

use forge_app::KeySelector;

/// Line-oriented input shared by every prompt of a session.
///
/// One buffered reader serves all prompts, so lines read ahead for one
/// answer are still there for the next.
pub struct Console<R = BufReader<Stdin>> {
    input: Mutex<R>,
}

impl Console {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<R: AsyncBufRead + Unpin + Send> Console<R> {
    pub fn new(input: R) -> Self {
        Self {
            input: Mutex::new(input),
        }
    }

    /// Print `message` and read one line. Returns an empty string at end of input.
    pub async fn prompt(&self, message: &str) -> Result<String> {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(message.as_bytes()).await?;
        stdout.flush().await?;

        let mut line = String::new();
        self.input
            .lock()
            .await
            .read_line(&mut line)
            .await
            .context("Failed to read from stdin")?;
        Ok(line)
    }
}

/// Reports a key as selected when one is configured, and asks for one on
/// the console otherwise.
pub struct TerminalKeySelector<R = BufReader<Stdin>> {
    configured: bool,
    console: Arc<Console<R>>,
}

impl<R> TerminalKeySelector<R> {
    pub fn new(configured: bool, console: Arc<Console<R>>) -> Self {
        Self { configured, console }
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send + 'static> KeySelector for TerminalKeySelector<R> {
    async fn has_selected_api_key(&self) -> bool {
        self.configured
    }

    async fn open_select_key(&self) -> Option<String> {
        match self.console.prompt("🔑 Enter your Gemini API key: ").await {
            Ok(line) => parse_key(&line),
            Err(e) => {
                warn!("Could not read API key: {:#}", e);
                None
            }
        }
    }
}

fn parse_key(line: &str) -> Option<String> {
    let key = line.trim();
    (!key.is_empty()).then(|| key.to_string())
}

/// Parse a 1-based level choice typed by the user.
pub fn parse_level_choice(line: &str) -> Option<u8> {
    match line.trim() {
        "1" => Some(1),
        "2" => Some(2),
        _ => None,
    }
}
