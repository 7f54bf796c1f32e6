//! Genre Forge CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Invalid arguments
//! - 3: Credential error (missing, invalid or unknown API key)
//! - 4: Model response error (blocked or malformed)

use std::process::ExitCode;

use clap::Parser;
use forge_api::{ApiServiceError, ErrorKind};
use forge_app::user_message;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod host;
mod output;

use commands::{Cli, Commands};

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_ARGS: u8 = 2;
    pub const CREDENTIAL_ERROR: u8 = 3;
    pub const MODEL_RESPONSE_ERROR: u8 = 4;
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let log_result = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(log_filter(cli.verbose, cli.quiet))
        .try_init();

    if log_result.is_err() {
        // Logging already initialized, continue
    }

    let config = cli.config.as_deref();
    let result = match cli.command {
        Commands::Analyze(args) => commands::analyze::execute(args, config).await,
        Commands::Levels(args) => commands::levels::execute(args, config).await,
        Commands::Prototype(args) => commands::prototype::execute(args, config).await,
        Commands::Run(args) => commands::run::execute(args, config).await,
    };

    match result {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            let exit_code = categorize_error(&e);
            if let Some(api) = api_error(&e) {
                eprintln!("❌ {}", user_message(api.kind));
            }
            eprintln!("❌ Error: {:#}", e);
            ExitCode::from(exit_code)
        }
    }
}

fn log_filter(verbose: bool, quiet: bool) -> EnvFilter {
    let level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };

    let mut filter = EnvFilter::from_default_env();
    for target in ["genreforge", "forge_api", "forge_app"] {
        if let Ok(directive) = format!("{}={}", target, level).parse() {
            filter = filter.add_directive(directive);
        }
    }
    if let Ok(directive) = "warn".parse() {
        filter = filter.add_directive(directive);
    }
    filter
}

fn api_error(e: &anyhow::Error) -> Option<&ApiServiceError> {
    e.chain().find_map(|cause| cause.downcast_ref::<ApiServiceError>())
}

/// Categorize error to determine exit code
fn categorize_error(e: &anyhow::Error) -> u8 {
    if let Some(api) = api_error(e) {
        return match api.kind {
            ErrorKind::InvalidKey => ExitCodes::CREDENTIAL_ERROR,
            ErrorKind::BadResponse | ErrorKind::ResponseBlocked => {
                ExitCodes::MODEL_RESPONSE_ERROR
            }
            ErrorKind::RateLimit | ErrorKind::Network | ErrorKind::Unknown => {
                ExitCodes::GENERAL_ERROR
            }
        };
    }

    let msg = e.to_string().to_lowercase();
    if msg.contains("invalid argument") {
        ExitCodes::INVALID_ARGS
    } else {
        ExitCodes::GENERAL_ERROR
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_categorize_api_errors() {
        let err = anyhow::Error::from(ApiServiceError::invalid_key("API key is not configured."));
        assert_eq!(categorize_error(&err), ExitCodes::CREDENTIAL_ERROR);

        let err = anyhow::Error::from(ApiServiceError::blocked("SAFETY"));
        assert_eq!(categorize_error(&err), ExitCodes::MODEL_RESPONSE_ERROR);

        let err = anyhow::Error::from(ApiServiceError::new(ErrorKind::RateLimit, "slow down"));
        assert_eq!(categorize_error(&err), ExitCodes::GENERAL_ERROR);
    }

    #[test]
    fn test_categorize_through_context() {
        let result: Result<(), ApiServiceError> =
            Err(ApiServiceError::bad_response("The model returned an empty response."));
        let err = result.context("Market analysis failed").unwrap_err();

        assert_eq!(categorize_error(&err), ExitCodes::MODEL_RESPONSE_ERROR);
        assert_eq!(api_error(&err).unwrap().kind, ErrorKind::BadResponse);
    }

    #[test]
    fn test_categorize_other_errors() {
        let err = anyhow::anyhow!("Invalid argument: level must be 1 or 2");
        assert_eq!(categorize_error(&err), ExitCodes::INVALID_ARGS);

        let err = anyhow::anyhow!("disk full");
        assert_eq!(categorize_error(&err), ExitCodes::GENERAL_ERROR);
    }
}
