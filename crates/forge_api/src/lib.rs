//! # forge_api
//!
//! Gemini client for Genre Forge.
//!
//! Three generation calls build on each other:
//!
//! 1. **Market analysis** for a genre (schema-constrained JSON)
//! 2. **Two level designs** informed by the analysis (schema-constrained JSON)
//! 3. **A playable prototype** for one level (free-form HTML + script)
//!
//! Every failure is reported as an [`ApiServiceError`] carrying one of six
//! [`ErrorKind`]s.
//!
//! # Example
//!
//! ```rust,no_run
//! use forge_api::{ClientConfig, ForgeClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ForgeClient::gemini(ClientConfig::from_env());
//!
//!     let analysis = client.generate_market_analysis("Cozy Farming Sim").await?;
//!     let levels = client.generate_game_levels("Cozy Farming Sim", &analysis).await?;
//!     let prototype = client.generate_prototype(&levels[0]).await?;
//!
//!     println!("{}", prototype.content());
//!     Ok(())
//! }
//! ```

pub mod classify;
pub mod client;
pub mod config;
pub mod content;
pub mod error;
pub mod mock;
pub mod models;
pub mod prompts;
pub mod transport;

pub use classify::{classify, Failure};
pub use client::ForgeClient;
pub use config::ClientConfig;
pub use content::{GenerateContentRequest, GenerateContentResponse};
pub use error::{
    ApiResult, ApiServiceError, ConfigError, ConfigResult, ErrorKind, TransportError,
    TransportErrorKind, TransportResult,
};
pub use mock::{CapturedCall, MockReply, MockTransport};
pub use models::{
    Entity, GameLevel, LevelPair, MarketAnalysis, Position, PrototypeResult, STYLE_PREAMBLE,
    UNFEASIBLE_MARKER,
};
pub use transport::{GeminiTransport, ModelTransport};
