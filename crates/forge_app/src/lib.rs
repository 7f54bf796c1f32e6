//! # forge_app
//!
//! Application state machine for Genre Forge.
//!
//! ```text
//! HERO ─▶ ANALYSIS_INPUT ─▶ ANALYSIS_LOADING ─▶ IDEA_LOADING ─▶ IDEA_COMPLETE
//!              ▲  ▲                 │                 │            │   ▲
//!              │  └─────────────────┴── failure ──────┘            ▼   │ failure
//!              │                                          PROTOTYPE_LOADING
//!              └──────────── INVALID_KEY ────────────────────┘     │
//!                                                                  ▼
//!                                                        PROTOTYPE_COMPLETE
//! ```
//!
//! [`PipelineController`] owns the state snapshot and the API client. The
//! presentation layer reads [`AppState`] and calls controller actions; it
//! never mutates state directly.

pub mod controller;
pub mod error;
pub mod host;
pub mod messages;
pub mod sandbox;
pub mod stage;
pub mod state;

pub use controller::PipelineController;
pub use error::{AppError, AppResult};
pub use host::KeySelector;
pub use messages::{user_message, GENRE_REQUIRED};
pub use sandbox::{escape_html, render_host_page, SANDBOX_POLICY};
pub use stage::{Event, Stage};
pub use state::{AppState, DisplayError, PressedKeys, TransitionRecord};
