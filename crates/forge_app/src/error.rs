//! Error types for the application layer.
//!
//! Failed model requests are not errors here: the controller recovers from
//! them and records them in the state. These cover misuse of the controller.

use thiserror::Error;

use crate::stage::{Event, Stage};

/// Result type alias for controller operations.
pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    #[error("Cannot handle {event} in stage {stage}")]
    InvalidTransition { stage: Stage, event: Event },

    #[error("Level {0} does not exist; choose 0 or 1")]
    LevelOutOfRange(usize),

    #[error("An API key must be selected first")]
    KeySelectionRequired,

    #[error("Missing pipeline data: {0}")]
    MissingData(&'static str),
}
