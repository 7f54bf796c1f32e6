//! State snapshot owned by the controller.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use forge_api::{ApiServiceError, ErrorKind, GameLevel, LevelPair, MarketAnalysis, PrototypeResult};
use serde::Serialize;

use crate::messages;
use crate::stage::{Event, Stage};

/// Error currently shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayError {
    /// `None` for local input validation
    pub kind: Option<ErrorKind>,
    pub message: String,
    /// What the client reported, for logs and diagnostics
    pub detail: Option<String>,
}

impl DisplayError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            kind: None,
            message: message.into(),
            detail: None,
        }
    }

    /// Fixed message for a failed request, keeping the client's own message.
    pub fn from_error(err: &ApiServiceError) -> Self {
        Self {
            kind: Some(err.kind),
            message: messages::user_message(err.kind).to_string(),
            detail: Some(err.message.clone()),
        }
    }
}

/// One entry in the transition timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransitionRecord {
    pub from: Stage,
    pub to: Stage,
    pub event: Event,
    #[serde(rename = "at")]
    pub timestamp: DateTime<Utc>,
}

/// Keys currently held down while a prototype is displayed.
///
/// Press and release are idempotent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PressedKeys(BTreeSet<String>);

impl PressedKeys {
    /// Returns `true` if the key was not already pressed.
    pub fn press(&mut self, key: impl Into<String>) -> bool {
        self.0.insert(key.into())
    }

    /// Returns `true` if the key was pressed.
    pub fn release(&mut self, key: &str) -> bool {
        self.0.remove(key)
    }

    pub fn is_pressed(&self, key: &str) -> bool {
        self.0.contains(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// Everything the presentation layer renders from.
///
/// Only the controller mutates it; readers get accessors.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AppState {
    pub(crate) stage: Stage,
    pub(crate) genre: String,
    pub(crate) analysis: Option<MarketAnalysis>,
    pub(crate) levels: Option<LevelPair>,
    pub(crate) selected_level: Option<usize>,
    pub(crate) prototype: Option<PrototypeResult>,
    pub(crate) error: Option<DisplayError>,
    pub(crate) api_key_selected: bool,
    pub(crate) pressed_keys: PressedKeys,
    pub(crate) timeline: Vec<TransitionRecord>,
}

impl AppState {
    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn genre(&self) -> &str {
        &self.genre
    }

    pub fn analysis(&self) -> Option<&MarketAnalysis> {
        self.analysis.as_ref()
    }

    pub fn levels(&self) -> Option<&LevelPair> {
        self.levels.as_ref()
    }

    pub fn selected_level(&self) -> Option<&GameLevel> {
        let index = self.selected_level?;
        self.levels.as_ref().map(|levels| &levels[index])
    }

    pub fn prototype(&self) -> Option<&PrototypeResult> {
        self.prototype.as_ref()
    }

    pub fn error(&self) -> Option<&DisplayError> {
        self.error.as_ref()
    }

    pub fn api_key_selected(&self) -> bool {
        self.api_key_selected
    }

    pub fn pressed_keys(&self) -> &PressedKeys {
        &self.pressed_keys
    }

    pub fn timeline(&self) -> &[TransitionRecord] {
        &self.timeline
    }

    /// Stages visited so far, starting with the initial one.
    pub fn visited_stages(&self) -> Vec<Stage> {
        let mut stages = vec![self
            .timeline
            .first()
            .map_or(self.stage, |record| record.from)];
        stages.extend(self.timeline.iter().map(|record| record.to));
        stages
    }

    pub(crate) fn clear_results(&mut self) {
        self.analysis = None;
        self.levels = None;
        self.selected_level = None;
        self.prototype = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pressed_keys_are_idempotent() {
        let mut keys = PressedKeys::default();

        assert!(keys.press("ArrowLeft"));
        assert!(!keys.press("ArrowLeft"));
        assert_eq!(keys.len(), 1);
        assert!(keys.is_pressed("ArrowLeft"));

        assert!(keys.release("ArrowLeft"));
        assert!(!keys.release("ArrowLeft"));
        assert!(keys.is_empty());
    }

    #[test]
    fn test_display_error_messages() {
        let err = DisplayError::from_error(&ApiServiceError::new(
            ErrorKind::RateLimit,
            "Rate limit exceeded during request",
        ));
        assert_eq!(err.kind, Some(ErrorKind::RateLimit));
        assert_eq!(err.message, messages::user_message(ErrorKind::RateLimit));
        assert_eq!(err.detail.as_deref(), Some("Rate limit exceeded during request"));

        let err = DisplayError::validation(messages::GENRE_REQUIRED);
        assert_eq!(err.kind, None);
        assert_eq!(err.detail, None);
    }

    #[test]
    fn test_default_state() {
        let state = AppState::default();
        assert_eq!(state.stage(), Stage::Hero);
        assert!(!state.api_key_selected());
        assert!(state.levels().is_none());
        assert_eq!(state.visited_stages(), vec![Stage::Hero]);
    }
}
