//! Pipeline controller.
//!
//! Owns the [`AppState`] and the [`ForgeClient`], runs the generation calls
//! one at a time and is the single place where failed requests are turned
//! into state rollbacks and user-facing messages.

use std::sync::Arc;

use chrono::Utc;
use forge_api::{ApiServiceError, ErrorKind, ForgeClient};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::host::KeySelector;
use crate::messages;
use crate::stage::{Event, Stage};
use crate::state::{AppState, DisplayError, TransitionRecord};

pub struct PipelineController {
    client: ForgeClient,
    host: Option<Arc<dyn KeySelector>>,
    state: AppState,
    session_id: Uuid,
}

impl PipelineController {
    pub fn new(client: ForgeClient, host: Option<Arc<dyn KeySelector>>) -> Self {
        Self {
            client,
            host,
            state: AppState::default(),
            session_id: Uuid::new_v4(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn stage(&self) -> Stage {
        self.state.stage
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn client(&self) -> &ForgeClient {
        &self.client
    }

    /// The presentation layer should prompt for a key before anything else.
    pub fn needs_key_selection(&self) -> bool {
        !self.state.api_key_selected
    }

    /// Ask the host whether a key is already selected and remember the answer.
    pub async fn check_api_key(&mut self) -> bool {
        let selected = match &self.host {
            Some(host) => host.has_selected_api_key().await,
            None => false,
        };
        self.state.api_key_selected = selected;
        selected
    }

    /// Open the host's key prompt.
    ///
    /// The key counts as selected once the prompt returns; a wrong key shows
    /// up later as an `INVALID_KEY` failure, which clears the flag again.
    pub async fn select_api_key(&mut self) -> bool {
        let Some(host) = self.host.clone() else {
            warn!(session = %self.session_id, "No key selection available in this environment");
            return false;
        };

        if let Some(key) = host.open_select_key().await {
            self.client.set_api_key(key);
        }
        self.state.api_key_selected = true;
        if self.state.error.as_ref().and_then(|e| e.kind) == Some(ErrorKind::InvalidKey) {
            self.state.error = None;
        }
        true
    }

    /// Leave the landing screen.
    pub fn begin(&mut self) -> AppResult<Stage> {
        self.apply(Event::Begin)
    }

    /// Run market analysis and level generation for `genre`.
    ///
    /// Refused until a key is selected. A blank genre keeps the machine in
    /// `AnalysisInput` with a validation error and sends nothing. Request failures are recovered into the
    /// state; only misuse of the controller is returned as an error.
    pub async fn submit_genre(&mut self, genre: &str) -> AppResult<Stage> {
        self.ensure(Event::SubmitGenre)?;
        self.ensure_key_selected()?;

        let genre = genre.trim();
        if genre.is_empty() {
            self.state.error = Some(DisplayError::validation(messages::GENRE_REQUIRED));
            return self.apply(Event::GenreRejected);
        }

        self.state.genre = genre.to_string();
        self.state.error = None;
        self.state.clear_results();
        self.apply(Event::SubmitGenre)?;

        let analysis = match self.client.generate_market_analysis(&self.state.genre).await {
            Ok(analysis) => analysis,
            Err(err) => return self.fail(Event::IdeaFailed(err.kind), err),
        };
        self.state.analysis = Some(analysis);
        self.apply(Event::AnalysisReady)?;

        let analysis = self
            .state
            .analysis
            .as_ref()
            .ok_or(AppError::MissingData("market analysis"))?;
        let result = self.client.generate_game_levels(&self.state.genre, analysis).await;

        match result {
            Ok(levels) => {
                self.state.levels = Some(levels);
                self.apply(Event::LevelsReady)
            }
            Err(err) => {
                self.state.analysis = None;
                self.fail(Event::IdeaFailed(err.kind), err)
            }
        }
    }

    /// Generate a prototype for level `index` (0 or 1).
    ///
    /// Refused until a key is selected.
    pub async fn select_level(&mut self, index: usize) -> AppResult<Stage> {
        self.ensure(Event::SelectLevel)?;
        self.ensure_key_selected()?;

        let levels = self.state.levels.as_ref().ok_or(AppError::MissingData("levels"))?;
        let level = levels.get(index).ok_or(AppError::LevelOutOfRange(index))?.clone();

        self.state.selected_level = Some(index);
        self.state.prototype = None;
        self.state.error = None;
        self.apply(Event::SelectLevel)?;

        match self.client.generate_prototype(&level).await {
            Ok(prototype) => {
                self.state.prototype = Some(prototype);
                self.apply(Event::PrototypeReady)
            }
            Err(err) => {
                self.state.selected_level = None;
                self.fail(Event::PrototypeFailed(err.kind), err)
            }
        }
    }

    /// Return from a prototype to the two levels.
    pub fn back_to_levels(&mut self) -> AppResult<Stage> {
        self.ensure(Event::BackToLevels)?;
        self.state.prototype = None;
        self.state.selected_level = None;
        self.apply(Event::BackToLevels)
    }

    /// Drop all results and ask for a new genre.
    pub fn start_over(&mut self) -> AppResult<Stage> {
        self.ensure(Event::StartOver)?;
        self.state.clear_results();
        self.state.error = None;
        self.apply(Event::StartOver)
    }

    /// Record a key press. Returns `true` if it was not already held.
    pub fn key_down(&mut self, key: impl Into<String>) -> bool {
        self.state.pressed_keys.press(key)
    }

    /// Record a key release. Returns `true` if it was held.
    pub fn key_up(&mut self, key: &str) -> bool {
        self.state.pressed_keys.release(key)
    }

    fn ensure(&self, event: Event) -> AppResult<Stage> {
        self.state.stage.on(event).ok_or(AppError::InvalidTransition {
            stage: self.state.stage,
            event,
        })
    }

    // An INVALID_KEY failure clears the flag, so the rejected key is never resent
    fn ensure_key_selected(&self) -> AppResult<()> {
        if self.needs_key_selection() {
            warn!(session = %self.session_id, "Request refused until an API key is selected");
            return Err(AppError::KeySelectionRequired);
        }
        Ok(())
    }

    fn apply(&mut self, event: Event) -> AppResult<Stage> {
        let from = self.state.stage;
        let to = self.ensure(event)?;

        if from == Stage::PrototypeComplete && to != from {
            self.state.pressed_keys.clear();
        }

        self.state.stage = to;
        self.state.timeline.push(TransitionRecord {
            from,
            to,
            event,
            timestamp: Utc::now(),
        });
        info!(session = %self.session_id, %from, %to, %event, "Pipeline transition");

        Ok(to)
    }

    fn fail(&mut self, event: Event, err: ApiServiceError) -> AppResult<Stage> {
        warn!(session = %self.session_id, kind = %err.kind, message = %err.message, "Generation failed");

        if err.kind == ErrorKind::InvalidKey {
            self.state.api_key_selected = false;
        }
        self.state.error = Some(DisplayError::from_error(&err));
        self.apply(event)
    }
}
