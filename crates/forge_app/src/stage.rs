//! Pipeline stages and the transition table.

use std::fmt;

use forge_api::ErrorKind;
use serde::{Deserialize, Serialize};

/// Stage of the generation pipeline, in forward order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stage {
    /// Landing screen
    Hero,
    /// Waiting for a genre
    AnalysisInput,
    /// Market analysis request in flight
    AnalysisLoading,
    /// Level request in flight
    IdeaLoading,
    /// Two levels available, waiting for a choice
    IdeaComplete,
    /// Prototype request in flight
    PrototypeLoading,
    /// Prototype (or infeasibility note) available
    PrototypeComplete,
}

impl Default for Stage {
    fn default() -> Self {
        Self::Hero
    }
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hero => "HERO",
            Self::AnalysisInput => "ANALYSIS_INPUT",
            Self::AnalysisLoading => "ANALYSIS_LOADING",
            Self::IdeaLoading => "IDEA_LOADING",
            Self::IdeaComplete => "IDEA_COMPLETE",
            Self::PrototypeLoading => "PROTOTYPE_LOADING",
            Self::PrototypeComplete => "PROTOTYPE_COMPLETE",
        }
    }

    /// Target stage for `event`, or `None` if the event is not valid here.
    pub fn on(self, event: Event) -> Option<Stage> {
        use Event::*;
        use Stage::*;

        match (self, event) {
            (Hero, Begin) => Some(AnalysisInput),

            (AnalysisInput, GenreRejected) => Some(AnalysisInput),
            (AnalysisInput, SubmitGenre) => Some(AnalysisLoading),
            (AnalysisLoading, AnalysisReady) => Some(IdeaLoading),
            (IdeaLoading, LevelsReady) => Some(IdeaComplete),
            (AnalysisLoading | IdeaLoading, IdeaFailed(_)) => Some(AnalysisInput),

            (IdeaComplete, SelectLevel) => Some(PrototypeLoading),
            (PrototypeLoading, PrototypeReady) => Some(PrototypeComplete),
            (PrototypeLoading, PrototypeFailed(ErrorKind::InvalidKey)) => Some(AnalysisInput),
            (PrototypeLoading, PrototypeFailed(_)) => Some(IdeaComplete),

            (PrototypeComplete, BackToLevels) => Some(IdeaComplete),
            (IdeaComplete | PrototypeComplete, StartOver) => Some(AnalysisInput),

            _ => None,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Something that moves the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Event {
    /// User leaves the landing screen
    Begin,
    /// Genre submitted and accepted
    SubmitGenre,
    /// Genre submitted but blank
    GenreRejected,
    AnalysisReady,
    LevelsReady,
    /// Analysis or level generation failed
    IdeaFailed(ErrorKind),
    /// User picked one of the two levels
    SelectLevel,
    PrototypeReady,
    PrototypeFailed(ErrorKind),
    BackToLevels,
    StartOver,
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Begin => "begin",
            Self::SubmitGenre => "submit_genre",
            Self::GenreRejected => "genre_rejected",
            Self::AnalysisReady => "analysis_ready",
            Self::LevelsReady => "levels_ready",
            Self::IdeaFailed(_) => "idea_failed",
            Self::SelectLevel => "select_level",
            Self::PrototypeReady => "prototype_ready",
            Self::PrototypeFailed(_) => "prototype_failed",
            Self::BackToLevels => "back_to_levels",
            Self::StartOver => "start_over",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IdeaFailed(kind) | Self::PrototypeFailed(kind) => {
                write!(f, "{}({})", self.name(), kind)
            }
            _ => f.write_str(self.name()),
        }
    }
}
