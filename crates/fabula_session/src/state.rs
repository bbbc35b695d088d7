//! Observable session state.

use derive_getters::Getters;
use fabula_core::{StoryId, Turn, TurnSeries, latest_entropy};

/// The story identity, turn history, and status flags of a session.
///
/// Obtained as a consistent copy through
/// [`StorySession::snapshot`](crate::StorySession::snapshot).
#[derive(Debug, Clone, Default, PartialEq, Getters)]
pub struct SessionState {
    /// Current story; `None` until one is created or loaded
    pub(crate) story_id: Option<StoryId>,
    /// Turns in append order
    pub(crate) turns: Vec<Turn>,
    /// True while a load or continue request is outstanding
    pub(crate) loading: bool,
    /// Message from the last failed load or continue
    pub(crate) error: Option<String>,
}

impl SessionState {
    /// Normalized display series for the current turns.
    pub fn series(&self) -> TurnSeries {
        TurnSeries::from_turns(&self.turns)
    }

    /// Normalized entropy of the newest turn, 0 with no turns.
    pub fn latest_entropy(&self) -> f64 {
        latest_entropy(&self.turns)
    }
}
