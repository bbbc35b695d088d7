//! Push channel events and outbound prompts.

use crate::{StoryMode, Turn};
use serde::{Deserialize, Serialize};

/// Something that happened on a story's push socket.
///
/// Lifecycle events are for whoever displays connection status; only
/// [`PushEvent::Turn`] carries story data.
#[derive(Debug, Clone, PartialEq)]
pub enum PushEvent {
    /// The socket connected
    Opened,
    /// A well-formed turn arrived
    Turn(Turn),
    /// The transport reported an error
    Error(String),
    /// The socket closed; no further events follow
    Closed,
}

/// Prompt sent over the push socket; the server answers with pushed turns.
///
/// # Examples
///
/// ```
/// use fabula_core::{PushPrompt, StoryMode};
///
/// let prompt = PushPrompt::new("Once upon a time", 2, StoryMode::HumanAi);
/// let json = serde_json::to_value(&prompt).unwrap();
/// assert_eq!(json["user_text"], "Once upon a time");
/// assert_eq!(json["rounds"], 2);
/// assert_eq!(json["mode"], "human_ai");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushPrompt {
    /// Text the human contributes
    pub user_text: String,
    /// Number of generated rounds
    pub rounds: u32,
    /// Continuation mode
    pub mode: StoryMode,
}

impl PushPrompt {
    /// Build a prompt.
    pub fn new(user_text: impl Into<String>, rounds: u32, mode: StoryMode) -> Self {
        Self {
            user_text: user_text.into(),
            rounds,
            mode,
        }
    }
}
