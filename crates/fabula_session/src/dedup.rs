//! Duplicate handling for appended turns.

use fabula_core::Turn;
use serde::{Deserialize, Serialize};

/// Whether appends skip turns the session already holds.
///
/// # Examples
///
/// ```
/// use fabula_core::{Author, Turn};
/// use fabula_session::DedupPolicy;
///
/// let existing = vec![Turn::new("s1", 1, Author::Human, "hi")];
/// let repeat = Turn::new("s1", 1, Author::Human, "hi again");
///
/// assert!(DedupPolicy::KeepAll.admits(&existing, &repeat));
/// assert!(!DedupPolicy::ByStoryTurn.admits(&existing, &repeat));
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DedupPolicy {
    /// Append everything the server sends
    #[default]
    KeepAll,
    /// Skip a turn whose `(story_id, turn)` is already present.
    ///
    /// Provisional turns are always appended.
    ByStoryTurn,
}

impl DedupPolicy {
    /// True when `candidate` may be appended after `existing`.
    pub fn admits(&self, existing: &[Turn], candidate: &Turn) -> bool {
        match self {
            DedupPolicy::KeepAll => true,
            DedupPolicy::ByStoryTurn => {
                candidate.is_provisional()
                    || !existing.iter().any(|turn| {
                        turn.turn == candidate.turn && turn.story_id == candidate.story_id
                    })
            }
        }
    }
}
