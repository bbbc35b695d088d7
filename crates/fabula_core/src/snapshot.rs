//! Persisted session snapshot.

use crate::{StoryId, Turn};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Storage key holding the current story id as a plain string.
pub const STORY_ID_KEY: &str = "story_id";

/// Storage key holding the JSON-encoded turn list.
pub const TURNS_KEY: &str = "story_turns";

/// Durable mirror of a session's story id and turns.
///
/// There is no schema version. Anything unreadable decodes to an empty value
/// instead of failing startup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Current story, if one was established
    pub story_id: Option<StoryId>,
    /// Turn history in append order
    pub turns: Vec<Turn>,
}

impl Snapshot {
    /// Rebuild a snapshot from its two raw storage entries.
    ///
    /// # Examples
    ///
    /// ```
    /// use fabula_core::Snapshot;
    ///
    /// let snapshot = Snapshot::from_entries(Some("s1".to_string()), Some("{not json".to_string()));
    /// assert_eq!(snapshot.story_id.unwrap().as_str(), "s1");
    /// assert!(snapshot.turns.is_empty());
    /// ```
    pub fn from_entries(story_id: Option<String>, turns: Option<String>) -> Self {
        let story_id = story_id
            .map(|raw| StoryId::from(raw.trim()))
            .filter(|id| !id.is_empty());

        let turns = match turns {
            Some(raw) => serde_json::from_str::<Vec<Turn>>(&raw).unwrap_or_else(|e| {
                warn!(error = %e, "Persisted turns are unreadable, starting empty");
                Vec::new()
            }),
            None => Vec::new(),
        };

        Self { story_id, turns }
    }

    /// Encode the turn entry.
    pub fn turns_entry(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.turns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Author;

    #[test]
    fn test_entries_round_trip() {
        let snapshot = Snapshot {
            story_id: Some(StoryId::from("s9")),
            turns: vec![Turn::new("s9", 1, Author::Human, "hi").with_scores(0.1, 0.2)],
        };
        let turns = snapshot.turns_entry().unwrap();
        let restored = Snapshot::from_entries(Some("s9".to_string()), Some(turns));
        assert_eq!(restored, snapshot);
    }

    #[test]
    fn test_missing_entries_are_empty() {
        assert_eq!(Snapshot::from_entries(None, None), Snapshot::default());
        assert_eq!(
            Snapshot::from_entries(Some("  ".to_string()), Some("{}".to_string())),
            Snapshot::default()
        );
    }
}
