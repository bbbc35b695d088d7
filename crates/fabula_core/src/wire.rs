//! Request and response bodies of the story API.
//!
//! Responses decode permissively: a turn list that is missing, `null`, or not an
//! array becomes empty, and list entries that are not turns are skipped.

use crate::{StoryId, StoryMode, Turn};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

/// Body of `POST /story/create`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateStoryResponse {
    /// Identifier of the new story
    #[serde(default)]
    pub story_id: StoryId,
}

/// Body sent to `POST /story/continue`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContinueRequest {
    /// Story to continue
    pub story_id: StoryId,
    /// Text the human contributes
    pub user_text: String,
    /// Number of generated rounds
    pub rounds: u32,
    /// Continuation mode
    pub mode: StoryMode,
}

/// Body of `POST /story/continue`.
///
/// # Examples
///
/// ```
/// use fabula_core::ContinueResponse;
///
/// let response: ContinueResponse = serde_json::from_str(r#"{"new_turns": "oops"}"#).unwrap();
/// assert!(response.new_turns.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContinueResponse {
    /// Echo of the story id, when the server sends one
    #[serde(default)]
    pub story_id: Option<StoryId>,
    /// Turns created by this request, in server order
    #[serde(default, deserialize_with = "lenient_turns")]
    pub new_turns: Vec<Turn>,
}

/// Body of `GET /story/{story_id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoryResponse {
    /// Identifier of the loaded story
    #[serde(default)]
    pub story_id: Option<StoryId>,
    /// Full turn history
    #[serde(default, deserialize_with = "lenient_turns")]
    pub turns: Vec<Turn>,
}

fn lenient_turns<'de, D>(deserializer: D) -> Result<Vec<Turn>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let items = match value {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Null => return Ok(Vec::new()),
        _ => {
            warn!("Turn list is not an array, treating as empty");
            return Ok(Vec::new());
        }
    };

    Ok(items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<Turn>(item) {
            Ok(turn) => Some(turn),
            Err(e) => {
                warn!(error = %e, "Skipping malformed turn in response");
                None
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_turns_decode_empty() {
        let response: StoryResponse = serde_json::from_value(json!({"story_id": "s1"})).unwrap();
        assert_eq!(response.story_id, Some(StoryId::from("s1")));
        assert!(response.turns.is_empty());

        let response: StoryResponse =
            serde_json::from_value(json!({"story_id": "s1", "turns": null})).unwrap();
        assert!(response.turns.is_empty());
    }

    #[test]
    fn test_malformed_entries_are_skipped() {
        let response: ContinueResponse = serde_json::from_value(json!({
            "story_id": "s1",
            "new_turns": [
                {"story_id": "s1", "turn": 1, "author": "human", "text": "hi"},
                {"nonsense": true},
                {"story_id": "s1", "turn": 2, "author": "ai", "text": "hello"}
            ]
        }))
        .unwrap();

        assert_eq!(response.new_turns.len(), 2);
        assert_eq!(response.new_turns[1].turn, 2);
    }

    #[test]
    fn test_continue_request_wire_names() {
        let request = ContinueRequest {
            story_id: StoryId::from("s1"),
            user_text: "hi".to_string(),
            rounds: 1,
            mode: StoryMode::HumanAi,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"story_id": "s1", "user_text": "hi", "rounds": 1, "mode": "human_ai"})
        );
    }
}
