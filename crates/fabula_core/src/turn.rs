//! Story turns and story identifiers.

use crate::Author;
use serde::{Deserialize, Deserializer, Serialize};

/// Turn number the server uses for turns it has not numbered yet.
pub const PROVISIONAL_TURN: i64 = -1;

/// Opaque identifier of a story.
///
/// # Examples
///
/// ```
/// use fabula_core::StoryId;
///
/// let id = StoryId::from("s1");
/// assert_eq!(id.as_str(), "s1");
/// assert_eq!(id.to_string(), "s1");
/// ```
#[derive(
    Debug,
    Clone,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
pub struct StoryId(String);

impl StoryId {
    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the server handed back an empty identifier.
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<&str> for StoryId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// One authored contribution to a story.
///
/// The order of turns inside a story is their append order. `turn` is a display
/// label and may repeat, skip numbers, or be [`PROVISIONAL_TURN`].
///
/// Scores arrive un-normalized and may be missing, `null`, numeric strings, or
/// garbage; anything that is not a number decodes to `None`.
///
/// # Examples
///
/// ```
/// use fabula_core::{Author, Turn};
///
/// let turn: Turn = serde_json::from_str(
///     r#"{"story_id":"s1","turn":1,"author":"human","text":"hi","flow_score":"0.5"}"#,
/// )
/// .unwrap();
///
/// assert_eq!(turn.author, Author::Human);
/// assert_eq!(turn.flow_score, Some(0.5));
/// assert_eq!(turn.entropy_score, None);
/// assert_eq!(turn.label(), "T1");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    /// Story this turn belongs to
    #[serde(default)]
    pub story_id: StoryId,
    /// Ordinal within the story, or [`PROVISIONAL_TURN`]
    pub turn: i64,
    /// Who wrote it
    pub author: Author,
    /// Narrative content
    #[serde(default)]
    pub text: String,
    /// Raw flow metric
    #[serde(default, deserialize_with = "lenient_score")]
    pub flow_score: Option<f64>,
    /// Raw entropy metric
    #[serde(default, deserialize_with = "lenient_score")]
    pub entropy_score: Option<f64>,
}

impl Turn {
    /// Build a turn without scores.
    pub fn new(story_id: impl Into<StoryId>, turn: i64, author: Author, text: impl Into<String>) -> Self {
        Self {
            story_id: story_id.into(),
            turn,
            author,
            text: text.into(),
            flow_score: None,
            entropy_score: None,
        }
    }

    /// Attach raw scores.
    pub fn with_scores(mut self, flow: f64, entropy: f64) -> Self {
        self.flow_score = Some(flow);
        self.entropy_score = Some(entropy);
        self
    }

    /// True for turns the server has not numbered yet.
    pub fn is_provisional(&self) -> bool {
        self.turn == PROVISIONAL_TURN
    }

    /// Chart label, `"T"` followed by the turn number.
    pub fn label(&self) -> String {
        format!("T{}", self.turn)
    }
}

fn lenient_score<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        serde_json::Value::Bool(b) => Some(if b { 1.0 } else { 0.0 }),
        _ => None,
    })
}
