//! Author roles for story turns.

use serde::{Deserialize, Serialize};

/// Who wrote a turn.
///
/// The server currently sends `"human"` or `"ai"`. Any other role is kept
/// verbatim so that newer servers do not break older clients.
///
/// # Examples
///
/// ```
/// use fabula_core::Author;
///
/// let author: Author = serde_json::from_str("\"ai\"").unwrap();
/// assert_eq!(author, Author::Ai);
/// assert_eq!(author.to_string(), "ai");
///
/// let narrator: Author = serde_json::from_str("\"narrator\"").unwrap();
/// assert_eq!(narrator, Author::Other("narrator".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[serde(from = "String", into = "String")]
pub enum Author {
    /// Text typed by the person driving the story
    #[display("human")]
    Human,
    /// Text produced by the generating agent
    #[display("ai")]
    Ai,
    /// Any role this client does not know about
    #[display("{}", _0)]
    Other(String),
}

impl From<String> for Author {
    fn from(role: String) -> Self {
        match role.as_str() {
            "human" => Author::Human,
            "ai" => Author::Ai,
            _ => Author::Other(role),
        }
    }
}

impl From<Author> for String {
    fn from(author: Author) -> Self {
        author.to_string()
    }
}
