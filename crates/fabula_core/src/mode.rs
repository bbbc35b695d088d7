//! Continuation modes and parameters.

use fabula_error::{FabulaResult, SessionError, SessionErrorKind};
use serde::{Deserialize, Serialize};

/// Largest number of generated rounds the server accepts per request.
pub const MAX_ROUNDS: u32 = 10;

/// How the server should continue the story.
///
/// # Examples
///
/// ```
/// use fabula_core::StoryMode;
/// use std::str::FromStr;
///
/// assert_eq!(StoryMode::default(), StoryMode::HumanAi);
/// assert_eq!(StoryMode::from_str("ai_only").unwrap(), StoryMode::AiOnly);
/// assert_eq!(StoryMode::HumanOnly.to_string(), "human_only");
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
pub enum StoryMode {
    /// The human turn is followed by generated turns
    #[default]
    HumanAi,
    /// Only generated turns
    AiOnly,
    /// Only the human turn is recorded
    HumanOnly,
}

/// Parameters for one continuation request.
///
/// `rounds` and `mode` fall back to the session defaults when unset.
///
/// # Examples
///
/// ```
/// use fabula_core::{ContinueParams, StoryMode};
///
/// let params = ContinueParams::new("The door creaks open")
///     .with_rounds(Some(2))
///     .with_mode(Some(StoryMode::AiOnly));
///
/// assert_eq!(params.user_text, "The door creaks open");
/// assert!(params.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, derive_setters::Setters)]
#[setters(prefix = "with_")]
pub struct ContinueParams {
    /// Text the human contributes
    pub user_text: String,
    /// Number of generated rounds
    pub rounds: Option<u32>,
    /// Continuation mode
    pub mode: Option<StoryMode>,
}

impl ContinueParams {
    /// Parameters with default rounds and mode.
    pub fn new(user_text: impl Into<String>) -> Self {
        Self {
            user_text: user_text.into(),
            rounds: None,
            mode: None,
        }
    }

    /// Reject input the server would refuse anyway.
    pub fn validate(&self) -> FabulaResult<()> {
        if self.user_text.trim().is_empty() {
            return Err(SessionError::new(SessionErrorKind::EmptyUserText).into());
        }
        if let Some(rounds) = self.rounds {
            if rounds == 0 || rounds > MAX_ROUNDS {
                return Err(SessionError::new(SessionErrorKind::InvalidRounds {
                    max: MAX_ROUNDS,
                    got: rounds,
                })
                .into());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_blank_text() {
        assert!(ContinueParams::new("   ").validate().is_err());
    }

    #[test]
    fn test_validate_checks_rounds() {
        assert!(ContinueParams::new("go").with_rounds(Some(0)).validate().is_err());
        assert!(ContinueParams::new("go").with_rounds(Some(11)).validate().is_err());
        assert!(ContinueParams::new("go").with_rounds(Some(10)).validate().is_ok());
        assert!(ContinueParams::new("go").validate().is_ok());
    }

    #[test]
    fn test_mode_wire_format() {
        assert_eq!(serde_json::to_string(&StoryMode::HumanAi).unwrap(), "\"human_ai\"");
    }
}
