//! Story session error types.

/// Specific error conditions for story session operations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum SessionErrorKind {
    /// The server answered a create request without an identifier
    #[display("Server returned an empty story id")]
    EmptyStoryId,
    /// An operation needs an established story but none exists
    #[display("No story session established")]
    NoSession,
    /// User text was empty or whitespace
    #[display("User text cannot be empty")]
    EmptyUserText,
    /// Rounds outside the accepted range
    #[display("Rounds must be between 1 and {}, got {}", max, got)]
    InvalidRounds {
        /// Largest accepted value
        max: u32,
        /// Value supplied by the caller
        got: u32,
    },
}

/// Error type for story session operations.
///
/// # Examples
///
/// ```
/// use fabula_error::{SessionError, SessionErrorKind};
///
/// let err = SessionError::new(SessionErrorKind::NoSession);
/// assert!(format!("{}", err).contains("No story session"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Session Error: {} at line {} in {}", kind, line, file)]
pub struct SessionError {
    /// The kind of error that occurred
    pub kind: SessionErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl SessionError {
    /// Create a new session error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: SessionErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
