//! JSON decoding errors.

/// A body, pushed frame, or snapshot entry that did not decode.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("JSON Error: {} at line {} in {}", message, line, file)]
pub struct JsonError {
    /// What failed to decode and why
    pub message: String,
    /// Line number where the error was raised
    pub line: u32,
    /// File where the error was raised
    pub file: &'static str,
}

impl JsonError {
    /// Record a decode failure at the caller's location.
    ///
    /// # Examples
    ///
    /// ```
    /// use fabula_error::{FabulaError, JsonError};
    ///
    /// let frame = "{\"turn\": \"three\"}";
    /// let err = JsonError::new(format!("Pushed frame is not a turn: {}", frame));
    /// assert!(err.message.starts_with("Pushed frame"));
    ///
    /// let err: FabulaError = err.into();
    /// assert!(err.kind().message().contains("\"three\""));
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
