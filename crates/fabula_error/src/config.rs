//! Errors raised while loading `fabula.toml` and its overrides.

/// A configuration source that could not be read or did not fit the schema.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Configuration Error: {} at line {} in {}", message, line, file)]
pub struct ConfigError {
    /// Which source failed and how
    pub message: String,
    /// Line number where the error was raised
    pub line: u32,
    /// File where the error was raised
    pub file: &'static str,
}

impl ConfigError {
    /// Record a configuration failure at the caller's location.
    ///
    /// # Examples
    ///
    /// ```
    /// use fabula_error::ConfigError;
    ///
    /// let err = ConfigError::new("Failed to parse configuration: invalid type for `replay.interval_ms`");
    /// assert!(err.message.contains("replay.interval_ms"));
    /// assert!(format!("{}", err).starts_with("Configuration Error"));
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
