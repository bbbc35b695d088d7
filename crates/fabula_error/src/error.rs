//! Top-level error wrapper types.

use crate::{ConfigError, HttpError, JsonError, SessionError, SocketError, StorageError};

/// Every failure a Fabula operation can report.
///
/// # Examples
///
/// ```
/// use fabula_error::{FabulaError, HttpError};
///
/// let http_err = HttpError::new("Connection failed");
/// let err: FabulaError = http_err.into();
/// assert!(format!("{}", err).contains("HTTP Error"));
/// ```
#[derive(Debug, Clone, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum FabulaErrorKind {
    /// HTTP transport error
    #[from(HttpError)]
    Http(HttpError),
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Snapshot storage error
    #[from(StorageError)]
    Storage(StorageError),
    /// Story session error
    #[from(SessionError)]
    Session(SessionError),
    /// Push socket error
    #[from(SocketError)]
    Socket(SocketError),
}

/// Fabula error with kind discrimination.
///
/// # Examples
///
/// ```
/// use fabula_error::{ConfigError, FabulaResult};
///
/// fn might_fail() -> FabulaResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// assert!(might_fail().is_err());
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Fabula Error: {}", _0)]
pub struct FabulaError(Box<FabulaErrorKind>);

impl FabulaError {
    /// Create a new error from a kind.
    pub fn new(kind: FabulaErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &FabulaErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to FabulaErrorKind
impl<T> From<T> for FabulaError
where
    T: Into<FabulaErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Fabula operations.
pub type FabulaResult<T> = std::result::Result<T, FabulaError>;

impl FabulaErrorKind {
    /// Human-readable message without the source location.
    ///
    /// This is the text shown to users when an operation fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use fabula_error::{FabulaError, HttpError};
    ///
    /// let err: FabulaError = HttpError::with_status(502, "Bad gateway").into();
    /// assert_eq!(err.kind().message(), "Bad gateway");
    /// ```
    pub fn message(&self) -> String {
        match self {
            FabulaErrorKind::Http(e) => e.message.clone(),
            FabulaErrorKind::Json(e) => e.message.clone(),
            FabulaErrorKind::Config(e) => e.message.clone(),
            FabulaErrorKind::Storage(e) => e.kind.to_string(),
            FabulaErrorKind::Session(e) => e.kind.to_string(),
            FabulaErrorKind::Socket(e) => e.kind.to_string(),
        }
    }
}
