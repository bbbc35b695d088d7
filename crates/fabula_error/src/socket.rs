//! Push socket error types.

/// Kinds of push socket errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum SocketErrorKind {
    /// Socket URL could not be built
    #[display("Invalid socket URL: {}", _0)]
    InvalidUrl(String),
    /// WebSocket connection failed
    #[display("WebSocket connection failed: {}", _0)]
    Connection(String),
    /// Sending a frame failed
    #[display("WebSocket send failed: {}", _0)]
    Send(String),
    /// The socket is already closed
    #[display("WebSocket closed")]
    Closed,
}

/// Push socket error with location tracking.
///
/// # Examples
///
/// ```
/// use fabula_error::{SocketError, SocketErrorKind};
///
/// let err = SocketError::new(SocketErrorKind::Closed);
/// assert!(format!("{}", err).contains("closed"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Socket Error: {} at line {} in {}", kind, line, file)]
pub struct SocketError {
    /// The kind of error that occurred
    pub kind: SocketErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl SocketError {
    /// Create a new socket error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: SocketErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
