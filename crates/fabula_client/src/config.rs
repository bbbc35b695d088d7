//! Connection settings for the story service.

use std::time::Duration;

/// Request budget applied when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Where the story service lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientConfig {
    /// Base URL of the REST API (e.g., "http://127.0.0.1:8000" or "http://host/api")
    pub base_url: String,
    /// Base URL of the push socket (e.g., "ws://127.0.0.1:8000")
    pub socket_url: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl ClientConfig {
    /// Create a configuration with the default timeout.
    ///
    /// Trailing slashes are trimmed so paths can be appended directly.
    pub fn new(base_url: impl Into<String>, socket_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            socket_url: socket_url.into().trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Full URL for an API path such as `/story/create`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}
