//! Layered configuration for Fabula sessions.
//!
//! Sources, lowest precedence first:
//! - Bundled defaults (include_str! from fabula.toml)
//! - `~/.config/fabula/fabula.toml`
//! - `./fabula.toml`
//! - Environment variables prefixed `FABULA__`, e.g. `FABULA__API__BASE_URL`

use crate::DedupPolicy;
use config::{Config, Environment, File, FileFormat};
use fabula_core::StoryMode;
use fabula_error::{ConfigError, FabulaError, FabulaResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, instrument};

/// Bundled default configuration
const DEFAULT_CONFIG: &str = include_str!("../../../fabula.toml");

/// Story service endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// REST base URL
    pub base_url: String,
    /// Push socket base URL
    pub socket_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            socket_url: "ws://127.0.0.1:8000".to_string(),
            timeout_secs: 30,
        }
    }
}

impl ApiConfig {
    /// Request timeout as a duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Defaults applied to continuation requests and appends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Mode used when a request does not name one
    pub default_mode: StoryMode,
    /// Rounds used when a request does not name them
    pub default_rounds: u32,
    /// Duplicate handling for appended turns
    pub dedup: DedupPolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_mode: StoryMode::HumanAi,
            default_rounds: 1,
            dedup: DedupPolicy::KeepAll,
        }
    }
}

/// Replay cadence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    /// Milliseconds between revealed turns
    pub interval_ms: u64,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self { interval_ms: 450 }
    }
}

impl ReplayConfig {
    /// Interval as a duration.
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// Where the session snapshot lives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Snapshot directory; the platform data directory when unset
    pub state_dir: Option<PathBuf>,
}

impl StorageConfig {
    /// The configured directory, or `<data dir>/fabula`.
    ///
    /// Falls back to `./.fabula` on platforms without a data directory.
    pub fn resolved_state_dir(&self) -> PathBuf {
        match &self.state_dir {
            Some(dir) => dir.clone(),
            None => dirs::data_dir()
                .map(|dir| dir.join("fabula"))
                .unwrap_or_else(|| PathBuf::from(".fabula")),
        }
    }
}

/// Complete Fabula configuration.
///
/// # Example
///
/// ```toml
/// [api]
/// base_url = "http://localhost:8000/api"
///
/// [session]
/// default_rounds = 2
/// dedup = "by_story_turn"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FabulaConfig {
    /// Story service endpoints
    pub api: ApiConfig,
    /// Request and append defaults
    pub session: SessionConfig,
    /// Replay cadence
    pub replay: ReplayConfig,
    /// Snapshot location
    pub storage: StorageConfig,
}

impl FabulaConfig {
    /// Load configuration from every source, user values taking precedence.
    #[instrument]
    pub fn load() -> FabulaResult<Self> {
        debug!("Loading configuration with precedence: env > current dir > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/fabula/fabula.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder
            .add_source(File::with_name("fabula").required(false))
            .add_source(
                Environment::with_prefix("FABULA")
                    .separator("__")
                    .try_parsing(true),
            );

        Self::finish(builder)
    }

    /// Load the bundled defaults overridden by a single file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> FabulaResult<Self> {
        debug!("Loading configuration from file");

        let builder = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::from(path.as_ref()));

        Self::finish(builder)
    }

    fn finish(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> FabulaResult<Self> {
        builder
            .build()
            .map_err(|e| {
                FabulaError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                FabulaError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }
}
