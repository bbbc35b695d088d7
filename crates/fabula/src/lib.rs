//! Fabula - client-side story sessions.
//!
//! Fabula talks to a collaborative storytelling service. It keeps the active
//! story's turns in memory and on disk, derives normalized flow and entropy
//! series for charts, accepts turns pushed over a WebSocket, and replays a
//! story turn by turn.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use fabula::{ContinueParams, FabulaConfig, open_session};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = FabulaConfig::load()?;
//!     let session = open_session(&config).await?;
//!
//!     session.continue_session(ContinueParams::new("The map was wrong")).await?;
//!     for (label, flow) in session.series().labels().iter().zip(session.series().flow()) {
//!         println!("{}: {:.2}", label, flow);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `fabula_error` - Error types
//! - `fabula_core` - Turns, normalizer, display series, wire shapes
//! - `fabula_interface` - `StoryApi` and `SnapshotStore` traits
//! - `fabula_storage` - Snapshot backends
//! - `fabula_client` - HTTP and WebSocket clients
//! - `fabula_session` - Session state, bootstrap, replay, configuration
//!
//! This crate re-exports everything for convenience.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod app;
pub mod observability;

pub use app::{open_session, open_store, replay_engine};

pub use fabula_error::{
    ConfigError, FabulaError, FabulaErrorKind, FabulaResult, HttpError, JsonError, SessionError,
    SessionErrorKind, SocketError, SocketErrorKind, StorageError, StorageErrorKind,
};

pub use fabula_core::{
    Author, ContinueParams, ContinueRequest, ContinueResponse, CreateStoryResponse, MAX_ROUNDS,
    PROVISIONAL_TURN, PushEvent, PushPrompt, Snapshot, StoryId, StoryMode, StoryResponse, Turn,
    TurnSeries, latest_entropy, normalize,
};

pub use fabula_interface::{SnapshotStore, StoryApi};

pub use fabula_storage::{FileSystemSnapshotStore, InMemorySnapshotStore};

pub use fabula_client::{ClientConfig, HttpStoryClient, StorySocket, socket_url};

pub use fabula_session::{
    ApiConfig, DedupPolicy, FabulaConfig, ReplayConfig, ReplayCursor, ReplayEngine, ReplayState,
    SessionConfig, SessionState, StorageConfig, StorySession,
};
