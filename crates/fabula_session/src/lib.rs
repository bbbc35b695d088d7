//! Story session engine for Fabula.
//!
//! [`StorySession`] owns the active story: it creates or loads stories, appends
//! turns from continuation requests and the push socket, and mirrors every
//! change to a [`SnapshotStore`](fabula_interface::SnapshotStore).
//! [`ReplayEngine`] reveals a session's turns over time for visualization.
//! [`FabulaConfig`] carries the layered configuration for all of it.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod dedup;
mod push;
mod replay;
mod session;
mod state;

pub use config::{ApiConfig, FabulaConfig, ReplayConfig, SessionConfig, StorageConfig};
pub use dedup::DedupPolicy;
pub use replay::{ReplayCursor, ReplayEngine, ReplayState};
pub use session::StorySession;
pub use state::SessionState;
