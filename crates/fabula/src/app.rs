//! Wiring configuration to concrete clients and storage.

use fabula_client::{ClientConfig, HttpStoryClient};
use fabula_error::FabulaResult;
use fabula_session::{FabulaConfig, ReplayEngine, StorySession};
use fabula_storage::FileSystemSnapshotStore;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Snapshot store in the configured state directory.
pub fn open_store(config: &FabulaConfig) -> FabulaResult<FileSystemSnapshotStore> {
    FileSystemSnapshotStore::new(config.storage.resolved_state_dir())
}

/// Restore the session saved in the configured state directory.
#[instrument(skip(config), fields(base_url = %config.api.base_url))]
pub async fn open_session(config: &FabulaConfig) -> FabulaResult<Arc<StorySession>> {
    let client = HttpStoryClient::new(
        ClientConfig::new(&config.api.base_url, &config.api.socket_url)
            .with_timeout(config.api.timeout()),
    )?;
    let store = open_store(config)?;
    debug!(state_dir = %store.base_path().display(), "Opening session");

    let session =
        StorySession::restore(Arc::new(client), Arc::new(store), config.session.clone()).await;
    Ok(Arc::new(session))
}

/// Replay engine at the configured cadence.
pub fn replay_engine(session: Arc<StorySession>, config: &FabulaConfig) -> ReplayEngine {
    ReplayEngine::new(session, config.replay.interval())
}
