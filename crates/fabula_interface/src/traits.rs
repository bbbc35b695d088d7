//! Trait definitions for the story service and snapshot storage.

use async_trait::async_trait;
use fabula_core::{
    ContinueRequest, ContinueResponse, CreateStoryResponse, Snapshot, StoryId, StoryResponse,
};
use fabula_error::FabulaResult;

/// The remote story service.
///
/// Transport concerns (base URL, timeouts, status handling) belong to the
/// implementation. Every failure surfaces as an ordinary error.
#[async_trait]
pub trait StoryApi: Send + Sync {
    /// Create a new, empty story.
    async fn create_story(&self) -> FabulaResult<CreateStoryResponse>;

    /// Ask the server to continue a story.
    async fn continue_story(&self, request: &ContinueRequest) -> FabulaResult<ContinueResponse>;

    /// Fetch a story's full turn history.
    async fn get_story(&self, story_id: &StoryId) -> FabulaResult<StoryResponse>;

    /// Fetch the static reference data set. The shape is opaque to the client.
    async fn static_data(&self) -> FabulaResult<serde_json::Value>;

    /// Fetch comparison metrics for a story. The shape is opaque to the client.
    async fn compare(&self, story_id: &StoryId) -> FabulaResult<serde_json::Value>;
}

/// Durable storage for the session snapshot.
///
/// Backends keep two entries, the story id and the encoded turn list, so that
/// snapshots written by one backend read back the same way in another.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Read the snapshot.
    ///
    /// Missing or unreadable entries decode to empty values; only backend
    /// failures (such as an unreadable directory) are errors.
    async fn load(&self) -> FabulaResult<Snapshot>;

    /// Replace the stored snapshot.
    async fn save(&self, snapshot: &Snapshot) -> FabulaResult<()>;

    /// Remove both entries.
    async fn clear(&self) -> FabulaResult<()>;

    /// Backend name for logging (e.g., "filesystem", "memory").
    fn backend_name(&self) -> &'static str;
}
