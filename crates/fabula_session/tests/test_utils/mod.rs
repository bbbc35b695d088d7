//! Shared fixtures for session tests.

#![allow(dead_code)]

use async_trait::async_trait;
use fabula_core::{
    Author, ContinueRequest, ContinueResponse, CreateStoryResponse, Snapshot, StoryId,
    StoryResponse, Turn,
};
use fabula_error::{FabulaError, FabulaResult, HttpError, StorageError, StorageErrorKind};
use fabula_interface::{SnapshotStore, StoryApi};
use fabula_session::{SessionConfig, StorySession};
use fabula_storage::InMemorySnapshotStore;
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Scripted story service that counts its calls.
#[derive(Default)]
pub struct MockStoryApi {
    story_ids: Mutex<VecDeque<String>>,
    create_delay: Option<Duration>,
    create_failures: Mutex<VecDeque<FabulaError>>,
    continue_responses: Mutex<VecDeque<FabulaResult<ContinueResponse>>>,
    continue_delay: Option<Duration>,
    stories: Mutex<HashMap<String, StoryResponse>>,
    static_responses: Mutex<VecDeque<FabulaResult<Value>>>,
    last_continue: Mutex<Option<ContinueRequest>>,
    pub create_calls: AtomicUsize,
    pub continue_calls: AtomicUsize,
    pub get_calls: AtomicUsize,
    pub static_calls: AtomicUsize,
    pub compare_calls: AtomicUsize,
}

impl MockStoryApi {
    pub fn new() -> Self {
        Self::default().with_story_ids(["s1"])
    }

    /// Ids handed out by successive create calls; the last one repeats.
    pub fn with_story_ids<I, S>(self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        *self.story_ids.lock() = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_create_delay(mut self, delay: Duration) -> Self {
        self.create_delay = Some(delay);
        self
    }

    pub fn with_continue_delay(mut self, delay: Duration) -> Self {
        self.continue_delay = Some(delay);
        self
    }

    pub fn fail_next_create(&self, error: impl Into<FabulaError>) {
        self.create_failures.lock().push_back(error.into());
    }

    pub fn push_continue(&self, turns: Vec<Turn>) {
        self.continue_responses.lock().push_back(Ok(ContinueResponse {
            story_id: None,
            new_turns: turns,
        }));
    }

    pub fn push_continue_error(&self, error: impl Into<FabulaError>) {
        self.continue_responses.lock().push_back(Err(error.into()));
    }

    pub fn insert_story(&self, story_id: &str, turns: Vec<Turn>) {
        self.stories.lock().insert(
            story_id.to_string(),
            StoryResponse {
                story_id: Some(StoryId::from(story_id)),
                turns,
            },
        );
    }

    pub fn push_static(&self, response: FabulaResult<Value>) {
        self.static_responses.lock().push_back(response);
    }

    pub fn last_continue(&self) -> Option<ContinueRequest> {
        self.last_continue.lock().clone()
    }

    pub fn creates(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StoryApi for MockStoryApi {
    async fn create_story(&self) -> FabulaResult<CreateStoryResponse> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.create_delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(error) = self.create_failures.lock().pop_front() {
            return Err(error);
        }
        let story_id = {
            let mut ids = self.story_ids.lock();
            if ids.len() > 1 {
                ids.pop_front().unwrap_or_default()
            } else {
                ids.front().cloned().unwrap_or_default()
            }
        };
        Ok(CreateStoryResponse {
            story_id: StoryId::from(story_id),
        })
    }

    async fn continue_story(&self, request: &ContinueRequest) -> FabulaResult<ContinueResponse> {
        self.continue_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_continue.lock() = Some(request.clone());
        if let Some(delay) = self.continue_delay {
            tokio::time::sleep(delay).await;
        }
        self.continue_responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(ContinueResponse::default()))
    }

    async fn get_story(&self, story_id: &StoryId) -> FabulaResult<StoryResponse> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        self.stories
            .lock()
            .get(story_id.as_str())
            .cloned()
            .ok_or_else(|| HttpError::with_status(404, "story not found").into())
    }

    async fn static_data(&self) -> FabulaResult<Value> {
        self.static_calls.fetch_add(1, Ordering::SeqCst);
        self.static_responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(json!({"rivers": ["Nile", "Amazon"]})))
    }

    async fn compare(&self, story_id: &StoryId) -> FabulaResult<Value> {
        self.compare_calls.fetch_add(1, Ordering::SeqCst);
        Ok(json!({"story_id": story_id.as_str(), "baseline": [0.2, 0.4]}))
    }
}

/// Store whose writes always fail.
pub struct FailingStore;

#[async_trait]
impl SnapshotStore for FailingStore {
    async fn load(&self) -> FabulaResult<Snapshot> {
        Err(StorageError::new(StorageErrorKind::FileRead("disk on fire".to_string())).into())
    }

    async fn save(&self, _snapshot: &Snapshot) -> FabulaResult<()> {
        Err(StorageError::new(StorageErrorKind::FileWrite("disk on fire".to_string())).into())
    }

    async fn clear(&self) -> FabulaResult<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "failing"
    }
}

pub fn human(story_id: &str, turn: i64, text: &str) -> Turn {
    Turn::new(story_id, turn, Author::Human, text)
}

pub fn ai(story_id: &str, turn: i64, text: &str) -> Turn {
    Turn::new(story_id, turn, Author::Ai, text)
}

/// A fresh session over the given api and an in-memory store.
pub fn session_with(
    api: Arc<MockStoryApi>,
    settings: SessionConfig,
) -> (Arc<StorySession>, Arc<InMemorySnapshotStore>) {
    let store = Arc::new(InMemorySnapshotStore::new());
    let session = StorySession::new(api, store.clone(), settings);
    (Arc::new(session), store)
}

/// A session already holding `turns` for story `s1`.
pub async fn session_with_turns(turns: Vec<Turn>) -> Arc<StorySession> {
    let api = Arc::new(MockStoryApi::new());
    api.insert_story("s1", turns);
    let (session, _store) = session_with(api, SessionConfig::default());
    session
        .load_session(&StoryId::from("s1"))
        .await
        .unwrap();
    session
}
