//! The story session: turn store, bootstrap, and persistence bridge.

use crate::{SessionConfig, SessionState};
use fabula_core::{ContinueParams, ContinueRequest, Snapshot, StoryId, Turn, TurnSeries};
use fabula_error::{FabulaError, FabulaResult, JsonError, SessionError, SessionErrorKind};
use fabula_interface::{SnapshotStore, StoryApi};
use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument, warn};

type PendingCreate = Shared<BoxFuture<'static, FabulaResult<StoryId>>>;

#[derive(Debug, Default)]
struct Inner {
    state: SessionState,
    in_flight: usize,
}

/// Marks the session as loading for as long as it lives.
///
/// Dropping the guard clears the flag once no other request is in flight,
/// including when the owning future is cancelled.
struct LoadingGuard<'a> {
    inner: &'a Mutex<Inner>,
}

impl<'a> LoadingGuard<'a> {
    fn enter(inner: &'a Mutex<Inner>) -> Self {
        let mut guard = inner.lock();
        guard.in_flight += 1;
        guard.state.loading = true;
        guard.state.error = None;
        Self { inner }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        let mut guard = self.inner.lock();
        guard.in_flight = guard.in_flight.saturating_sub(1);
        guard.state.loading = guard.in_flight > 0;
    }
}

/// The active story: its identity, its turns, and the status of requests for it.
///
/// A session is constructed once and shared by `Arc`. Turns arrive from two
/// channels, REST continuation batches and pushed socket turns, and are appended
/// in completion order through one append primitive. Every mutation is mirrored
/// to the [`SnapshotStore`].
///
/// # Example
///
/// ```rust,ignore
/// let session = StorySession::restore(api, store, SessionConfig::default()).await;
/// session.continue_session(ContinueParams::new("A lantern flickers")).await?;
/// println!("{:?}", session.series().flow());
/// ```
pub struct StorySession {
    api: Arc<dyn StoryApi>,
    store: Arc<dyn SnapshotStore>,
    settings: SessionConfig,
    inner: Mutex<Inner>,
    pending_create: Mutex<Option<PendingCreate>>,
    persist_lock: tokio::sync::Mutex<()>,
    static_data: OnceCell<serde_json::Value>,
}

impl std::fmt::Debug for StorySession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorySession")
            .field("store", &self.store.backend_name())
            .field("settings", &self.settings)
            .field("state", &self.inner.lock().state)
            .finish()
    }
}

impl StorySession {
    /// Create an empty session.
    pub fn new(
        api: Arc<dyn StoryApi>,
        store: Arc<dyn SnapshotStore>,
        settings: SessionConfig,
    ) -> Self {
        Self::with_snapshot(api, store, settings, Snapshot::default())
    }

    /// Create a session rehydrated from the store's snapshot.
    ///
    /// A store that cannot be read yields an empty session.
    #[instrument(skip_all, fields(backend = store.backend_name()))]
    pub async fn restore(
        api: Arc<dyn StoryApi>,
        store: Arc<dyn SnapshotStore>,
        settings: SessionConfig,
    ) -> Self {
        let snapshot = match store.load().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, "Failed to read session snapshot, starting empty");
                Snapshot::default()
            }
        };
        debug!(
            story_id = ?snapshot.story_id,
            turns = snapshot.turns.len(),
            "Restored session snapshot"
        );
        Self::with_snapshot(api, store, settings, snapshot)
    }

    fn with_snapshot(
        api: Arc<dyn StoryApi>,
        store: Arc<dyn SnapshotStore>,
        settings: SessionConfig,
        snapshot: Snapshot,
    ) -> Self {
        let state = SessionState {
            story_id: snapshot.story_id,
            turns: snapshot.turns,
            loading: false,
            error: None,
        };
        Self {
            api,
            store,
            settings,
            inner: Mutex::new(Inner { state, in_flight: 0 }),
            pending_create: Mutex::new(None),
            persist_lock: tokio::sync::Mutex::new(()),
            static_data: OnceCell::new(),
        }
    }

    /// Consistent copy of the whole state.
    pub fn snapshot(&self) -> SessionState {
        self.inner.lock().state.clone()
    }

    /// Current story id.
    pub fn story_id(&self) -> Option<StoryId> {
        self.inner.lock().state.story_id.clone()
    }

    /// Copy of the turns in append order.
    pub fn turns(&self) -> Vec<Turn> {
        self.inner.lock().state.turns.clone()
    }

    /// Number of turns held.
    pub fn turn_count(&self) -> usize {
        self.inner.lock().state.turns.len()
    }

    /// True while a load or continue request is outstanding.
    pub fn is_loading(&self) -> bool {
        self.inner.lock().state.loading
    }

    /// Message from the last failed load or continue.
    pub fn error(&self) -> Option<String> {
        self.inner.lock().state.error.clone()
    }

    /// Normalized display series, recomputed from the current turns.
    pub fn series(&self) -> TurnSeries {
        TurnSeries::from_turns(&self.inner.lock().state.turns)
    }

    /// Normalized entropy of the newest turn.
    pub fn latest_entropy(&self) -> f64 {
        self.inner.lock().state.latest_entropy()
    }

    /// Defaults this session applies.
    pub fn settings(&self) -> &SessionConfig {
        &self.settings
    }

    /// Return the current story id, creating a story if there is none.
    ///
    /// Concurrent callers share a single create request. A freshly created story
    /// starts with no turns and no error, and is persisted before returning.
    #[instrument(skip(self))]
    pub async fn ensure_session(&self) -> FabulaResult<StoryId> {
        let create = {
            let mut slot = self.pending_create.lock();
            if let Some(story_id) = self.inner.lock().state.story_id.clone() {
                return Ok(story_id);
            }
            match slot.as_ref() {
                Some(pending) => {
                    debug!("Joining in-flight create request");
                    pending.clone()
                }
                None => {
                    let pending = self.create_request();
                    *slot = Some(pending.clone());
                    pending
                }
            }
        };

        let outcome = create.clone().await;

        // Adopt before releasing the slot so no caller can find both empty
        let adopted = {
            let mut slot = self.pending_create.lock();
            let adopted = outcome.map(|created| {
                let mut inner = self.inner.lock();
                match inner.state.story_id.clone() {
                    Some(existing) => Err(existing),
                    None => {
                        inner.state.story_id = Some(created.clone());
                        inner.state.turns.clear();
                        inner.state.error = None;
                        Ok(created)
                    }
                }
            });
            if slot.as_ref().is_some_and(|pending| pending.ptr_eq(&create)) {
                *slot = None;
            }
            adopted
        }?;

        match adopted {
            Ok(story_id) => {
                info!(story_id = %story_id, "Created story session");
                self.persist().await;
                Ok(story_id)
            }
            Err(existing) => Ok(existing),
        }
    }

    fn create_request(&self) -> PendingCreate {
        let api = Arc::clone(&self.api);
        async move {
            let response = api.create_story().await?;
            if response.story_id.is_empty() {
                return Err(SessionError::new(SessionErrorKind::EmptyStoryId).into());
            }
            Ok::<_, FabulaError>(response.story_id)
        }
        .boxed()
        .shared()
    }

    /// Replace the session with an existing story's full history.
    ///
    /// On failure the previous story and turns are kept and the message is
    /// recorded in [`error`](Self::error).
    #[instrument(skip(self), fields(story_id = %story_id))]
    pub async fn load_session(&self, story_id: &StoryId) -> FabulaResult<()> {
        let _loading = LoadingGuard::enter(&self.inner);

        let response = match self.api.get_story(story_id).await {
            Ok(response) => response,
            Err(e) => {
                self.record_error(&e, "Load story failed");
                return Err(e);
            }
        };

        let loaded_id = response
            .story_id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| story_id.clone());
        let count = response.turns.len();
        {
            let mut inner = self.inner.lock();
            inner.state.story_id = Some(loaded_id.clone());
            inner.state.turns = response.turns;
        }
        info!(story_id = %loaded_id, turns = count, "Loaded story session");

        self.persist().await;
        Ok(())
    }

    /// Continue the story and append the turns the server returns.
    ///
    /// Creates a story first when none exists. Returns the number of turns
    /// appended. On failure the turns already held are kept and the message is
    /// recorded in [`error`](Self::error).
    #[instrument(skip(self, params), fields(rounds = ?params.rounds, mode = ?params.mode))]
    pub async fn continue_session(&self, params: ContinueParams) -> FabulaResult<usize> {
        let _loading = LoadingGuard::enter(&self.inner);

        match self.request_continuation(params).await {
            Ok(appended) => Ok(appended),
            Err(e) => {
                self.record_error(&e, "Continue failed");
                Err(e)
            }
        }
    }

    async fn request_continuation(&self, params: ContinueParams) -> FabulaResult<usize> {
        params.validate()?;
        let story_id = self.ensure_session().await?;

        let request = ContinueRequest {
            story_id,
            user_text: params.user_text,
            rounds: params.rounds.unwrap_or(self.settings.default_rounds),
            mode: params.mode.unwrap_or(self.settings.default_mode),
        };
        let response = self.api.continue_story(&request).await?;

        let appended = self.append_turns(response.new_turns);
        debug!(appended, "Appended continuation turns");

        self.persist().await;
        Ok(appended)
    }

    /// Append one turn delivered by the push socket.
    ///
    /// Does not touch `loading` or `error`. Returns false when the dedup policy
    /// skipped the turn.
    #[instrument(skip(self, turn), fields(turn = turn.turn, author = %turn.author))]
    pub async fn append_pushed_turn(&self, turn: Turn) -> bool {
        let appended = self.append_turns(vec![turn]) == 1;
        if appended {
            self.persist().await;
        } else {
            debug!("Skipped duplicate pushed turn");
        }
        appended
    }

    /// Append a batch in order under one lock.
    fn append_turns(&self, turns: Vec<Turn>) -> usize {
        let mut inner = self.inner.lock();
        let before = inner.state.turns.len();
        for turn in turns {
            if self.settings.dedup.admits(&inner.state.turns, &turn) {
                inner.state.turns.push(turn);
            }
        }
        inner.state.turns.len() - before
    }

    fn record_error(&self, error: &FabulaError, fallback: &str) {
        let message = error.kind().message();
        let message = if message.trim().is_empty() {
            fallback.to_string()
        } else {
            message
        };
        warn!(error = %error, "{}", fallback);
        self.inner.lock().state.error = Some(message);
    }

    /// Write the latest state to the store.
    ///
    /// The snapshot is taken after acquiring the write lock so the last writer
    /// always stores the newest state. Failures are logged only.
    async fn persist(&self) {
        let _writing = self.persist_lock.lock().await;
        let snapshot = {
            let inner = self.inner.lock();
            Snapshot {
                story_id: inner.state.story_id.clone(),
                turns: inner.state.turns.clone(),
            }
        };

        if let Err(e) = self.store.save(&snapshot).await {
            warn!(
                backend = self.store.backend_name(),
                error = %e,
                "Failed to persist session snapshot"
            );
        }
    }

    /// Static reference data, fetched at most once per session.
    ///
    /// Concurrent callers share the fetch. A failed or unusable response is
    /// logged and not cached, so the next call tries again.
    #[instrument(skip(self))]
    pub async fn static_data(&self) -> Option<serde_json::Value> {
        let api = &self.api;
        let fetched = self
            .static_data
            .get_or_try_init(|| async {
                let data = api.static_data().await?;
                if is_unusable(&data) {
                    return Err(FabulaError::from(JsonError::new(format!(
                        "Unusable static data response: {}",
                        data
                    ))));
                }
                Ok(data)
            })
            .await;

        match fetched {
            Ok(data) => Some(data.clone()),
            Err(e) => {
                warn!(error = %e, "Static data unavailable");
                None
            }
        }
    }

    /// Comparison metrics for the current story.
    #[instrument(skip(self))]
    pub async fn compare(&self) -> FabulaResult<serde_json::Value> {
        let story_id = self
            .story_id()
            .ok_or_else(|| SessionError::new(SessionErrorKind::NoSession))?;
        self.api.compare(&story_id).await
    }
}

/// Empty objects and `{"error": ...}` bodies carry no reference data.
fn is_unusable(data: &serde_json::Value) -> bool {
    match data.as_object() {
        Some(object) => object.is_empty() || object.contains_key("error"),
        None => data.is_null(),
    }
}
