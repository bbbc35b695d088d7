//! Timed, cancellable replay of a session's turns.
//!
//! The engine reveals turns one at a time at a fixed interval. It only reads the
//! session; appends that happen during playback simply extend the run because
//! the turn count is re-read on every tick.

use crate::StorySession;
use fabula_core::{Turn, TurnSeries};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, instrument};

/// Where the replay state machine is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, strum::Display)]
pub enum ReplayState {
    /// Not started or reset; every turn is visible
    #[default]
    Idle,
    /// Revealing turns
    Playing,
    /// Stopped by [`ReplayEngine::pause`]; the index is kept
    Paused,
    /// Ran off the end of the turns; the index equals the turn count
    Finished,
}

/// Replay position published to subscribers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayCursor {
    /// Number of turns revealed
    pub index: usize,
    /// True while the playback loop is advancing
    pub playing: bool,
    /// True once play has been started at least once
    pub ever_played: bool,
    /// State machine position
    pub state: ReplayState,
    /// Run counter; a loop that sees a newer value stops
    pub generation: u64,
}

struct ReplayInner {
    session: Arc<StorySession>,
    interval: Duration,
    cursor: watch::Sender<ReplayCursor>,
}

/// Replay controller over a shared session.
///
/// Cheap to clone; clones drive the same cursor.
#[derive(Clone)]
pub struct ReplayEngine {
    inner: Arc<ReplayInner>,
}

impl std::fmt::Debug for ReplayEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReplayEngine")
            .field("interval", &self.inner.interval)
            .field("cursor", &*self.inner.cursor.borrow())
            .finish()
    }
}

impl ReplayEngine {
    /// Create an idle engine.
    pub fn new(session: Arc<StorySession>, interval: Duration) -> Self {
        let (cursor, _) = watch::channel(ReplayCursor::default());
        Self {
            inner: Arc::new(ReplayInner {
                session,
                interval,
                cursor,
            }),
        }
    }

    /// Time between revealed turns.
    pub fn interval(&self) -> Duration {
        self.inner.interval
    }

    /// Current cursor, with `index` clamped to the current turn count.
    ///
    /// Loading a shorter story while paused leaves the stored index past the
    /// end; it is clamped here on read.
    pub fn cursor(&self) -> ReplayCursor {
        let count = self.inner.session.turn_count();
        let mut cursor = *self.inner.cursor.borrow();
        cursor.index = cursor.index.min(count);
        cursor
    }

    /// Receive every cursor change.
    ///
    /// Values are published as stored; use [`cursor`](Self::cursor) for the
    /// clamped view.
    pub fn subscribe(&self) -> watch::Receiver<ReplayCursor> {
        self.inner.cursor.subscribe()
    }

    /// Restart from the first turn and reveal one turn per interval.
    ///
    /// Resolves when the run reaches the end of the turns or is stopped by
    /// [`pause`](Self::pause), [`reset`](Self::reset), or a newer `play`.
    #[instrument(skip(self), fields(interval_ms = self.inner.interval.as_millis() as u64))]
    pub async fn play(&self) {
        let mut generation = 0;
        self.inner.cursor.send_modify(|cursor| {
            cursor.generation += 1;
            cursor.index = 0;
            cursor.playing = true;
            cursor.ever_played = true;
            cursor.state = ReplayState::Playing;
            generation = cursor.generation;
        });
        debug!(generation, "Replay started");

        loop {
            let count = self.inner.session.turn_count();
            let mut running = true;
            self.inner.cursor.send_if_modified(|cursor| {
                if cursor.generation != generation || !cursor.playing {
                    running = false;
                    return false;
                }
                if cursor.index >= count {
                    cursor.playing = false;
                    cursor.state = ReplayState::Finished;
                    running = false;
                    return true;
                }
                false
            });
            if !running {
                break;
            }

            tokio::time::sleep(self.inner.interval).await;

            let count = self.inner.session.turn_count();
            self.inner.cursor.send_if_modified(|cursor| {
                if cursor.generation == generation && cursor.playing && cursor.index < count {
                    cursor.index += 1;
                    true
                } else {
                    false
                }
            });
        }

        debug!(generation, index = self.cursor().index, "Replay loop exited");
    }

    /// Run [`play`](Self::play) on a background task.
    pub fn spawn_play(&self) -> JoinHandle<()> {
        let engine = self.clone();
        tokio::spawn(async move { engine.play().await })
    }

    /// Stop advancing and keep the current index.
    ///
    /// A tick already waiting elapses without incrementing.
    pub fn pause(&self) {
        self.inner.cursor.send_if_modified(|cursor| {
            if !cursor.playing {
                return false;
            }
            cursor.playing = false;
            cursor.state = ReplayState::Paused;
            true
        });
        debug!(index = self.cursor().index, "Replay paused");
    }

    /// Cancel any run and return to the idle state.
    pub fn reset(&self) {
        self.inner.cursor.send_modify(|cursor| {
            cursor.generation += 1;
            cursor.index = 0;
            cursor.playing = false;
            cursor.state = ReplayState::Idle;
        });
        debug!("Replay reset");
    }

    /// Turns currently revealed.
    ///
    /// Every turn is visible while idle at index 0; otherwise the first `index`
    /// turns are.
    pub fn visible_turns(&self) -> Vec<Turn> {
        let cursor = self.cursor();
        let turns = self.inner.session.turns();
        if cursor.index == 0 && !cursor.playing {
            turns
        } else {
            turns.into_iter().take(cursor.index).collect()
        }
    }

    /// Display series for the revealed turns.
    pub fn visible_series(&self) -> TurnSeries {
        TurnSeries::from_turns(&self.visible_turns())
    }
}
