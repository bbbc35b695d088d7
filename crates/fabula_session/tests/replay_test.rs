//! Tests for the replay state machine on a paused clock.

mod test_utils;

use fabula_core::StoryId;
use fabula_session::{ReplayEngine, ReplayState, SessionConfig};
use std::sync::Arc;
use std::time::Duration;
use test_utils::{MockStoryApi, ai, human, session_with, session_with_turns};
use tokio::time::Instant;

const INTERVAL: Duration = Duration::from_millis(450);

async fn three_turn_engine() -> ReplayEngine {
    let session = session_with_turns(vec![
        human("s1", 1, "a"),
        ai("s1", 2, "b"),
        human("s1", 3, "c"),
    ])
    .await;
    ReplayEngine::new(session, INTERVAL)
}

#[tokio::test(start_paused = true)]
async fn test_play_reaches_end_and_stops() {
    let engine = three_turn_engine().await;
    let start = Instant::now();

    engine.play().await;

    let cursor = engine.cursor();
    assert_eq!(cursor.index, 3);
    assert!(!cursor.playing);
    assert!(cursor.ever_played);
    assert_eq!(cursor.state, ReplayState::Finished);
    assert!(start.elapsed() >= INTERVAL * 3);
    assert!(start.elapsed() < INTERVAL * 4);
    assert_eq!(engine.visible_turns().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_index_advances_one_per_tick() {
    let engine = three_turn_engine().await;
    let mut updates = engine.subscribe();
    let handle = engine.spawn_play();

    let mut seen = Vec::new();
    while updates.changed().await.is_ok() {
        let cursor = *updates.borrow_and_update();
        seen.push(cursor.index);
        if !cursor.playing {
            break;
        }
    }
    handle.await.unwrap();

    // The last tick and the end of the run land in the same update
    assert_eq!(seen, vec![0, 1, 2, 3]);
}

#[tokio::test(start_paused = true)]
async fn test_pause_after_first_tick_freezes_index() {
    let engine = three_turn_engine().await;
    let handle = engine.spawn_play();

    tokio::time::sleep(INTERVAL + Duration::from_millis(10)).await;
    assert_eq!(engine.cursor().index, 1);
    engine.pause();
    handle.await.unwrap();

    let cursor = engine.cursor();
    assert_eq!(cursor.index, 1);
    assert!(!cursor.playing);
    assert_eq!(cursor.state, ReplayState::Paused);
    assert_eq!(engine.visible_turns().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_play_again_restarts_from_zero() {
    let engine = three_turn_engine().await;
    let handle = engine.spawn_play();
    tokio::time::sleep(INTERVAL * 2 + Duration::from_millis(10)).await;
    engine.pause();
    handle.await.unwrap();
    assert_eq!(engine.cursor().index, 2);

    let handle = engine.spawn_play();
    tokio::task::yield_now().await;
    assert_eq!(engine.cursor().index, 0);
    assert!(engine.cursor().playing);
    assert!(engine.visible_turns().is_empty());

    handle.await.unwrap();
    assert_eq!(engine.cursor().index, 3);
}

#[tokio::test(start_paused = true)]
async fn test_reset_cancels_run() {
    let engine = three_turn_engine().await;
    let handle = engine.spawn_play();
    tokio::time::sleep(INTERVAL + Duration::from_millis(10)).await;

    engine.reset();
    handle.await.unwrap();

    let cursor = engine.cursor();
    assert_eq!(cursor.index, 0);
    assert!(!cursor.playing);
    assert_eq!(cursor.state, ReplayState::Idle);
    assert!(cursor.ever_played);
    assert_eq!(engine.visible_turns().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_newer_play_supersedes_older_loop() {
    let engine = three_turn_engine().await;
    let first = engine.spawn_play();
    tokio::time::sleep(INTERVAL + Duration::from_millis(10)).await;

    let second = engine.spawn_play();
    first.await.unwrap();
    second.await.unwrap();

    assert_eq!(engine.cursor().index, 3);
    assert_eq!(engine.cursor().state, ReplayState::Finished);
}

#[tokio::test(start_paused = true)]
async fn test_appends_during_play_extend_the_run() {
    let session = session_with_turns(vec![human("s1", 1, "a")]).await;
    let engine = ReplayEngine::new(session.clone(), INTERVAL);
    let handle = engine.spawn_play();

    tokio::time::sleep(Duration::from_millis(100)).await;
    session.append_pushed_turn(ai("s1", 2, "b")).await;
    session.append_pushed_turn(ai("s1", -1, "c")).await;
    handle.await.unwrap();

    assert_eq!(engine.cursor().index, 3);
}

#[tokio::test(start_paused = true)]
async fn test_empty_session_finishes_immediately() {
    let session = session_with_turns(vec![]).await;
    let engine = ReplayEngine::new(session, INTERVAL);
    let start = Instant::now();

    engine.play().await;

    assert_eq!(engine.cursor().index, 0);
    assert!(!engine.cursor().playing);
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test]
async fn test_never_played_shows_everything() {
    let session = session_with_turns(vec![human("s1", 1, "a")]).await;
    let engine = ReplayEngine::new(session.clone(), INTERVAL);

    session.append_pushed_turn(ai("s1", 2, "b")).await;

    assert!(!engine.cursor().ever_played);
    assert_eq!(engine.visible_turns().len(), 2);
    assert_eq!(engine.visible_series().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_loading_shorter_story_clamps_paused_index() {
    let api = Arc::new(MockStoryApi::new());
    api.insert_story(
        "s1",
        vec![human("s1", 1, "a"), ai("s1", 2, "b"), human("s1", 3, "c")],
    );
    api.insert_story("s2", vec![human("s2", 1, "only")]);
    let (session, _store) = session_with(api, SessionConfig::default());
    session.load_session(&StoryId::from("s1")).await.unwrap();

    let engine = ReplayEngine::new(session.clone(), INTERVAL);
    let handle = engine.spawn_play();
    tokio::time::sleep(INTERVAL * 2 + Duration::from_millis(10)).await;
    engine.pause();
    handle.await.unwrap();
    assert_eq!(engine.cursor().index, 2);

    session.load_session(&StoryId::from("s2")).await.unwrap();

    let cursor = engine.cursor();
    assert_eq!(cursor.index, 1);
    assert_eq!(cursor.state, ReplayState::Paused);
    assert_eq!(engine.visible_turns().len(), 1);
}
