//! Command handlers.

use super::commands::{Commands, OutputFormat};
use fabula::{
    ContinueParams, FabulaConfig, FabulaResult, JsonError, PushEvent, PushPrompt, ReplayEngine,
    SnapshotStore, StoryId, StorySession, StorySocket, Turn, normalize, open_session, open_store,
    replay_engine,
};
use futures_util::StreamExt;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Execute one command against the saved session.
pub async fn handle_command(command: Commands, config: &FabulaConfig) -> FabulaResult<()> {
    if let Commands::Reset = command {
        return reset(config).await;
    }

    let session = open_session(config).await?;
    match command {
        Commands::Create => {
            let story_id = session.ensure_session().await?;
            println!("{}", story_id);
        }
        Commands::Load { story_id } => {
            session.load_session(&StoryId::from(story_id)).await?;
            println!(
                "Loaded {} ({} turns)",
                session.story_id().unwrap_or_default(),
                session.turn_count()
            );
        }
        Commands::Continue { text, rounds, mode } => {
            let params = ContinueParams::new(text).with_rounds(rounds).with_mode(mode);
            let appended = session.continue_session(params).await?;
            let turns = session.turns();
            for turn in &turns[turns.len().saturating_sub(appended)..] {
                print_turn(turn);
            }
        }
        Commands::Show { format } => show(&session, format)?,
        Commands::Replay { interval_ms } => {
            let engine = match interval_ms {
                Some(ms) => ReplayEngine::new(session.clone(), Duration::from_millis(ms)),
                None => replay_engine(session.clone(), config),
            };
            replay(&engine).await;
        }
        Commands::Listen {
            prompt,
            rounds,
            mode,
        } => {
            let prompt = prompt.map(|text| {
                PushPrompt::new(
                    text,
                    rounds.unwrap_or(session.settings().default_rounds),
                    mode.unwrap_or(session.settings().default_mode),
                )
            });
            listen(&session, config, prompt).await?;
        }
        Commands::StaticData => match session.static_data().await {
            Some(data) => print_json(&data)?,
            None => eprintln!("Static data unavailable"),
        },
        Commands::Compare => {
            let metrics = session.compare().await?;
            print_json(&metrics)?;
        }
        Commands::Reset => {}
    }

    Ok(())
}

fn print_turn(turn: &Turn) {
    println!(
        "{:>4} [{}] {}  (flow {:.2}, entropy {:.2})",
        turn.label(),
        turn.author,
        turn.text,
        normalize(turn.flow_score),
        normalize(turn.entropy_score)
    );
}

fn print_json(value: &serde_json::Value) -> FabulaResult<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| JsonError::new(format!("Failed to format JSON: {}", e)))?;
    println!("{}", text);
    Ok(())
}

fn show(session: &StorySession, format: OutputFormat) -> FabulaResult<()> {
    let state = session.snapshot();
    match format {
        OutputFormat::Json => print_json(&json!({
            "story_id": state.story_id(),
            "turns": state.turns(),
            "series": state.series(),
            "latest_entropy": state.latest_entropy(),
        })),
        OutputFormat::Human => {
            match state.story_id() {
                Some(story_id) => println!("Story {}", story_id),
                None => println!("No active story"),
            }
            println!("{:-<80}", "");
            for turn in state.turns() {
                print_turn(turn);
            }
            println!("{:-<80}", "");
            println!(
                "Turns: {}  Latest entropy: {:.2}",
                state.turns().len(),
                state.latest_entropy()
            );
            Ok(())
        }
    }
}

async fn replay(engine: &ReplayEngine) {
    let mut updates = engine.subscribe();
    let handle = engine.spawn_play();
    let mut shown = 0;

    while updates.changed().await.is_ok() {
        let cursor = *updates.borrow_and_update();
        let visible = engine.visible_turns();
        for turn in visible.iter().take(cursor.index).skip(shown) {
            print_turn(turn);
        }
        shown = shown.max(cursor.index);
        if !cursor.playing {
            break;
        }
    }

    if let Err(e) = handle.await {
        warn!(error = %e, "Replay task failed");
    }
}

async fn listen(
    session: &Arc<StorySession>,
    config: &FabulaConfig,
    prompt: Option<PushPrompt>,
) -> FabulaResult<()> {
    let story_id = session.ensure_session().await?;
    let mut socket = StorySocket::connect(&config.api.socket_url, &story_id).await?;
    let events = socket.events()?.inspect(|event| match event {
        PushEvent::Turn(turn) => print_turn(turn),
        PushEvent::Error(message) => eprintln!("Socket error: {}", message),
        PushEvent::Opened | PushEvent::Closed => {}
    });

    if let Some(prompt) = prompt {
        socket.send_prompt(&prompt).await?;
    }

    info!(story_id = %story_id, "Listening for pushed turns, Ctrl-C to stop");
    tokio::select! {
        appended = session.attach_push_stream(events) => {
            info!(appended, "Push socket closed by server");
        }
        _ = tokio::signal::ctrl_c() => {
            socket.close().await?;
        }
    }
    Ok(())
}

async fn reset(config: &FabulaConfig) -> FabulaResult<()> {
    let store = open_store(config)?;
    store.clear().await?;
    println!("Saved session cleared");
    Ok(())
}
