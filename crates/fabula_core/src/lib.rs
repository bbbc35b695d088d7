//! Core data types for the Fabula story client.
//!
//! This crate provides the foundation data types shared by every Fabula crate:
//! turns and their authors, the metric normalizer and the display series derived
//! from it, the request/response shapes of the story API, and the persisted
//! snapshot.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod author;
mod mode;
mod normalize;
mod push;
mod series;
mod snapshot;
mod turn;
mod wire;

pub use author::Author;
pub use mode::{ContinueParams, MAX_ROUNDS, StoryMode};
pub use normalize::normalize;
pub use push::{PushEvent, PushPrompt};
pub use series::{TurnSeries, latest_entropy};
pub use snapshot::{STORY_ID_KEY, Snapshot, TURNS_KEY};
pub use turn::{PROVISIONAL_TURN, StoryId, Turn};
pub use wire::{ContinueRequest, ContinueResponse, CreateStoryResponse, StoryResponse};
