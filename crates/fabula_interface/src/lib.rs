//! Trait definitions for the Fabula story client.
//!
//! The session engine talks to the outside world through two seams:
//! - [`StoryApi`] - the REST story service
//! - [`SnapshotStore`] - durable local storage for the session snapshot
//!
//! Concrete implementations live in `fabula_client` and `fabula_storage`; tests
//! substitute their own.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;

pub use traits::{SnapshotStore, StoryApi};
