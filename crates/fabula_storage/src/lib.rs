//! Session snapshot storage for Fabula.
//!
//! A session mirrors its story id and turn history into durable storage after
//! every mutation and reads it back once at startup. Two backends are provided:
//!
//! - [`FileSystemSnapshotStore`] - one file per entry inside a state directory
//! - [`InMemorySnapshotStore`] - a key/value map, for tests and throwaway sessions
//!
//! Both store the same two raw entries ([`STORY_ID_KEY`] and [`TURNS_KEY`]) and
//! decode them with [`Snapshot::from_entries`], so unreadable data degrades to an
//! empty session in the same way everywhere.
//!
//! # Example
//!
//! ```rust
//! use fabula_core::{Author, Snapshot, StoryId, Turn};
//! use fabula_interface::SnapshotStore;
//! use fabula_storage::InMemorySnapshotStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = InMemorySnapshotStore::new();
//! let snapshot = Snapshot {
//!     story_id: Some(StoryId::from("s1")),
//!     turns: vec![Turn::new("s1", 1, Author::Human, "hi")],
//! };
//!
//! store.save(&snapshot).await?;
//! assert_eq!(store.load().await?, snapshot);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod filesystem;
mod memory;

pub use fabula_core::{STORY_ID_KEY, Snapshot, TURNS_KEY};
pub use fabula_error::{StorageError, StorageErrorKind};
pub use filesystem::FileSystemSnapshotStore;
pub use memory::InMemorySnapshotStore;
