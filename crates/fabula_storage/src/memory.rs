//! In-memory snapshot storage.

use async_trait::async_trait;
use fabula_core::{STORY_ID_KEY, Snapshot, TURNS_KEY};
use fabula_error::{FabulaResult, JsonError};
use fabula_interface::SnapshotStore;
use parking_lot::Mutex;
use std::collections::HashMap;

/// Key/value snapshot backend that lives as long as the process.
///
/// Entries are kept as raw strings, exactly as the filesystem backend writes
/// them, so tests can plant malformed data with [`InMemorySnapshotStore::set_entry`].
#[derive(Debug, Default)]
pub struct InMemorySnapshotStore {
    entries: Mutex<HashMap<String, String>>,
    saves: Mutex<usize>,
}

impl InMemorySnapshotStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw value of an entry.
    pub fn entry(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    /// Overwrite a raw entry.
    pub fn set_entry(&self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.lock().insert(key.into(), value.into());
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        *self.saves.lock()
    }
}

#[async_trait]
impl SnapshotStore for InMemorySnapshotStore {
    async fn load(&self) -> FabulaResult<Snapshot> {
        let entries = self.entries.lock();
        Ok(Snapshot::from_entries(
            entries.get(STORY_ID_KEY).cloned(),
            entries.get(TURNS_KEY).cloned(),
        ))
    }

    async fn save(&self, snapshot: &Snapshot) -> FabulaResult<()> {
        let turns = snapshot
            .turns_entry()
            .map_err(|e| JsonError::new(format!("Failed to encode turns: {}", e)))?;

        {
            let mut entries = self.entries.lock();
            match &snapshot.story_id {
                Some(story_id) => {
                    entries.insert(STORY_ID_KEY.to_string(), story_id.to_string());
                }
                None => {
                    entries.remove(STORY_ID_KEY);
                }
            }
            entries.insert(TURNS_KEY.to_string(), turns);
        }
        *self.saves.lock() += 1;
        Ok(())
    }

    async fn clear(&self) -> FabulaResult<()> {
        let mut entries = self.entries.lock();
        entries.remove(STORY_ID_KEY);
        entries.remove(TURNS_KEY);
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
