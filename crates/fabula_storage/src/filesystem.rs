//! Filesystem-based snapshot storage.
//!
//! Each entry is a file named after its key inside the state directory:
//!
//! ```text
//! ~/.local/share/fabula/
//! ├── story_id       (plain text)
//! └── story_turns    (JSON array)
//! ```

use async_trait::async_trait;
use fabula_core::{STORY_ID_KEY, Snapshot, TURNS_KEY};
use fabula_error::{FabulaResult, JsonError, StorageError, StorageErrorKind};
use fabula_interface::SnapshotStore;
use std::path::{Path, PathBuf};

/// Filesystem snapshot backend.
///
/// Writes go to a temporary file that is renamed over the entry, so a crash
/// mid-write leaves the previous entry intact.
#[derive(Debug, Clone)]
pub struct FileSystemSnapshotStore {
    base_path: PathBuf,
}

impl FileSystemSnapshotStore {
    /// Create a store rooted at `base_path`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created.
    #[tracing::instrument(skip(base_path))]
    pub fn new(base_path: impl Into<PathBuf>) -> FabulaResult<Self> {
        let base_path = base_path.into();

        std::fs::create_dir_all(&base_path).map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                base_path.display(),
                e
            )))
        })?;

        tracing::debug!(path = %base_path.display(), "Created filesystem snapshot store");
        Ok(Self { base_path })
    }

    /// Directory holding the entries.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.base_path.join(key)
    }

    async fn read_entry(&self, key: &str) -> FabulaResult<Option<String>> {
        let path = self.entry_path(key);
        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            // Non-UTF-8 contents are as good as missing
            Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                tracing::warn!(path = %path.display(), "Snapshot entry is not UTF-8, ignoring");
                Ok(None)
            }
            Err(e) => Err(StorageError::new(StorageErrorKind::FileRead(format!(
                "{}: {}",
                path.display(),
                e
            )))
            .into()),
        }
    }

    async fn write_entry(&self, key: &str, contents: &str) -> FabulaResult<()> {
        let path = self.entry_path(key);
        let temp_path = path.with_extension("tmp");

        tokio::fs::write(&temp_path, contents).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                temp_path.display(),
                e
            )))
        })?;

        tokio::fs::rename(&temp_path, &path).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "rename {} to {}: {}",
                temp_path.display(),
                path.display(),
                e
            )))
        })?;

        Ok(())
    }

    async fn remove_entry(&self, key: &str) -> FabulaResult<()> {
        let path = self.entry_path(key);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::new(StorageErrorKind::FileRemove(format!(
                "{}: {}",
                path.display(),
                e
            )))
            .into()),
        }
    }
}

#[async_trait]
impl SnapshotStore for FileSystemSnapshotStore {
    #[tracing::instrument(skip(self), fields(path = %self.base_path.display()))]
    async fn load(&self) -> FabulaResult<Snapshot> {
        let story_id = self.read_entry(STORY_ID_KEY).await?;
        let turns = self.read_entry(TURNS_KEY).await?;
        let snapshot = Snapshot::from_entries(story_id, turns);

        tracing::debug!(
            story_id = ?snapshot.story_id,
            turns = snapshot.turns.len(),
            "Loaded snapshot"
        );
        Ok(snapshot)
    }

    #[tracing::instrument(skip(self, snapshot), fields(turns = snapshot.turns.len()))]
    async fn save(&self, snapshot: &Snapshot) -> FabulaResult<()> {
        let turns = snapshot
            .turns_entry()
            .map_err(|e| JsonError::new(format!("Failed to encode turns: {}", e)))?;

        match &snapshot.story_id {
            Some(story_id) => self.write_entry(STORY_ID_KEY, story_id.as_str()).await?,
            None => self.remove_entry(STORY_ID_KEY).await?,
        }
        self.write_entry(TURNS_KEY, &turns).await?;

        tracing::trace!("Saved snapshot");
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(path = %self.base_path.display()))]
    async fn clear(&self) -> FabulaResult<()> {
        self.remove_entry(STORY_ID_KEY).await?;
        self.remove_entry(TURNS_KEY).await?;
        tracing::info!("Cleared snapshot");
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "filesystem"
    }
}
