//! Local-filesystem storage medium: one JSON file per artifact.
//!
//! Writes are serialized through an async mutex. The payload is written and
//! fsynced under a hidden partial name, then hard-linked to its final name,
//! so a failed write never leaves a readable artifact behind and an existing
//! artifact is never replaced.

use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::medium::{validate_name, StorageMedium, StoreError};

/// Stores artifacts as files inside a single directory.
pub struct LocalMedium {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl LocalMedium {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, StoreError> {
        validate_name(name)?;
        Ok(self.dir.join(name))
    }

    /// Hidden sibling used while a write is in progress. Leading dots are
    /// rejected by [`validate_name`], so readers can never reach it.
    fn partial_path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!(".{name}.partial"))
    }

    async fn write_partial(partial: &Path, bytes: &[u8]) -> Result<(), StoreError> {
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(partial)
            .await?;
        file.write_all(bytes).await?;
        file.sync_all().await?;
        Ok(())
    }
}

async fn discard_partial(partial: &Path) {
    if let Err(e) = tokio::fs::remove_file(partial).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!(path = %partial.display(), error = %e, "Failed to remove partial artifact");
        }
    }
}

#[async_trait::async_trait]
impl StorageMedium for LocalMedium {
    fn kind(&self) -> &'static str {
        "local"
    }

    async fn write(&self, name: &str, payload: &serde_json::Value) -> Result<(), StoreError> {
        let path = self.path_for(name)?;
        let bytes = serde_json::to_vec_pretty(payload)?;

        let _guard = self.write_lock.lock().await;
        tokio::fs::create_dir_all(&self.dir).await?;

        let partial = self.partial_path_for(name);
        if let Err(e) = Self::write_partial(&partial, &bytes).await {
            discard_partial(&partial).await;
            return Err(e);
        }

        let linked = tokio::fs::hard_link(&partial, &path).await;
        discard_partial(&partial).await;
        match linked {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                return Err(StoreError::AlreadyExists(name.to_string()));
            }
            Err(e) => return Err(e.into()),
        }

        tracing::debug!(path = %path.display(), bytes = bytes.len(), "Artifact written");
        Ok(())
    }

    async fn read(&self, name: &str) -> Result<Option<serde_json::Value>, StoreError> {
        let path = self.path_for(name)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
