use std::{
    fmt,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::{CoreError, Result};

/// Blob storage for cache snapshots.
///
/// `load` returns `Ok(None)` when nothing has been written yet.
#[async_trait]
pub trait SnapshotStore: Send + Sync + fmt::Debug {
    async fn load(&self) -> Result<Option<Vec<u8>>>;
    async fn save(&self, bytes: &[u8]) -> Result<()>;
}

/// Snapshot blob kept in a `cacache` directory.
#[derive(Clone)]
pub struct CacacheSnapshotStore {
    root: PathBuf,
    key: String,
}

impl CacacheSnapshotStore {
    pub fn new(root: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            key: key.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl fmt::Debug for CacacheSnapshotStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacacheSnapshotStore")
            .field("root", &self.root)
            .field("key", &self.key)
            .finish()
    }
}

#[async_trait]
impl SnapshotStore for CacacheSnapshotStore {
    async fn load(&self) -> Result<Option<Vec<u8>>> {
        match cacache::read(&self.root, &self.key).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(cacache::Error::EntryNotFound(_, _)) => Ok(None),
            Err(cacache::Error::IntegrityError(err)) => {
                Err(CoreError::Corrupt(format!("{} ({err})", self.key)))
            }
            Err(cacache::Error::SizeMismatch(wanted, actual)) => {
                Err(CoreError::Corrupt(format!(
                    "size mismatch: key={}, wanted={wanted}, actual={actual}",
                    self.key
                )))
            }
            Err(cacache::Error::IoError(_, msg)) => Err(CoreError::Internal(
                format!("cacache read I/O error: {msg}"),
            )),
            Err(cacache::Error::SerdeError(_, msg)) => Err(
                CoreError::Internal(format!("cacache read serde error: {msg}")),
            ),
        }
    }

    async fn save(&self, bytes: &[u8]) -> Result<()> {
        cacache::write(&self.root, &self.key, bytes)
            .await
            .map(|_| ())
            .map_err(|e| {
                CoreError::Internal(format!("cacache write failed: {e}"))
            })
    }
}

/// In-process snapshot store, mostly for tests.
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    blob: Mutex<Option<Vec<u8>>>,
    fail_writes: bool,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blob(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            blob: Mutex::new(Some(bytes.into())),
            fail_writes: false,
        }
    }

    /// A store whose writes always fail.
    pub fn read_only() -> Self {
        Self {
            blob: Mutex::new(None),
            fail_writes: true,
        }
    }

    pub fn contents(&self) -> Option<Vec<u8>> {
        self.blob.lock().clone()
    }
}

#[async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn load(&self) -> Result<Option<Vec<u8>>> {
        Ok(self.blob.lock().clone())
    }

    async fn save(&self, bytes: &[u8]) -> Result<()> {
        if self.fail_writes {
            return Err(CoreError::Internal("snapshot store is read-only".into()));
        }
        *self.blob.lock() = Some(bytes.to_vec());
        Ok(())
    }
}
