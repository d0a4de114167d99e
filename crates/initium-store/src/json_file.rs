use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use initium_core::{
    error::StoreError,
    event::PageView,
    store::{apply_retention, PageViewStore},
};

use crate::document::{read_document, seed_document, write_document};

/// Page views persisted as a single JSON array on disk.
///
/// Every `append` rewrites the whole file, which is what bounds the store to
/// a retention limit. One `RwLock` per store instance guards the file: reads
/// share it, the read-modify-write of `append` holds it exclusively.
///
/// Failure policy differs by operation. `read_all` reports a missing file as
/// empty but an unreadable or corrupt one as an error. `append` keeps ingest
/// alive instead: such a file is renamed to `<name>.corrupt-<unix_secs>` and
/// the store restarts from an empty array.
pub struct JsonFileStore {
    path: PathBuf,
    retention_limit: usize,
    lock: RwLock<()>,
}

impl JsonFileStore {
    /// Open the store at `path`, creating the parent directory and an empty
    /// array if the file does not exist yet.
    pub async fn open(path: impl Into<PathBuf>, retention_limit: usize) -> Result<Self, StoreError> {
        let path = path.into();
        if seed_document(&path, &Vec::<PageView>::new()).await? {
            info!(path = %path.display(), "Created empty page view store");
        }
        Ok(Self::new(path, retention_limit))
    }

    /// Wrap `path` without touching the filesystem.
    pub fn new(path: impl Into<PathBuf>, retention_limit: usize) -> Self {
        Self {
            path: path.into(),
            retention_limit,
            lock: RwLock::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn retention_limit(&self) -> usize {
        self.retention_limit
    }

    /// Prior state for an append. Caller holds the write lock.
    ///
    /// A file that cannot be read or parsed is moved aside before the store
    /// restarts empty. If it cannot be moved the append fails, leaving the
    /// file untouched.
    async fn load_for_append(&self) -> Result<Vec<PageView>, StoreError> {
        let err = match read_document::<Vec<PageView>>(&self.path).await {
            Ok(views) => return Ok(views.unwrap_or_default()),
            Err(e) => e,
        };

        let aside = self.quarantine().await.map_err(|e| {
            warn!(error = %err, "Page view store unreadable and could not be moved aside");
            e
        })?;
        warn!(
            path = %self.path.display(),
            moved_to = %aside.display(),
            error = %err,
            "Page view store unreadable; starting from an empty store"
        );
        Ok(Vec::new())
    }

    async fn quarantine(&self) -> Result<PathBuf, StoreError> {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(format!(".corrupt-{}", Utc::now().timestamp()));
        let aside = self.path.with_file_name(name);
        tokio::fs::rename(&self.path, &aside)
            .await
            .map_err(|e| StoreError::io(&self.path, e))?;
        Ok(aside)
    }
}

#[async_trait]
impl PageViewStore for JsonFileStore {
    async fn append(&self, view: PageView) -> Result<(), StoreError> {
        let _guard = self.lock.write().await;

        let mut views = self.load_for_append().await?;
        views.push(view);
        apply_retention(&mut views, self.retention_limit);

        write_document(&self.path, &views).await
    }

    async fn read_all(&self) -> Result<Vec<PageView>, StoreError> {
        let _guard = self.lock.read().await;
        Ok(read_document(&self.path).await?.unwrap_or_default())
    }
}
