use async_trait::async_trait;
use tokio::sync::RwLock;

use initium_core::{
    error::StoreError,
    event::PageView,
    store::{apply_retention, PageViewStore, DEFAULT_RETENTION_LIMIT},
};

/// Volatile page view store. Same locking and retention semantics as
/// [`crate::JsonFileStore`], without the file.
pub struct MemoryStore {
    views: RwLock<Vec<PageView>>,
    retention_limit: usize,
}

impl MemoryStore {
    pub fn new(retention_limit: usize) -> Self {
        Self::with_views(Vec::new(), retention_limit)
    }

    pub fn with_views(mut views: Vec<PageView>, retention_limit: usize) -> Self {
        apply_retention(&mut views, retention_limit);
        Self {
            views: RwLock::new(views),
            retention_limit,
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_RETENTION_LIMIT)
    }
}

#[async_trait]
impl PageViewStore for MemoryStore {
    async fn append(&self, view: PageView) -> Result<(), StoreError> {
        let mut views = self.views.write().await;
        views.push(view);
        apply_retention(&mut views, self.retention_limit);
        Ok(())
    }

    async fn read_all(&self) -> Result<Vec<PageView>, StoreError> {
        Ok(self.views.read().await.clone())
    }
}
