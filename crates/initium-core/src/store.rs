//! Page view storage abstraction.

use async_trait::async_trait;

use crate::{error::StoreError, event::PageView};

/// Number of page views kept when no explicit limit is configured.
pub const DEFAULT_RETENTION_LIMIT: usize = 10_000;

/// Append-ordered page view storage.
///
/// Implementations serialise writers against each other and against readers:
/// an `append` is one exclusive read-modify-write cycle and no `read_all` may
/// observe it half done. Readers may run concurrently.
#[async_trait]
pub trait PageViewStore: Send + Sync + 'static {
    /// Append `view`, then evict from the front until at most the retention
    /// limit remains.
    async fn append(&self, view: PageView) -> Result<(), StoreError>;

    /// Every stored page view, oldest first.
    async fn read_all(&self) -> Result<Vec<PageView>, StoreError>;

    /// Liveness probe. The default does a full read.
    async fn ping(&self) -> Result<(), StoreError> {
        self.read_all().await.map(|_| ())
    }
}

/// Drop the oldest entries so that at most `limit` remain.
pub fn apply_retention(views: &mut Vec<PageView>, limit: usize) {
    if views.len() > limit {
        let excess = views.len() - limit;
        views.drain(..excess);
    }
}
