use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use initium_core::error::StoreError;

/// A registered website. Its `id` is the public tracking id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Website {
    pub id: String,
    pub domain: String,
    pub name: String,
}

impl Website {
    pub fn new(id: &str, domain: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            domain: domain.to_string(),
            name: name.to_string(),
        }
    }
}

/// Read-only view of the website registry.
///
/// Websites are added by editing the registry out of band; the running server
/// never writes it. Implementations should re-read their source on every call
/// so such edits are visible without a restart.
#[async_trait]
pub trait WebsiteRegistry: Send + Sync + 'static {
    async fn list_websites(&self) -> Result<Vec<Website>, StoreError>;

    /// Exact, case-sensitive match on the website id.
    async fn is_known(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.list_websites().await?.iter().any(|w| w.id == id))
    }

    /// The first registered website, which the dashboard and the tracking
    /// script are bound to. `Ok(None)` when the registry is empty.
    async fn first_website(&self) -> Result<Option<Website>, StoreError> {
        Ok(self.list_websites().await?.into_iter().next())
    }
}

/// Fixed in-memory registry.
#[derive(Debug, Clone, Default)]
pub struct StaticRegistry {
    websites: Vec<Website>,
}

impl StaticRegistry {
    pub fn new(websites: Vec<Website>) -> Self {
        Self { websites }
    }
}

#[async_trait]
impl WebsiteRegistry for StaticRegistry {
    async fn list_websites(&self) -> Result<Vec<Website>, StoreError> {
        Ok(self.websites.clone())
    }
}
