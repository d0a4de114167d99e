use std::io::{Error as IoError, ErrorKind};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::info;

use initium_core::error::StoreError;
use initium_metadata::{Website, WebsiteRegistry};

use crate::document::{read_document, seed_document};

/// Website registry backed by a JSON array of `{id, domain, name}` objects.
///
/// The file is re-read on every lookup; it is edited by hand, never by the
/// server.
pub struct JsonFileRegistry {
    path: PathBuf,
}

impl JsonFileRegistry {
    /// Open the registry at `path`, seeding it with [`default_websites`] if
    /// the file does not exist yet.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if seed_document(&path, &default_websites()).await? {
            info!(path = %path.display(), "Created website registry with default website");
        }
        Ok(Self::new(path))
    }

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Registry contents written on first start.
pub fn default_websites() -> Vec<Website> {
    vec![Website::new("my-website", "localhost", "My Website")]
}

#[async_trait]
impl WebsiteRegistry for JsonFileRegistry {
    async fn list_websites(&self) -> Result<Vec<Website>, StoreError> {
        read_document(&self.path).await?.ok_or_else(|| {
            StoreError::io(
                &self.path,
                IoError::new(ErrorKind::NotFound, "website registry missing"),
            )
        })
    }
}
