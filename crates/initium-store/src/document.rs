//! Whole-document JSON file helpers shared by the page view store and the
//! website registry.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tokio::io::AsyncWriteExt;

use initium_core::error::StoreError;

/// Read and parse the JSON document at `path`.
///
/// Returns `Ok(None)` when the file does not exist. A file holding only
/// whitespace parses as `T::default()`.
pub async fn read_document<T>(path: &Path) -> Result<Option<T>, StoreError>
where
    T: DeserializeOwned + Default,
{
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(StoreError::io(path, e)),
    };

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Some(T::default()));
    }

    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|e| StoreError::serialization(path, e))
}

/// Replace the document at `path` with `value`, pretty-printed.
///
/// The bytes go to a sibling `*.tmp` file which is then renamed over `path`,
/// so a concurrent reader sees either the old or the new document. The temp
/// file is removed again if any step fails.
pub async fn write_document<T>(path: &Path, value: &T) -> Result<(), StoreError>
where
    T: Serialize + ?Sized,
{
    let bytes = serde_json::to_vec_pretty(value).map_err(|e| StoreError::serialization(path, e))?;
    let tmp = tmp_path(path);

    let result = write_and_rename(&tmp, path, &bytes).await;
    if result.is_err() {
        let _ = tokio::fs::remove_file(&tmp).await;
    }
    result
}

async fn write_and_rename(tmp: &Path, path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let mut file = tokio::fs::File::create(tmp)
        .await
        .map_err(|e| StoreError::io(tmp, e))?;
    file.write_all(bytes)
        .await
        .map_err(|e| StoreError::io(tmp, e))?;
    file.sync_all().await.map_err(|e| StoreError::io(tmp, e))?;
    drop(file);

    tokio::fs::rename(tmp, path)
        .await
        .map_err(|e| StoreError::io(path, e))
}

/// Write `value` to `path` only if nothing exists there yet.
///
/// Returns `true` when the file was created.
pub async fn seed_document<T>(path: &Path, value: &T) -> Result<bool, StoreError>
where
    T: Serialize + ?Sized,
{
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| StoreError::io(parent, e))?;
    }

    match tokio::fs::try_exists(path).await {
        Ok(true) => Ok(false),
        Ok(false) => write_document(path, value).await.map(|()| true),
        Err(e) => Err(StoreError::io(path, e)),
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
