pub mod gridfs;

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

pub use gridfs::GridFsBlobStore;

/// Durable byte storage addressed by an opaque key.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn put(&self, key: &str, bytes: Vec<u8>) -> AppResult<()>;
    async fn get(&self, key: &str) -> AppResult<Vec<u8>>;
    /// Returns `Ok(false)` when no blob is stored under `key`.
    async fn delete(&self, key: &str) -> AppResult<bool>;
}

/// Reduces a client-supplied filename to its last path component.
pub fn sanitize_display_name(raw: &str) -> AppResult<String> {
    let name = raw
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or_default()
        .trim();

    if name.is_empty() || name == "." || name == ".." {
        return Err(AppError::InvalidInput(
            "Attachment file name must not be empty".to_string(),
        ));
    }

    Ok(name.to_string())
}

/// Fresh storage key for an upload: a UUID plus the display name's extension
/// when that extension is plain ASCII alphanumerics.
pub fn storage_key_for(display_name: &str) -> String {
    let key = Uuid::new_v4().to_string();

    match display_name.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty()
                && !ext.is_empty()
                && ext.chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            format!("{}.{}", key, ext)
        }
        _ => key,
    }
}
