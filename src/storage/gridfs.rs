use async_trait::async_trait;
use futures::{AsyncReadExt, AsyncWriteExt};
use mongodb::{bson::doc, gridfs::GridFsBucket};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    storage::BlobStore,
};

/// Blob store backed by a GridFS bucket. The storage key is used as the
/// GridFS filename.
pub struct GridFsBlobStore {
    bucket: GridFsBucket,
}

impl GridFsBlobStore {
    pub fn new(db: &Database, bucket_name: &str) -> Self {
        Self {
            bucket: db.gridfs_bucket(bucket_name),
        }
    }
}

fn storage_error(action: &str, key: &str, err: impl std::fmt::Display) -> AppError {
    AppError::StorageError(format!("Failed to {} blob '{}': {}", action, key, err))
}

#[async_trait]
impl BlobStore for GridFsBlobStore {
    async fn put(&self, key: &str, bytes: Vec<u8>) -> AppResult<()> {
        let mut stream = self
            .bucket
            .open_upload_stream(key)
            .await
            .map_err(|e| storage_error("open", key, e))?;

        stream
            .write_all(&bytes)
            .await
            .map_err(|e| storage_error("write", key, e))?;
        stream
            .close()
            .await
            .map_err(|e| storage_error("finish", key, e))?;

        log::debug!("Stored blob '{}' ({} bytes)", key, bytes.len());
        Ok(())
    }

    async fn get(&self, key: &str) -> AppResult<Vec<u8>> {
        let mut stream = self
            .bucket
            .open_download_stream_by_name(key)
            .await
            .map_err(|e| storage_error("open", key, e))?;

        let mut bytes = Vec::new();
        stream
            .read_to_end(&mut bytes)
            .await
            .map_err(|e| storage_error("read", key, e))?;

        Ok(bytes)
    }

    async fn delete(&self, key: &str) -> AppResult<bool> {
        let file = self
            .bucket
            .find_one(doc! { "filename": key })
            .await
            .map_err(|e| storage_error("look up", key, e))?;

        let Some(file) = file else {
            return Ok(false);
        };

        self.bucket
            .delete(file.id)
            .await
            .map_err(|e| storage_error("delete", key, e))?;

        Ok(true)
    }
}
