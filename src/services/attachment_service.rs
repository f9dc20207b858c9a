use std::sync::Arc;

use crate::{
    errors::{AppError, AppResult},
    models::{domain::Attachment, dto::response::AttachmentDto},
    repositories::{AttachmentRepository, LessonAccessRepository, LessonRepository},
    storage::{sanitize_display_name, storage_key_for, BlobStore},
};

/// Bytes of an attachment together with the name the uploader gave it.
#[derive(Debug)]
pub struct DownloadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

pub struct AttachmentService {
    lessons: Arc<dyn LessonRepository>,
    attachments: Arc<dyn AttachmentRepository>,
    lesson_access: Arc<dyn LessonAccessRepository>,
    blob_store: Arc<dyn BlobStore>,
}

impl AttachmentService {
    pub fn new(
        lessons: Arc<dyn LessonRepository>,
        attachments: Arc<dyn AttachmentRepository>,
        lesson_access: Arc<dyn LessonAccessRepository>,
        blob_store: Arc<dyn BlobStore>,
    ) -> Self {
        Self {
            lessons,
            attachments,
            lesson_access,
            blob_store,
        }
    }

    pub async fn upload_file(
        &self,
        lesson_id: &str,
        display_name: &str,
        bytes: Vec<u8>,
    ) -> AppResult<Attachment> {
        self.lessons.find_by_id(lesson_id).await?;

        let name = sanitize_display_name(display_name)?;
        let storage_key = storage_key_for(&name);
        let size = bytes.len();

        self.blob_store.put(&storage_key, bytes).await?;

        let attachment = Attachment::new(lesson_id, &name, &storage_key);
        match self.attachments.create(attachment).await {
            Ok(attachment) => {
                log::info!(
                    "Uploaded '{}' ({} bytes) to lesson {} as {}",
                    attachment.name,
                    size,
                    lesson_id,
                    attachment.id
                );
                Ok(attachment)
            }
            Err(err) => {
                if let Err(cleanup) = self.blob_store.delete(&storage_key).await {
                    log::warn!("Failed to remove orphaned blob '{}': {}", storage_key, cleanup);
                }
                Err(err)
            }
        }
    }

    /// Returns the attachment's bytes when `user_id` holds a grant for its
    /// lesson. Roles are not consulted.
    pub async fn download_file(&self, user_id: &str, attachment_id: &str) -> AppResult<DownloadedFile> {
        let attachment = self.attachments.find_by_id(attachment_id).await?;

        if !self
            .lesson_access
            .has_access(user_id, &attachment.lesson_id)
            .await?
        {
            log::warn!(
                "User '{}' has no access to lesson {}",
                user_id,
                attachment.lesson_id
            );
            return Err(AppError::AccessDenied(format!(
                "No access to attachment '{}'",
                attachment_id
            )));
        }

        let bytes = self.blob_store.get(&attachment.storage_key).await?;

        Ok(DownloadedFile {
            name: attachment.name,
            bytes,
        })
    }

    pub async fn list_attachments(&self, lesson_id: &str) -> AppResult<Vec<AttachmentDto>> {
        if !self.lessons.exists(lesson_id).await? {
            return Err(AppError::NotFound(format!(
                "Lesson with id '{}' not found",
                lesson_id
            )));
        }

        let attachments = self.attachments.find_by_lesson_id(lesson_id).await?;
        Ok(attachments.into_iter().map(AttachmentDto::from).collect())
    }

    /// Removes the row first; a blob left behind by a failed removal is
    /// unreachable and only logged.
    pub async fn delete_attachment(&self, id: &str) -> AppResult<()> {
        let attachment = self.attachments.find_by_id(id).await?;

        self.attachments.delete(id).await?;

        match self.blob_store.delete(&attachment.storage_key).await {
            Ok(true) => {}
            Ok(false) => log::warn!(
                "Blob '{}' of attachment {} was already gone",
                attachment.storage_key,
                id
            ),
            Err(err) => log::warn!(
                "Failed to remove blob '{}' of attachment {}: {}",
                attachment.storage_key,
                id,
                err
            ),
        }

        log::info!("Deleted attachment {}", id);
        Ok(())
    }
}
