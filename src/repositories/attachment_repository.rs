use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::Attachment,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttachmentRepository: Send + Sync {
    async fn create(&self, attachment: Attachment) -> AppResult<Attachment>;
    async fn find_by_id(&self, id: &str) -> AppResult<Attachment>;
    async fn find_by_lesson_id(&self, lesson_id: &str) -> AppResult<Vec<Attachment>>;
    async fn count_by_lesson_id(&self, lesson_id: &str) -> AppResult<u64>;
    async fn delete(&self, id: &str) -> AppResult<()>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoAttachmentRepository {
    collection: Collection<Attachment>,
}

impl MongoAttachmentRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("attachments");
        Self { collection }
    }
}

#[async_trait]
impl AttachmentRepository for MongoAttachmentRepository {
    async fn create(&self, attachment: Attachment) -> AppResult<Attachment> {
        self.collection.insert_one(&attachment).await?;
        Ok(attachment)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Attachment> {
        self.collection
            .find_one(doc! { "id": id })
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Attachment with id '{}' not found", id)))
    }

    async fn find_by_lesson_id(&self, lesson_id: &str) -> AppResult<Vec<Attachment>> {
        let attachments = self
            .collection
            .find(doc! { "lesson_id": lesson_id })
            .sort(doc! { "created_at": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(attachments)
    }

    async fn count_by_lesson_id(&self, lesson_id: &str) -> AppResult<u64> {
        let count = self
            .collection
            .count_documents(doc! { "lesson_id": lesson_id })
            .await?;
        Ok(count)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let result = self.collection.delete_one(doc! { "id": id }).await?;

        if result.deleted_count == 0 {
            return Err(AppError::NotFound(format!(
                "Attachment with id '{}' not found",
                id
            )));
        }

        Ok(())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let storage_key_index = IndexModel::builder()
            .keys(doc! { "storage_key": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("storage_key_unique".to_string())
                    .build(),
            )
            .build();

        let lesson_index = IndexModel::builder()
            .keys(doc! { "lesson_id": 1 })
            .options(IndexOptions::builder().name("lesson_id".to_string()).build())
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(storage_key_index).await?;
        self.collection.create_index(lesson_index).await?;

        log::info!("Created indexes for attachments collection");
        Ok(())
    }
}
