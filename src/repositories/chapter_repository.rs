use async_trait::async_trait;
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, to_bson},
    options::{IndexOptions, ReturnDocument},
    Collection, IndexModel,
};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::Chapter,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChapterRepository: Send + Sync {
    async fn find_all(&self) -> AppResult<Vec<Chapter>>;
    async fn find_by_id(&self, id: &str) -> AppResult<Chapter>;
    /// Chapters of a course, ascending by `order`.
    async fn find_by_course_id(&self, course_id: &str) -> AppResult<Vec<Chapter>>;
    async fn count_by_course_id(&self, course_id: &str) -> AppResult<u64>;
    async fn exists(&self, id: &str) -> AppResult<bool>;
    async fn create(&self, chapter: Chapter) -> AppResult<Chapter>;
    /// Writes only `order` and `updated_at`, returning the stored chapter.
    async fn update_order(&self, id: &str, order: i32) -> AppResult<Chapter>;
    async fn delete(&self, id: &str) -> AppResult<()>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoChapterRepository {
    collection: Collection<Chapter>,
}

impl MongoChapterRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("chapters");
        Self { collection }
    }
}

#[async_trait]
impl ChapterRepository for MongoChapterRepository {
    async fn find_all(&self) -> AppResult<Vec<Chapter>> {
        let cursor = self
            .collection
            .find(doc! {})
            .sort(doc! { "course_id": 1, "order": 1 })
            .await?;
        let chapters: Vec<Chapter> = cursor.try_collect().await?;
        Ok(chapters)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Chapter> {
        self.collection
            .find_one(doc! { "id": id })
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Chapter with id '{}' not found", id)))
    }

    async fn find_by_course_id(&self, course_id: &str) -> AppResult<Vec<Chapter>> {
        let cursor = self
            .collection
            .find(doc! { "course_id": course_id })
            .sort(doc! { "order": 1, "created_at": 1 })
            .await?;
        let chapters: Vec<Chapter> = cursor.try_collect().await?;
        Ok(chapters)
    }

    async fn count_by_course_id(&self, course_id: &str) -> AppResult<u64> {
        let count = self
            .collection
            .count_documents(doc! { "course_id": course_id })
            .await?;
        Ok(count)
    }

    async fn exists(&self, id: &str) -> AppResult<bool> {
        let count = self.collection.count_documents(doc! { "id": id }).await?;
        Ok(count > 0)
    }

    async fn create(&self, chapter: Chapter) -> AppResult<Chapter> {
        self.collection.insert_one(&chapter).await?;
        Ok(chapter)
    }

    async fn update_order(&self, id: &str, order: i32) -> AppResult<Chapter> {
        let updated_at = to_bson(&Utc::now())?;
        self.collection
            .find_one_and_update(
                doc! { "id": id },
                doc! { "$set": { "order": order, "updated_at": updated_at } },
            )
            .return_document(ReturnDocument::After)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Chapter with id '{}' not found", id)))
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let result = self.collection.delete_one(doc! { "id": id }).await?;

        if result.deleted_count == 0 {
            return Err(AppError::NotFound(format!(
                "Chapter with id '{}' not found",
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

        let course_order_index = IndexModel::builder()
            .keys(doc! { "course_id": 1, "order": 1 })
            .options(
                IndexOptions::builder()
                    .name("course_order".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(course_order_index).await?;

        log::info!("Created indexes for chapters collection");
        Ok(())
    }
}
