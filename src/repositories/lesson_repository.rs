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
    models::domain::Lesson,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LessonRepository: Send + Sync {
    async fn find_all(&self) -> AppResult<Vec<Lesson>>;
    async fn find_by_id(&self, id: &str) -> AppResult<Lesson>;
    /// Lessons of a chapter, ascending by `order`.
    async fn find_by_chapter_id(&self, chapter_id: &str) -> AppResult<Vec<Lesson>>;
    async fn count_by_chapter_id(&self, chapter_id: &str) -> AppResult<u64>;
    async fn exists(&self, id: &str) -> AppResult<bool>;
    async fn create(&self, lesson: Lesson) -> AppResult<Lesson>;
    /// Writes only `content` and `updated_at`, returning the stored lesson.
    async fn update_content(&self, id: &str, content: &str) -> AppResult<Lesson>;
    /// Writes only `order` and `updated_at`.
    async fn update_order(&self, id: &str, order: i32) -> AppResult<()>;
    async fn delete(&self, id: &str) -> AppResult<()>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoLessonRepository {
    collection: Collection<Lesson>,
}

impl MongoLessonRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("lessons");
        Self { collection }
    }

    fn not_found(id: &str) -> AppError {
        AppError::NotFound(format!("Lesson with id '{}' not found", id))
    }
}

#[async_trait]
impl LessonRepository for MongoLessonRepository {
    async fn find_all(&self) -> AppResult<Vec<Lesson>> {
        let cursor = self
            .collection
            .find(doc! {})
            .sort(doc! { "chapter_id": 1, "order": 1 })
            .await?;
        let lessons: Vec<Lesson> = cursor.try_collect().await?;
        Ok(lessons)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Lesson> {
        self.collection
            .find_one(doc! { "id": id })
            .await?
            .ok_or_else(|| Self::not_found(id))
    }

    async fn find_by_chapter_id(&self, chapter_id: &str) -> AppResult<Vec<Lesson>> {
        let cursor = self
            .collection
            .find(doc! { "chapter_id": chapter_id })
            .sort(doc! { "order": 1, "created_at": 1 })
            .await?;
        let lessons: Vec<Lesson> = cursor.try_collect().await?;
        Ok(lessons)
    }

    async fn count_by_chapter_id(&self, chapter_id: &str) -> AppResult<u64> {
        let count = self
            .collection
            .count_documents(doc! { "chapter_id": chapter_id })
            .await?;
        Ok(count)
    }

    async fn exists(&self, id: &str) -> AppResult<bool> {
        let count = self.collection.count_documents(doc! { "id": id }).await?;
        Ok(count > 0)
    }

    async fn create(&self, lesson: Lesson) -> AppResult<Lesson> {
        self.collection.insert_one(&lesson).await?;
        Ok(lesson)
    }

    async fn update_content(&self, id: &str, content: &str) -> AppResult<Lesson> {
        let updated_at = to_bson(&Utc::now())?;
        self.collection
            .find_one_and_update(
                doc! { "id": id },
                doc! { "$set": { "content": content, "updated_at": updated_at } },
            )
            .return_document(ReturnDocument::After)
            .await?
            .ok_or_else(|| Self::not_found(id))
    }

    async fn update_order(&self, id: &str, order: i32) -> AppResult<()> {
        let updated_at = to_bson(&Utc::now())?;
        let result = self
            .collection
            .update_one(
                doc! { "id": id },
                doc! { "$set": { "order": order, "updated_at": updated_at } },
            )
            .await?;

        if result.matched_count == 0 {
            return Err(Self::not_found(id));
        }

        Ok(())
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let result = self.collection.delete_one(doc! { "id": id }).await?;

        if result.deleted_count == 0 {
            return Err(Self::not_found(id));
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

        let chapter_order_index = IndexModel::builder()
            .keys(doc! { "chapter_id": 1, "order": 1 })
            .options(
                IndexOptions::builder()
                    .name("chapter_order".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(chapter_order_index).await?;

        log::info!("Created indexes for lessons collection");
        Ok(())
    }
}
