use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, to_bson},
    options::IndexOptions,
    Collection, IndexModel,
};

use crate::{
    db::Database,
    errors::AppResult,
    models::domain::LessonAccess,
    repositories::is_duplicate_key,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LessonAccessRepository: Send + Sync {
    /// Records a grant. Returns `true` when a new row was written and
    /// `false` when the pair was already granted.
    async fn grant(&self, user_id: &str, lesson_id: &str) -> AppResult<bool>;
    async fn has_access(&self, user_id: &str, lesson_id: &str) -> AppResult<bool>;
    async fn find_by_lesson_id(&self, lesson_id: &str) -> AppResult<Vec<LessonAccess>>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoLessonAccessRepository {
    collection: Collection<LessonAccess>,
}

impl MongoLessonAccessRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("lesson_access");
        Self { collection }
    }
}

#[async_trait]
impl LessonAccessRepository for MongoLessonAccessRepository {
    async fn grant(&self, user_id: &str, lesson_id: &str) -> AppResult<bool> {
        let access = LessonAccess::new(user_id, lesson_id);
        let granted_at = to_bson(&access.granted_at)?;

        let result = self
            .collection
            .update_one(
                doc! { "user_id": user_id, "lesson_id": lesson_id },
                doc! { "$setOnInsert": { "granted_at": granted_at } },
            )
            .upsert(true)
            .await;

        match result {
            Ok(update) => Ok(update.upserted_id.is_some()),
            // A concurrent grant for the same pair won the insert.
            Err(err) if is_duplicate_key(&err) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    async fn has_access(&self, user_id: &str, lesson_id: &str) -> AppResult<bool> {
        let count = self
            .collection
            .count_documents(doc! { "user_id": user_id, "lesson_id": lesson_id })
            .await?;
        Ok(count > 0)
    }

    async fn find_by_lesson_id(&self, lesson_id: &str) -> AppResult<Vec<LessonAccess>> {
        let grants = self
            .collection
            .find(doc! { "lesson_id": lesson_id })
            .sort(doc! { "granted_at": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(grants)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        let pair_index = IndexModel::builder()
            .keys(doc! { "user_id": 1, "lesson_id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("user_lesson_unique".to_string())
                    .build(),
            )
            .build();

        let lesson_index = IndexModel::builder()
            .keys(doc! { "lesson_id": 1 })
            .options(IndexOptions::builder().name("lesson_id".to_string()).build())
            .build();

        self.collection.create_index(pair_index).await?;
        self.collection.create_index(lesson_index).await?;

        log::info!("Created indexes for lesson_access collection");
        Ok(())
    }
}
