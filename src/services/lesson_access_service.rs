use std::sync::Arc;

use crate::{
    errors::{AppError, AppResult},
    models::dto::response::LessonAccessDto,
    repositories::{LessonAccessRepository, LessonRepository},
};

pub struct LessonAccessService {
    lessons: Arc<dyn LessonRepository>,
    lesson_access: Arc<dyn LessonAccessRepository>,
}

impl LessonAccessService {
    pub fn new(
        lessons: Arc<dyn LessonRepository>,
        lesson_access: Arc<dyn LessonAccessRepository>,
    ) -> Self {
        Self {
            lessons,
            lesson_access,
        }
    }

    /// Grants `user_id` access to the lesson's attachments. Returns `true`
    /// when the grant is new; granting twice is a no-op.
    pub async fn grant_access(&self, user_id: &str, lesson_id: &str) -> AppResult<bool> {
        let user_id = user_id.trim();
        if user_id.is_empty() {
            return Err(AppError::InvalidInput("user_id must not be empty".to_string()));
        }

        self.lessons.find_by_id(lesson_id).await?;

        let created = self.lesson_access.grant(user_id, lesson_id).await?;
        if created {
            log::info!("Granted '{}' access to lesson {}", user_id, lesson_id);
        } else {
            log::debug!("'{}' already had access to lesson {}", user_id, lesson_id);
        }
        Ok(created)
    }

    pub async fn list_access(&self, lesson_id: &str) -> AppResult<Vec<LessonAccessDto>> {
        if !self.lessons.exists(lesson_id).await? {
            return Err(AppError::NotFound(format!(
                "Lesson with id '{}' not found",
                lesson_id
            )));
        }

        let grants = self.lesson_access.find_by_lesson_id(lesson_id).await?;
        Ok(grants.into_iter().map(LessonAccessDto::from).collect())
    }
}
