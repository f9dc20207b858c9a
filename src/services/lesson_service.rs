use std::{collections::HashSet, sync::Arc};

use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{domain::Lesson, dto::request::CreateLessonRequest},
    repositories::{AttachmentRepository, ChapterRepository, LessonRepository},
};

pub struct LessonService {
    chapters: Arc<dyn ChapterRepository>,
    lessons: Arc<dyn LessonRepository>,
    attachments: Arc<dyn AttachmentRepository>,
}

impl LessonService {
    pub fn new(
        chapters: Arc<dyn ChapterRepository>,
        lessons: Arc<dyn LessonRepository>,
        attachments: Arc<dyn AttachmentRepository>,
    ) -> Self {
        Self {
            chapters,
            lessons,
            attachments,
        }
    }

    pub async fn list_lessons(&self) -> AppResult<Vec<Lesson>> {
        self.lessons.find_all().await
    }

    pub async fn get_lesson(&self, id: &str) -> AppResult<Lesson> {
        self.lessons.find_by_id(id).await
    }

    pub async fn add_lesson_to_chapter(
        &self,
        chapter_id: &str,
        request: CreateLessonRequest,
    ) -> AppResult<Lesson> {
        request.validate()?;

        if !self.chapters.exists(chapter_id).await? {
            return Err(AppError::ParentNotFound(format!(
                "Chapter with id '{}' not found",
                chapter_id
            )));
        }

        let lesson = Lesson::new(
            chapter_id,
            &request.name,
            &request.description,
            &request.content,
            request.order,
        );
        let lesson = self.lessons.create(lesson).await?;

        log::info!(
            "Added lesson '{}' ({}) to chapter {}",
            lesson.name,
            lesson.id,
            chapter_id
        );
        Ok(lesson)
    }

    /// Replaces the lesson body. `order` is left to `reorder_lessons`.
    pub async fn update_lesson_content(&self, id: &str, content: String) -> AppResult<Lesson> {
        let lesson = self.lessons.update_content(id, &content).await?;
        log::info!("Updated content of lesson {}", id);
        Ok(lesson)
    }

    /// Assigns `order = position + 1` to each listed lesson of the chapter.
    ///
    /// Ids that do not belong to the chapter are skipped and unlisted lessons
    /// keep their order. Updates are written one by one; a failed write stops
    /// the reorder and earlier writes stay in place.
    pub async fn reorder_lessons(&self, chapter_id: &str, ordered_ids: &[String]) -> AppResult<()> {
        let lessons = self.lessons.find_by_chapter_id(chapter_id).await?;
        let known: HashSet<&str> = lessons.iter().map(|lesson| lesson.id.as_str()).collect();

        let mut skipped = 0usize;
        for (position, id) in ordered_ids.iter().enumerate() {
            if !known.contains(id.as_str()) {
                skipped += 1;
                continue;
            }

            let order = i32::try_from(position + 1)
                .map_err(|_| AppError::InvalidInput("Too many lesson ids".to_string()))?;
            self.lessons.update_order(id, order).await?;
        }

        if skipped > 0 {
            log::warn!(
                "Reorder of chapter {} skipped {} id(s) not in the chapter",
                chapter_id,
                skipped
            );
        }
        log::info!("Reordered lessons of chapter {}", chapter_id);
        Ok(())
    }

    pub async fn delete_lesson(&self, id: &str) -> AppResult<()> {
        if !self.lessons.exists(id).await? {
            return Err(AppError::NotFound(format!("Lesson with id '{}' not found", id)));
        }

        let attachments = self.attachments.count_by_lesson_id(id).await?;
        if attachments > 0 {
            return Err(AppError::Conflict(format!(
                "Lesson '{}' still has {} attachment(s)",
                id, attachments
            )));
        }

        self.lessons.delete(id).await?;
        log::info!("Deleted lesson {}", id);
        Ok(())
    }
}
