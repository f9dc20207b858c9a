use std::sync::Arc;

use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::Chapter,
        dto::{request::CreateChapterRequest, response::ChapterDetailDto},
    },
    repositories::{ChapterRepository, CourseRepository, LessonRepository},
};

pub struct ChapterService {
    courses: Arc<dyn CourseRepository>,
    chapters: Arc<dyn ChapterRepository>,
    lessons: Arc<dyn LessonRepository>,
}

impl ChapterService {
    pub fn new(
        courses: Arc<dyn CourseRepository>,
        chapters: Arc<dyn ChapterRepository>,
        lessons: Arc<dyn LessonRepository>,
    ) -> Self {
        Self {
            courses,
            chapters,
            lessons,
        }
    }

    pub async fn list_chapters(&self) -> AppResult<Vec<Chapter>> {
        self.chapters.find_all().await
    }

    pub async fn get_chapter(&self, id: &str) -> AppResult<ChapterDetailDto> {
        let chapter = self.chapters.find_by_id(id).await?;
        let lessons = self.lessons.find_by_chapter_id(id).await?;

        Ok(ChapterDetailDto { chapter, lessons })
    }

    /// Creates a chapter under `course_id`. Any course id in the request body
    /// is ignored.
    pub async fn add_chapter_to_course(
        &self,
        course_id: &str,
        request: CreateChapterRequest,
    ) -> AppResult<Chapter> {
        request.validate()?;

        if let Some(body_course_id) = request.course_id.as_deref() {
            if body_course_id != course_id {
                log::debug!(
                    "Ignoring body course_id '{}' in favour of '{}'",
                    body_course_id,
                    course_id
                );
            }
        }

        if !self.courses.exists(course_id).await? {
            return Err(AppError::ParentNotFound(format!(
                "Course with id '{}' not found",
                course_id
            )));
        }

        let chapter = Chapter::new(course_id, &request.name, &request.description, request.order);
        let chapter = self.chapters.create(chapter).await?;

        log::info!(
            "Added chapter '{}' ({}) to course {}",
            chapter.name,
            chapter.id,
            course_id
        );
        Ok(chapter)
    }

    /// Sets the chapter's position hint. Neither uniqueness nor bounds are
    /// checked.
    pub async fn update_chapter_order(&self, id: &str, order: i32) -> AppResult<Chapter> {
        let chapter = self.chapters.update_order(id, order).await?;
        log::info!("Moved chapter {} to position {}", id, order);
        Ok(chapter)
    }

    pub async fn delete_chapter(&self, id: &str) -> AppResult<()> {
        if !self.chapters.exists(id).await? {
            return Err(AppError::NotFound(format!("Chapter with id '{}' not found", id)));
        }

        let lessons = self.lessons.count_by_chapter_id(id).await?;
        if lessons > 0 {
            return Err(AppError::Conflict(format!(
                "Chapter '{}' still has {} lesson(s)",
                id, lessons
            )));
        }

        self.chapters.delete(id).await?;
        log::info!("Deleted chapter {}", id);
        Ok(())
    }
}
