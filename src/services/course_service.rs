use std::sync::Arc;

use chrono::Utc;
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::Course,
        dto::{
            request::{CreateCourseRequest, UpdateCourseRequest},
            response::{ChapterDetailDto, CourseDetailDto},
        },
    },
    repositories::{ChapterRepository, CourseRepository, LessonRepository},
};

pub struct CourseService {
    courses: Arc<dyn CourseRepository>,
    chapters: Arc<dyn ChapterRepository>,
    lessons: Arc<dyn LessonRepository>,
}

impl CourseService {
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

    pub async fn list_courses(&self) -> AppResult<Vec<Course>> {
        self.courses.find_all().await
    }

    /// The course with its chapters and their lessons, both sorted by order.
    pub async fn get_course(&self, id: &str) -> AppResult<CourseDetailDto> {
        let course = self.courses.find_by_id(id).await?;
        let chapters = self.chapters.find_by_course_id(id).await?;

        let mut details = Vec::with_capacity(chapters.len());
        for chapter in chapters {
            let lessons = self.lessons.find_by_chapter_id(&chapter.id).await?;
            details.push(ChapterDetailDto { chapter, lessons });
        }

        Ok(CourseDetailDto {
            course,
            chapters: details,
        })
    }

    pub async fn create_course(&self, request: CreateCourseRequest) -> AppResult<Course> {
        request.validate()?;

        let course = Course::new(&request.name, &request.description);
        let course = self.courses.create(course).await?;

        log::info!("Created course '{}' ({})", course.name, course.id);
        Ok(course)
    }

    pub async fn update_course_details(
        &self,
        id: &str,
        request: UpdateCourseRequest,
    ) -> AppResult<Course> {
        request.validate()?;

        if let Some(body_id) = request.id.as_deref() {
            if body_id != id {
                return Err(AppError::InvalidInput(format!(
                    "Body id '{}' does not match path id '{}'",
                    body_id, id
                )));
            }
        }

        let mut course = self.courses.find_by_id(id).await?;
        course.name = request.name;
        course.description = request.description;
        course.updated_at = Utc::now();

        self.courses.update(course).await
    }

    pub async fn delete_course(&self, id: &str) -> AppResult<()> {
        if !self.courses.exists(id).await? {
            return Err(AppError::NotFound(format!("Course with id '{}' not found", id)));
        }

        let chapters = self.chapters.count_by_course_id(id).await?;
        if chapters > 0 {
            return Err(AppError::Conflict(format!(
                "Course '{}' still has {} chapter(s)",
                id, chapters
            )));
        }

        self.courses.delete(id).await?;
        log::info!("Deleted course {}", id);
        Ok(())
    }
}
