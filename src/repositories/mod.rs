pub mod attachment_repository;
pub mod chapter_repository;
pub mod course_repository;
pub mod lesson_access_repository;
pub mod lesson_repository;

use std::sync::Arc;

use mongodb::error::{ErrorKind, WriteFailure};

use crate::{db::Database, errors::AppResult};

pub use attachment_repository::{AttachmentRepository, MongoAttachmentRepository};
pub use chapter_repository::{ChapterRepository, MongoChapterRepository};
pub use course_repository::{CourseRepository, MongoCourseRepository};
pub use lesson_access_repository::{LessonAccessRepository, MongoLessonAccessRepository};
pub use lesson_repository::{LessonRepository, MongoLessonRepository};

const DUPLICATE_KEY_CODE: i32 = 11000;

/// One repository per entity, shared by the services.
#[derive(Clone)]
pub struct Repositories {
    pub courses: Arc<dyn CourseRepository>,
    pub chapters: Arc<dyn ChapterRepository>,
    pub lessons: Arc<dyn LessonRepository>,
    pub attachments: Arc<dyn AttachmentRepository>,
    pub lesson_access: Arc<dyn LessonAccessRepository>,
}

impl Repositories {
    pub fn mongo(db: &Database) -> Self {
        Self {
            courses: Arc::new(MongoCourseRepository::new(db)),
            chapters: Arc::new(MongoChapterRepository::new(db)),
            lessons: Arc::new(MongoLessonRepository::new(db)),
            attachments: Arc::new(MongoAttachmentRepository::new(db)),
            lesson_access: Arc::new(MongoLessonAccessRepository::new(db)),
        }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        self.courses.ensure_indexes().await?;
        self.chapters.ensure_indexes().await?;
        self.lessons.ensure_indexes().await?;
        self.attachments.ensure_indexes().await?;
        self.lesson_access.ensure_indexes().await?;
        Ok(())
    }
}

pub(crate) fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => {
            write_error.code == DUPLICATE_KEY_CODE
        }
        ErrorKind::Command(command_error) => command_error.code == DUPLICATE_KEY_CODE,
        _ => false,
    }
}
