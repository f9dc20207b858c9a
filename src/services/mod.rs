pub mod attachment_service;
pub mod chapter_service;
pub mod course_service;
pub mod lesson_access_service;
pub mod lesson_service;

pub use attachment_service::{AttachmentService, DownloadedFile};
pub use chapter_service::ChapterService;
pub use course_service::CourseService;
pub use lesson_access_service::LessonAccessService;
pub use lesson_service::LessonService;
