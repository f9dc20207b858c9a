pub mod attachment;
pub mod chapter;
pub mod course;
pub mod lesson;
pub mod lesson_access;
pub use attachment::Attachment;
pub use chapter::Chapter;
pub use course::Course;
pub use lesson::Lesson;
pub use lesson_access::LessonAccess;
