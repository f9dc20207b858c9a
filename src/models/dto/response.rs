use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::domain::{Attachment, Chapter, Course, Lesson, LessonAccess};

/// A chapter with its lessons sorted by `order`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChapterDetailDto {
    #[serde(flatten)]
    pub chapter: Chapter,
    pub lessons: Vec<Lesson>,
}

/// A course with its chapters, each carrying its lessons.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseDetailDto {
    #[serde(flatten)]
    pub course: Course,
    pub chapters: Vec<ChapterDetailDto>,
}

/// Public view of an attachment. The storage key stays server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachmentDto {
    pub id: String,
    pub name: String,
    pub lesson_id: String,
    pub created_at: DateTime<Utc>,
}

impl From<Attachment> for AttachmentDto {
    fn from(attachment: Attachment) -> Self {
        AttachmentDto {
            id: attachment.id,
            name: attachment.name,
            lesson_id: attachment.lesson_id,
            created_at: attachment.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonAccessDto {
    pub user_id: String,
    pub lesson_id: String,
    pub granted_at: DateTime<Utc>,
}

impl From<LessonAccess> for LessonAccessDto {
    fn from(access: LessonAccess) -> Self {
        LessonAccessDto {
            user_id: access.user_id,
            lesson_id: access.lesson_id,
            granted_at: access.granted_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        MessageResponse {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attachment_dto_hides_storage_key() {
        let attachment = Attachment::new("lesson-1", "slides.pdf", "3f2a.pdf");
        let json = serde_json::to_value(AttachmentDto::from(attachment)).unwrap();

        assert_eq!(json["name"], "slides.pdf");
        assert!(json.get("storage_key").is_none());
    }

    #[test]
    fn test_course_detail_flattens_course_fields() {
        let course = Course::new("Go 101", "");
        let chapter = Chapter::new(&course.id, "Intro", "", 1);
        let lesson = Lesson::new(&chapter.id, "A", "", "", 1);

        let detail = CourseDetailDto {
            course: course.clone(),
            chapters: vec![ChapterDetailDto {
                chapter,
                lessons: vec![lesson],
            }],
        };
        let json = serde_json::to_value(&detail).unwrap();

        assert_eq!(json["id"], course.id.as_str());
        assert_eq!(json["name"], "Go 101");
        assert_eq!(json["chapters"][0]["name"], "Intro");
        assert_eq!(json["chapters"][0]["lessons"][0]["name"], "A");
    }
}
