use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct CreateCourseRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 10000))]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct UpdateCourseRequest {
    /// Optional echo of the path id; must match when present.
    #[serde(default)]
    pub id: Option<String>,

    #[validate(length(min = 1, max = 255))]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 10000))]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct CreateChapterRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 10000))]
    pub description: String,

    #[serde(default)]
    pub order: i32,

    // Overwritten by the `course_id` query parameter.
    #[serde(default)]
    pub course_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CourseIdQuery {
    pub course_id: Uuid,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpdateChapterOrderRequest {
    pub order: i32,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct CreateLessonRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 10000))]
    pub description: String,

    #[serde(default)]
    pub content: String,

    #[serde(default)]
    pub order: i32,

    // Overwritten by the `chapter_id` query parameter.
    #[serde(default)]
    pub chapter_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChapterIdQuery {
    pub chapter_id: Uuid,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpdateLessonContentRequest {
    pub content: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct GrantAccessRequest {
    #[validate(length(min = 1, max = 255))]
    pub user_id: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 255))]
    pub username: String,

    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1))]
    pub refresh_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_course_request_validation() {
        let valid = CreateCourseRequest {
            name: "Go 101".to_string(),
            description: String::new(),
        };
        assert!(valid.validate().is_ok());

        let empty_name = CreateCourseRequest {
            name: String::new(),
            description: String::new(),
        };
        assert!(empty_name.validate().is_err());
    }

    #[test]
    fn test_create_chapter_request_defaults() {
        let request: CreateChapterRequest =
            serde_json::from_str(r#"{ "name": "Intro" }"#).unwrap();

        assert_eq!(request.order, 0);
        assert!(request.description.is_empty());
        assert!(request.course_id.is_none());
    }

    #[test]
    fn test_grant_access_request_rejects_blank_user() {
        let request = GrantAccessRequest {
            user_id: String::new(),
        };
        assert!(request.validate().is_err());
    }
}
