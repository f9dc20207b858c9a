use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Grant allowing `user_id` (the token subject) to download the attachments
/// of `lesson_id`. The row existing is the whole predicate.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct LessonAccess {
    pub user_id: String,
    pub lesson_id: String,
    pub granted_at: DateTime<Utc>,
}

impl LessonAccess {
    pub fn new(user_id: &str, lesson_id: &str) -> Self {
        LessonAccess {
            user_id: user_id.to_string(),
            lesson_id: lesson_id.to_string(),
            granted_at: Utc::now(),
        }
    }
}
