use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A chapter inside a course. `order` is a position hint among the course's
/// chapters and is not unique.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Chapter {
    pub id: String,
    pub name: String,
    pub description: String,
    pub order: i32,
    pub course_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Chapter {
    pub fn new(course_id: &str, name: &str, description: &str, order: i32) -> Self {
        let now = Utc::now();
        Chapter {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            description: description.to_string(),
            order,
            course_id: course_id.to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}
