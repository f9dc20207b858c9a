use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Lesson {
    pub id: String,
    pub name: String,
    pub description: String,
    pub content: String,
    pub order: i32,
    pub chapter_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Lesson {
    pub fn new(chapter_id: &str, name: &str, description: &str, content: &str, order: i32) -> Self {
        let now = Utc::now();
        Lesson {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            description: description.to_string(),
            content: content.to_string(),
            order,
            chapter_id: chapter_id.to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}
