use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Course {
    pub id: String,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Course {
    pub fn new(name: &str, description: &str) -> Self {
        let now = Utc::now();
        Course {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            description: description.to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_creation() {
        let course = Course::new("Go 101", "Introduction to Go");

        assert_eq!(course.name, "Go 101");
        assert_eq!(course.description, "Introduction to Go");
        assert!(Uuid::parse_str(&course.id).is_ok());
        assert_eq!(course.created_at, course.updated_at);
    }

    #[test]
    fn test_course_ids_are_unique() {
        let first = Course::new("A", "");
        let second = Course::new("A", "");
        assert_ne!(first.id, second.id);
    }
}
