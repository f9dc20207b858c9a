use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// File attached to a lesson.
///
/// `name` is the filename the uploader supplied and is only used for
/// presentation. `storage_key` addresses the bytes in the blob store and is
/// generated server-side; it never leaves the service.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Attachment {
    pub id: String,
    pub name: String,
    pub storage_key: String,
    pub lesson_id: String,
    pub created_at: DateTime<Utc>,
}

impl Attachment {
    pub fn new(lesson_id: &str, name: &str, storage_key: &str) -> Self {
        Attachment {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            storage_key: storage_key.to_string(),
            lesson_id: lesson_id.to_string(),
            created_at: Utc::now(),
        }
    }
}
