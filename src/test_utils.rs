#[cfg(test)]
pub mod fixtures {
    use crate::models::domain::{Chapter, Course, Lesson};

    /// "Go 101" with chapter "Intro" holding lessons "A" (order 1) and
    /// "B" (order 2).
    pub fn course_tree() -> (Course, Chapter, Vec<Lesson>) {
        let course = Course::new("Go 101", "Introduction to Go");
        let chapter = Chapter::new(&course.id, "Intro", "", 1);
        let lessons = vec![
            Lesson::new(&chapter.id, "A", "", "first", 1),
            Lesson::new(&chapter.id, "B", "", "second", 2),
        ];
        (course, chapter, lessons)
    }

    pub fn test_lesson(chapter_id: &str, name: &str, order: i32) -> Lesson {
        Lesson::new(chapter_id, name, "", "", order)
    }
}

#[cfg(test)]
pub mod test_helpers {
    use actix_web::http::StatusCode;

    /// Asserts that a status code represents an error (4xx or 5xx)
    pub fn assert_error_status(status: StatusCode) {
        assert!(
            status.is_client_error() || status.is_server_error(),
            "Expected error status, got: {}",
            status
        );
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;

    #[test]
    fn test_course_tree_is_linked() {
        let (course, chapter, lessons) = course_tree();

        assert_eq!(chapter.course_id, course.id);
        assert!(lessons.iter().all(|lesson| lesson.chapter_id == chapter.id));
        assert_eq!(
            lessons.iter().map(|l| l.order).collect::<Vec<_>>(),
            vec![1, 2]
        );
    }
}
