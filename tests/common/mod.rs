#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    web, App,
};
use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{encode, jwk::JwkSet, Algorithm, EncodingKey, Header};
use tokio::sync::RwLock;

use lms_server::{
    app_state::AppState,
    auth::{AuthMiddleware, JwtVerifier},
    config::Config,
    errors::{AppError, AppResult},
    handlers,
    middleware::RequestIdMiddleware,
    models::domain::{Attachment, Chapter, Course, Lesson, LessonAccess},
    repositories::{
        AttachmentRepository, ChapterRepository, CourseRepository, LessonAccessRepository,
        LessonRepository, Repositories,
    },
    storage::BlobStore,
};

pub const SIGNING_KID: &str = "test-key";
const SIGNING_SECRET_B64: &str = "dGVzdHNpZ25pbmdrZXkxMjM0";

fn not_found(kind: &str, id: &str) -> AppError {
    AppError::NotFound(format!("{} with id '{}' not found", kind, id))
}

#[derive(Default)]
pub struct InMemoryCourseRepository {
    courses: RwLock<HashMap<String, Course>>,
}

#[async_trait]
impl CourseRepository for InMemoryCourseRepository {
    async fn find_all(&self) -> AppResult<Vec<Course>> {
        let mut courses: Vec<Course> = self.courses.read().await.values().cloned().collect();
        courses.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(courses)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Course> {
        self.courses
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| not_found("Course", id))
    }

    async fn exists(&self, id: &str) -> AppResult<bool> {
        Ok(self.courses.read().await.contains_key(id))
    }

    async fn create(&self, course: Course) -> AppResult<Course> {
        self.courses
            .write()
            .await
            .insert(course.id.clone(), course.clone());
        Ok(course)
    }

    async fn update(&self, course: Course) -> AppResult<Course> {
        let mut courses = self.courses.write().await;
        match courses.get_mut(&course.id) {
            Some(existing) => {
                *existing = course.clone();
                Ok(course)
            }
            None => Err(not_found("Course", &course.id)),
        }
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        self.courses
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| not_found("Course", id))
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryChapterRepository {
    chapters: RwLock<HashMap<String, Chapter>>,
}

#[async_trait]
impl ChapterRepository for InMemoryChapterRepository {
    async fn find_all(&self) -> AppResult<Vec<Chapter>> {
        let mut chapters: Vec<Chapter> = self.chapters.read().await.values().cloned().collect();
        chapters.sort_by(|a, b| (&a.course_id, a.order).cmp(&(&b.course_id, b.order)));
        Ok(chapters)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Chapter> {
        self.chapters
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| not_found("Chapter", id))
    }

    async fn find_by_course_id(&self, course_id: &str) -> AppResult<Vec<Chapter>> {
        let mut chapters: Vec<Chapter> = self
            .chapters
            .read()
            .await
            .values()
            .filter(|c| c.course_id == course_id)
            .cloned()
            .collect();
        chapters.sort_by(|a, b| (a.order, a.created_at).cmp(&(b.order, b.created_at)));
        Ok(chapters)
    }

    async fn count_by_course_id(&self, course_id: &str) -> AppResult<u64> {
        let chapters = self.chapters.read().await;
        Ok(chapters.values().filter(|c| c.course_id == course_id).count() as u64)
    }

    async fn exists(&self, id: &str) -> AppResult<bool> {
        Ok(self.chapters.read().await.contains_key(id))
    }

    async fn create(&self, chapter: Chapter) -> AppResult<Chapter> {
        self.chapters
            .write()
            .await
            .insert(chapter.id.clone(), chapter.clone());
        Ok(chapter)
    }

    async fn update_order(&self, id: &str, order: i32) -> AppResult<Chapter> {
        let mut chapters = self.chapters.write().await;
        let chapter = chapters.get_mut(id).ok_or_else(|| not_found("Chapter", id))?;
        chapter.order = order;
        chapter.updated_at = Utc::now();
        Ok(chapter.clone())
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        self.chapters
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| not_found("Chapter", id))
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryLessonRepository {
    lessons: RwLock<HashMap<String, Lesson>>,
}

#[async_trait]
impl LessonRepository for InMemoryLessonRepository {
    async fn find_all(&self) -> AppResult<Vec<Lesson>> {
        let mut lessons: Vec<Lesson> = self.lessons.read().await.values().cloned().collect();
        lessons.sort_by(|a, b| (&a.chapter_id, a.order).cmp(&(&b.chapter_id, b.order)));
        Ok(lessons)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Lesson> {
        self.lessons
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| not_found("Lesson", id))
    }

    async fn find_by_chapter_id(&self, chapter_id: &str) -> AppResult<Vec<Lesson>> {
        let mut lessons: Vec<Lesson> = self
            .lessons
            .read()
            .await
            .values()
            .filter(|l| l.chapter_id == chapter_id)
            .cloned()
            .collect();
        lessons.sort_by(|a, b| (a.order, a.created_at).cmp(&(b.order, b.created_at)));
        Ok(lessons)
    }

    async fn count_by_chapter_id(&self, chapter_id: &str) -> AppResult<u64> {
        let lessons = self.lessons.read().await;
        Ok(lessons.values().filter(|l| l.chapter_id == chapter_id).count() as u64)
    }

    async fn exists(&self, id: &str) -> AppResult<bool> {
        Ok(self.lessons.read().await.contains_key(id))
    }

    async fn create(&self, lesson: Lesson) -> AppResult<Lesson> {
        self.lessons
            .write()
            .await
            .insert(lesson.id.clone(), lesson.clone());
        Ok(lesson)
    }

    async fn update_content(&self, id: &str, content: &str) -> AppResult<Lesson> {
        let mut lessons = self.lessons.write().await;
        let lesson = lessons.get_mut(id).ok_or_else(|| not_found("Lesson", id))?;
        lesson.content = content.to_string();
        lesson.updated_at = Utc::now();
        Ok(lesson.clone())
    }

    async fn update_order(&self, id: &str, order: i32) -> AppResult<()> {
        let mut lessons = self.lessons.write().await;
        let lesson = lessons.get_mut(id).ok_or_else(|| not_found("Lesson", id))?;
        lesson.order = order;
        lesson.updated_at = Utc::now();
        Ok(())
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        self.lessons
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| not_found("Lesson", id))
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryAttachmentRepository {
    attachments: RwLock<HashMap<String, Attachment>>,
}

#[async_trait]
impl AttachmentRepository for InMemoryAttachmentRepository {
    async fn create(&self, attachment: Attachment) -> AppResult<Attachment> {
        self.attachments
            .write()
            .await
            .insert(attachment.id.clone(), attachment.clone());
        Ok(attachment)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Attachment> {
        self.attachments
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| not_found("Attachment", id))
    }

    async fn find_by_lesson_id(&self, lesson_id: &str) -> AppResult<Vec<Attachment>> {
        let mut attachments: Vec<Attachment> = self
            .attachments
            .read()
            .await
            .values()
            .filter(|a| a.lesson_id == lesson_id)
            .cloned()
            .collect();
        attachments.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(attachments)
    }

    async fn count_by_lesson_id(&self, lesson_id: &str) -> AppResult<u64> {
        let attachments = self.attachments.read().await;
        Ok(attachments
            .values()
            .filter(|a| a.lesson_id == lesson_id)
            .count() as u64)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        self.attachments
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| not_found("Attachment", id))
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryLessonAccessRepository {
    grants: RwLock<HashMap<(String, String), LessonAccess>>,
}

#[async_trait]
impl LessonAccessRepository for InMemoryLessonAccessRepository {
    async fn grant(&self, user_id: &str, lesson_id: &str) -> AppResult<bool> {
        let mut grants = self.grants.write().await;
        let key = (user_id.to_string(), lesson_id.to_string());
        if grants.contains_key(&key) {
            return Ok(false);
        }
        grants.insert(key, LessonAccess::new(user_id, lesson_id));
        Ok(true)
    }

    async fn has_access(&self, user_id: &str, lesson_id: &str) -> AppResult<bool> {
        let grants = self.grants.read().await;
        Ok(grants.contains_key(&(user_id.to_string(), lesson_id.to_string())))
    }

    async fn find_by_lesson_id(&self, lesson_id: &str) -> AppResult<Vec<LessonAccess>> {
        let mut grants: Vec<LessonAccess> = self
            .grants
            .read()
            .await
            .values()
            .filter(|g| g.lesson_id == lesson_id)
            .cloned()
            .collect();
        grants.sort_by(|a, b| a.granted_at.cmp(&b.granted_at));
        Ok(grants)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

/// Blob store over a map that counts reads.
#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: RwLock<HashMap<String, Vec<u8>>>,
    reads: AtomicUsize,
}

impl MemoryBlobStore {
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, key: &str, bytes: Vec<u8>) -> AppResult<()> {
        self.blobs.write().await.insert(key.to_string(), bytes);
        Ok(())
    }

    async fn get(&self, key: &str) -> AppResult<Vec<u8>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.blobs
            .read()
            .await
            .get(key)
            .cloned()
            .ok_or_else(|| AppError::StorageError(format!("No blob stored under '{}'", key)))
    }

    async fn delete(&self, key: &str) -> AppResult<bool> {
        Ok(self.blobs.write().await.remove(key).is_some())
    }
}

pub fn test_config() -> Config {
    let mut config = Config::from_env();
    config.app_env = "test".to_string();
    config.keycloak_base_url = "http://keycloak:8080".to_string();
    config.keycloak_realm = "lms".to_string();
    config.oidc_roles_client = "lms-app".to_string();
    config.oidc_validate_issuer = true;
    config.attachment_bucket = "attachments".to_string();
    config.max_upload_bytes = 1024 * 1024;
    config
}

pub fn test_jwks() -> JwkSet {
    serde_json::from_value(serde_json::json!({
        "keys": [{
            "kty": "oct",
            "kid": SIGNING_KID,
            "alg": "HS256",
            "k": SIGNING_SECRET_B64
        }]
    }))
    .expect("valid test JWKS")
}

/// Access token for `subject` holding `roles` on the configured client.
pub fn mint_token(subject: &str, roles: &[&str]) -> String {
    let config = test_config();
    let claims = serde_json::json!({
        "sub": subject,
        "preferred_username": subject,
        "iss": config.issuer_url(),
        "iat": Utc::now().timestamp(),
        "exp": Utc::now().timestamp() + 300,
        "resource_access": { "lms-app": { "roles": roles } }
    });

    let mut header = Header::new(Algorithm::HS256);
    header.kid = Some(SIGNING_KID.to_string());
    let key = EncodingKey::from_base64_secret(SIGNING_SECRET_B64).expect("valid test secret");
    encode(&header, &claims, &key).expect("token encodes")
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

/// Application state over in-memory stores, with handles kept for
/// inspection.
pub struct TestContext {
    pub state: Arc<AppState>,
    pub verifier: web::Data<JwtVerifier>,
    pub lessons: Arc<InMemoryLessonRepository>,
    pub lesson_access: Arc<InMemoryLessonAccessRepository>,
    pub blobs: Arc<MemoryBlobStore>,
}

impl TestContext {
    pub fn new() -> Self {
        let config = test_config();

        let lessons = Arc::new(InMemoryLessonRepository::default());
        let lesson_access = Arc::new(InMemoryLessonAccessRepository::default());
        let blobs = Arc::new(MemoryBlobStore::default());

        let repositories = Repositories {
            courses: Arc::new(InMemoryCourseRepository::default()),
            chapters: Arc::new(InMemoryChapterRepository::default()),
            lessons: lessons.clone(),
            attachments: Arc::new(InMemoryAttachmentRepository::default()),
            lesson_access: lesson_access.clone(),
        };

        let verifier = web::Data::new(JwtVerifier::with_keys(&config, test_jwks()));
        let state = AppState::from_parts(config, repositories, blobs.clone(), None)
            .expect("state builds");

        Self {
            state: Arc::new(state),
            verifier,
            lessons,
            lesson_access,
            blobs,
        }
    }

    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse<impl MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .configure(handlers::configure(
                Arc::clone(&self.state),
                self.verifier.clone(),
            ))
            .wrap(AuthMiddleware)
            .wrap(RequestIdMiddleware)
    }
}
