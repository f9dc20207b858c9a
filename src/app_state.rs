use std::sync::Arc;

use crate::{
    auth::IdentityProviderClient,
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::Repositories,
    services::{AttachmentService, ChapterService, CourseService, LessonAccessService, LessonService},
    storage::{BlobStore, GridFsBlobStore},
};

#[derive(Clone)]
pub struct AppState {
    pub course_service: Arc<CourseService>,
    pub chapter_service: Arc<ChapterService>,
    pub lesson_service: Arc<LessonService>,
    pub attachment_service: Arc<AttachmentService>,
    pub lesson_access_service: Arc<LessonAccessService>,
    pub identity_provider: Arc<IdentityProviderClient>,
    pub db: Option<Database>,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let repositories = Repositories::mongo(&db);
        repositories.ensure_indexes().await?;

        let blob_store = Arc::new(GridFsBlobStore::new(&db, &config.attachment_bucket));

        Self::from_parts(config, repositories, blob_store, Some(db))
    }

    /// Wires the services over the given stores.
    pub fn from_parts(
        config: Config,
        repositories: Repositories,
        blob_store: Arc<dyn BlobStore>,
        db: Option<Database>,
    ) -> AppResult<Self> {
        let Repositories {
            courses,
            chapters,
            lessons,
            attachments,
            lesson_access,
        } = repositories;

        let course_service = Arc::new(CourseService::new(
            Arc::clone(&courses),
            Arc::clone(&chapters),
            Arc::clone(&lessons),
        ));
        let chapter_service = Arc::new(ChapterService::new(
            courses,
            Arc::clone(&chapters),
            Arc::clone(&lessons),
        ));
        let lesson_service = Arc::new(LessonService::new(
            chapters,
            Arc::clone(&lessons),
            Arc::clone(&attachments),
        ));
        let attachment_service = Arc::new(AttachmentService::new(
            Arc::clone(&lessons),
            attachments,
            Arc::clone(&lesson_access),
            blob_store,
        ));
        let lesson_access_service = Arc::new(LessonAccessService::new(lessons, lesson_access));

        let identity_provider = Arc::new(IdentityProviderClient::new(&config)?);

        Ok(Self {
            course_service,
            chapter_service,
            lesson_service,
            attachment_service,
            lesson_access_service,
            identity_provider,
            db,
            config: Arc::new(config),
        })
    }
}
