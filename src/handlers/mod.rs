pub mod attachment_handler;
pub mod auth_handler;
pub mod chapter_handler;
pub mod course_handler;
pub mod health_handler;
pub mod lesson_handler;

use std::sync::Arc;

use actix_multipart::form::MultipartFormConfig;
use actix_web::web;

use crate::{app_state::AppState, auth::JwtVerifier, errors::AppError};

/// Registers shared state, extractor error handling and every route.
pub fn configure(
    state: Arc<AppState>,
    verifier: web::Data<JwtVerifier>,
) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg: &mut web::ServiceConfig| {
        let max_upload_bytes = state.config.max_upload_bytes;

        cfg.app_data(web::Data::new(state))
            .app_data(verifier)
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                AppError::InvalidInput(format!("Invalid JSON body: {}", err)).into()
            }))
            .app_data(web::PathConfig::default().error_handler(|err, _req| {
                AppError::InvalidInput(format!("Invalid path parameter: {}", err)).into()
            }))
            .app_data(web::QueryConfig::default().error_handler(|err, _req| {
                AppError::InvalidInput(format!("Invalid query parameter: {}", err)).into()
            }))
            .app_data(
                MultipartFormConfig::default()
                    .total_limit(max_upload_bytes)
                    .memory_limit(max_upload_bytes)
                    .error_handler(|err, _req| {
                        AppError::InvalidInput(format!("Invalid multipart body: {}", err)).into()
                    }),
            )
            .service(health_handler::health_check)
            .service(health_handler::health_check_ready)
            .service(auth_handler::login)
            .service(auth_handler::refresh_token)
            .service(auth_handler::me)
            .service(course_handler::list_courses)
            .service(course_handler::create_course)
            .service(course_handler::get_course)
            .service(course_handler::update_course)
            .service(course_handler::delete_course)
            .service(chapter_handler::list_chapters)
            .service(chapter_handler::create_chapter)
            .service(chapter_handler::reorder_lessons)
            .service(chapter_handler::get_chapter)
            .service(chapter_handler::update_chapter_order)
            .service(chapter_handler::delete_chapter)
            .service(lesson_handler::list_lessons)
            .service(lesson_handler::create_lesson)
            .service(lesson_handler::list_lesson_attachments)
            .service(lesson_handler::grant_lesson_access)
            .service(lesson_handler::list_lesson_access)
            .service(lesson_handler::get_lesson)
            .service(lesson_handler::update_lesson_content)
            .service(lesson_handler::delete_lesson)
            .service(attachment_handler::upload_attachment)
            .service(attachment_handler::download_attachment)
            .service(attachment_handler::delete_attachment);
    }
}
