use std::sync::Arc;

use actix_web::{delete, get, post, put, web, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use crate::{
    app_state::AppState,
    auth::RequireRoles,
    errors::AppError,
    models::dto::{
        request::{ChapterIdQuery, CreateLessonRequest, GrantAccessRequest, UpdateLessonContentRequest},
        response::MessageResponse,
    },
};

#[get("/lessons")]
pub async fn list_lessons(state: web::Data<Arc<AppState>>) -> Result<HttpResponse, AppError> {
    let lessons = state.lesson_service.list_lessons().await?;
    Ok(HttpResponse::Ok().json(lessons))
}

#[get("/lessons/{id}")]
pub async fn get_lesson(
    state: web::Data<Arc<AppState>>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let lesson = state.lesson_service.get_lesson(&id.to_string()).await?;
    Ok(HttpResponse::Ok().json(lesson))
}

#[post("/lessons", wrap = "RequireRoles::staff()")]
pub async fn create_lesson(
    state: web::Data<Arc<AppState>>,
    query: web::Query<ChapterIdQuery>,
    request: web::Json<CreateLessonRequest>,
) -> Result<HttpResponse, AppError> {
    let lesson = state
        .lesson_service
        .add_lesson_to_chapter(&query.chapter_id.to_string(), request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(lesson))
}

#[put("/lessons/{id}", wrap = "RequireRoles::staff()")]
pub async fn update_lesson_content(
    state: web::Data<Arc<AppState>>,
    id: web::Path<Uuid>,
    request: web::Json<UpdateLessonContentRequest>,
) -> Result<HttpResponse, AppError> {
    let lesson = state
        .lesson_service
        .update_lesson_content(&id.to_string(), request.into_inner().content)
        .await?;
    Ok(HttpResponse::Ok().json(lesson))
}

#[delete("/lessons/{id}", wrap = "RequireRoles::admin()")]
pub async fn delete_lesson(
    state: web::Data<Arc<AppState>>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    state.lesson_service.delete_lesson(&id.to_string()).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[get("/lessons/{id}/attachments")]
pub async fn list_lesson_attachments(
    state: web::Data<Arc<AppState>>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let attachments = state
        .attachment_service
        .list_attachments(&id.to_string())
        .await?;
    Ok(HttpResponse::Ok().json(attachments))
}

#[post("/lessons/{id}/access", wrap = "RequireRoles::staff()")]
pub async fn grant_lesson_access(
    state: web::Data<Arc<AppState>>,
    id: web::Path<Uuid>,
    request: web::Json<GrantAccessRequest>,
) -> Result<HttpResponse, AppError> {
    request.validate()?;

    let created = state
        .lesson_access_service
        .grant_access(&request.user_id, &id.to_string())
        .await?;

    if created {
        Ok(HttpResponse::Created().json(MessageResponse::new("Access granted")))
    } else {
        Ok(HttpResponse::Ok().json(MessageResponse::new("Access already granted")))
    }
}

#[get("/lessons/{id}/access", wrap = "RequireRoles::staff()")]
pub async fn list_lesson_access(
    state: web::Data<Arc<AppState>>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let grants = state
        .lesson_access_service
        .list_access(&id.to_string())
        .await?;
    Ok(HttpResponse::Ok().json(grants))
}
