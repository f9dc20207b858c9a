use std::sync::Arc;

use actix_web::{delete, get, post, put, web, HttpResponse};
use uuid::Uuid;

use crate::{
    app_state::AppState,
    auth::RequireRoles,
    errors::AppError,
    models::dto::request::{CourseIdQuery, CreateChapterRequest, UpdateChapterOrderRequest},
};

#[get("/chapters")]
pub async fn list_chapters(state: web::Data<Arc<AppState>>) -> Result<HttpResponse, AppError> {
    let chapters = state.chapter_service.list_chapters().await?;
    Ok(HttpResponse::Ok().json(chapters))
}

#[get("/chapters/{id}")]
pub async fn get_chapter(
    state: web::Data<Arc<AppState>>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let chapter = state.chapter_service.get_chapter(&id.to_string()).await?;
    Ok(HttpResponse::Ok().json(chapter))
}

#[post("/chapters", wrap = "RequireRoles::staff()")]
pub async fn create_chapter(
    state: web::Data<Arc<AppState>>,
    query: web::Query<CourseIdQuery>,
    request: web::Json<CreateChapterRequest>,
) -> Result<HttpResponse, AppError> {
    let chapter = state
        .chapter_service
        .add_chapter_to_course(&query.course_id.to_string(), request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(chapter))
}

#[put("/chapters/{id}", wrap = "RequireRoles::staff()")]
pub async fn update_chapter_order(
    state: web::Data<Arc<AppState>>,
    id: web::Path<Uuid>,
    request: web::Json<UpdateChapterOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let chapter = state
        .chapter_service
        .update_chapter_order(&id.to_string(), request.order)
        .await?;
    Ok(HttpResponse::Ok().json(chapter))
}

#[delete("/chapters/{id}", wrap = "RequireRoles::admin()")]
pub async fn delete_chapter(
    state: web::Data<Arc<AppState>>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    state.chapter_service.delete_chapter(&id.to_string()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Body is the chapter's lesson ids in their new order.
#[put("/chapters/{id}/lessons/reorder", wrap = "RequireRoles::staff()")]
pub async fn reorder_lessons(
    state: web::Data<Arc<AppState>>,
    id: web::Path<Uuid>,
    lesson_ids: web::Json<Vec<String>>,
) -> Result<HttpResponse, AppError> {
    state
        .lesson_service
        .reorder_lessons(&id.to_string(), &lesson_ids)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
