use std::sync::Arc;

use actix_web::{delete, get, post, put, web, HttpResponse};
use uuid::Uuid;

use crate::{
    app_state::AppState,
    auth::RequireRoles,
    errors::AppError,
    models::dto::request::{CreateCourseRequest, UpdateCourseRequest},
};

#[get("/courses")]
pub async fn list_courses(state: web::Data<Arc<AppState>>) -> Result<HttpResponse, AppError> {
    let courses = state.course_service.list_courses().await?;
    Ok(HttpResponse::Ok().json(courses))
}

#[get("/courses/{id}")]
pub async fn get_course(
    state: web::Data<Arc<AppState>>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let course = state.course_service.get_course(&id.to_string()).await?;
    Ok(HttpResponse::Ok().json(course))
}

#[post("/courses", wrap = "RequireRoles::admin()")]
pub async fn create_course(
    state: web::Data<Arc<AppState>>,
    request: web::Json<CreateCourseRequest>,
) -> Result<HttpResponse, AppError> {
    let course = state
        .course_service
        .create_course(request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(course))
}

#[put("/courses/{id}", wrap = "RequireRoles::staff()")]
pub async fn update_course(
    state: web::Data<Arc<AppState>>,
    id: web::Path<Uuid>,
    request: web::Json<UpdateCourseRequest>,
) -> Result<HttpResponse, AppError> {
    let course = state
        .course_service
        .update_course_details(&id.to_string(), request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(course))
}

#[delete("/courses/{id}", wrap = "RequireRoles::admin()")]
pub async fn delete_course(
    state: web::Data<Arc<AppState>>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    state.course_service.delete_course(&id.to_string()).await?;
    Ok(HttpResponse::NoContent().finish())
}
