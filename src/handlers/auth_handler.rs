use std::sync::Arc;

use actix_web::{get, post, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::dto::request::{LoginRequest, RefreshTokenRequest},
};

/// Exchanges username and password for tokens at the identity provider.
#[post("/auth/login")]
pub async fn login(
    state: web::Data<Arc<AppState>>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    request.validate()?;

    let tokens = state
        .identity_provider
        .password_grant(&request.username, &request.password)
        .await?;

    log::info!("Issued tokens for '{}'", request.username);
    Ok(HttpResponse::Ok().json(tokens))
}

#[post("/auth/refresh")]
pub async fn refresh_token(
    state: web::Data<Arc<AppState>>,
    request: web::Json<RefreshTokenRequest>,
) -> Result<HttpResponse, AppError> {
    request.validate()?;

    let tokens = state
        .identity_provider
        .refresh_grant(&request.refresh_token)
        .await?;
    Ok(HttpResponse::Ok().json(tokens))
}

#[get("/auth/me")]
pub async fn me(user: AuthenticatedUser) -> HttpResponse {
    HttpResponse::Ok().json(user.0)
}
