use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};

use lms_server::{
    app_state::AppState, auth::AuthMiddleware, auth::JwtVerifier, config::Config, handlers,
    middleware::RequestIdMiddleware,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env();
    if config.is_production() {
        config
            .validate_for_production()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?;
    }

    let host = config.web_server_host.clone();
    let port = config.web_server_port;
    let cors_origin = config.cors_allowed_origin.clone();

    let state = AppState::new(config.clone())
        .await
        .map(Arc::new)
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    let verifier = web::Data::new(JwtVerifier::new(
        &config,
        Arc::clone(&state.identity_provider),
    ));
    match verifier.refresh_keys().await {
        Ok(_) => log::info!("Loaded signing keys from {}", config.jwks_url()),
        Err(err) => log::error!(
            "Could not load signing keys, will retry on an unknown key id: {}",
            err
        ),
    }

    log::info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = match &cors_origin {
            Some(origin) => Cors::default()
                .allowed_origin(origin)
                .allow_any_method()
                .allow_any_header()
                .max_age(3600),
            None => Cors::permissive(),
        };

        App::new()
            .configure(handlers::configure(Arc::clone(&state), verifier.clone()))
            .wrap(AuthMiddleware)
            .wrap(RequestIdMiddleware)
            .wrap(Logger::new("%a \"%r\" %s %b %T %{x-request-id}o"))
            .wrap(cors)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
