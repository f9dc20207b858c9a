use std::{
    future::{ready, Ready},
    rc::Rc,
};

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{Header, AUTHORIZATION},
    web, Error, FromRequest, HttpMessage, HttpRequest, ResponseError,
};
use actix_web_httpauth::headers::authorization::{Authorization, Bearer};
use futures::future::LocalBoxFuture;

use crate::{
    auth::{AuthContext, JwtVerifier},
    errors::AppError,
    middleware::get_request_id,
};

/// Establishes the caller's [`AuthContext`] from a bearer token.
///
/// Requests without an `Authorization` header pass through anonymously so
/// public routes keep working; route guards decide what anonymous callers
/// may do. A header that is present but unusable is rejected with 401.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            if !req.headers().contains_key(AUTHORIZATION) {
                let res = service.call(req).await?;
                return Ok(res.map_into_left_body());
            }

            match authenticate(&req).await {
                Ok(context) => {
                    log::debug!("Authenticated '{}'", context.subject);
                    req.extensions_mut().insert(context);
                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                }
                Err(err) => {
                    log::warn!(
                        "Rejected bearer token (request {}): {}",
                        get_request_id(req.request()).unwrap_or_default(),
                        err
                    );
                    let response = err.error_response();
                    Ok(req.into_response(response).map_into_right_body())
                }
            }
        })
    }
}

async fn authenticate(req: &ServiceRequest) -> Result<AuthContext, AppError> {
    let verifier = req
        .app_data::<web::Data<JwtVerifier>>()
        .cloned()
        .ok_or_else(|| AppError::InternalError("JWT verifier not configured".to_string()))?;

    let bearer = Authorization::<Bearer>::parse(req.request())
        .map_err(|_| {
            AppError::Unauthorized("Authorization header must carry a bearer token".to_string())
        })?
        .into_scheme();

    verifier.verify(bearer.token()).await
}

/// Extractor for handlers that need the caller's identity. Fails with 401
/// when the request is anonymous.
pub struct AuthenticatedUser(pub AuthContext);

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let context = req
            .extensions()
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Not authenticated".to_string()));

        ready(context.map(AuthenticatedUser))
    }
}
