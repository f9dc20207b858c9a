use std::{
    collections::BTreeSet,
    future::{ready, Ready},
    rc::Rc,
};

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage, ResponseError,
};
use futures::future::LocalBoxFuture;

use crate::{auth::AuthContext, errors::AppError};

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_TEACHER: &str = "teacher";

/// Route guard that passes when the caller holds at least one of the
/// listed roles. Anonymous callers get 401, authenticated callers without a
/// matching role get 403.
#[derive(Clone)]
pub struct RequireRoles {
    roles: Rc<BTreeSet<String>>,
}

impl RequireRoles {
    pub fn any_of(roles: &[&str]) -> Self {
        Self {
            roles: Rc::new(roles.iter().map(|role| role.to_string()).collect()),
        }
    }

    pub fn admin() -> Self {
        Self::any_of(&[ROLE_ADMIN])
    }

    pub fn staff() -> Self {
        Self::any_of(&[ROLE_ADMIN, ROLE_TEACHER])
    }
}

pub fn check_roles(context: Option<&AuthContext>, required: &BTreeSet<String>) -> Result<(), AppError> {
    let context =
        context.ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

    if context.roles.is_disjoint(required) {
        log::warn!(
            "Denied '{}': requires one of {:?}, holds {:?}",
            context.subject,
            required,
            context.roles
        );
        return Err(AppError::Forbidden(format!(
            "Requires one of the roles: {}",
            required.iter().cloned().collect::<Vec<_>>().join(", ")
        )));
    }

    Ok(())
}

impl<S, B> Transform<S, ServiceRequest> for RequireRoles
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRolesService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRolesService {
            service: Rc::new(service),
            roles: Rc::clone(&self.roles),
        }))
    }
}

pub struct RequireRolesService<S> {
    service: Rc<S>,
    roles: Rc<BTreeSet<String>>,
}

impl<S, B> Service<ServiceRequest> for RequireRolesService<S>
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
        let decision = check_roles(req.extensions().get::<AuthContext>(), &self.roles);

        Box::pin(async move {
            if let Err(err) = decision {
                let response = err.error_response();
                return Ok(req.into_response(response).map_into_right_body());
            }

            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(roles: &[&str]) -> AuthContext {
        AuthContext {
            subject: "user-1".to_string(),
            username: None,
            roles: roles.iter().map(|r| r.to_string()).collect(),
        }
    }

    fn required(roles: &[&str]) -> BTreeSet<String> {
        roles.iter().map(|r| r.to_string()).collect()
    }

    #[test]
    fn test_anonymous_is_unauthorized() {
        let result = check_roles(None, &required(&[ROLE_ADMIN]));
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_missing_role_is_forbidden() {
        let result = check_roles(Some(&context(&[ROLE_TEACHER])), &required(&[ROLE_ADMIN]));
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[test]
    fn test_any_matching_role_passes() {
        let staff = required(&[ROLE_ADMIN, ROLE_TEACHER]);

        assert!(check_roles(Some(&context(&[ROLE_TEACHER])), &staff).is_ok());
        assert!(check_roles(Some(&context(&["offline_access", ROLE_ADMIN])), &staff).is_ok());
        assert!(check_roles(Some(&context(&[])), &staff).is_err());
    }
}
