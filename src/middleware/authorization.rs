//! Role guards wrapped around scopes and resources.

use std::future::{ready, Ready};
use std::rc::Rc;
use std::sync::Arc;

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use futures::future::{FutureExt, LocalBoxFuture};

use crate::helpers::ApiError;
use crate::middleware::authentication::AuthFailure;
use crate::models::User;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RequireRole {
    admin: bool,
}

impl RequireRole {
    /// Any signed-in user
    pub fn authenticated() -> Self {
        Self { admin: false }
    }

    pub fn admin() -> Self {
        Self { admin: true }
    }

    fn check(&self, req: &ServiceRequest) -> Result<(), ApiError> {
        let extensions = req.extensions();
        let user = match extensions.get::<Arc<User>>() {
            Some(user) => user,
            None => {
                let msg = extensions
                    .get::<AuthFailure>()
                    .map(|failure| failure.0.clone())
                    .unwrap_or_else(|| "Token não fornecido".to_string());
                return Err(ApiError::unauthorized(msg));
            }
        };

        if self.admin && !user.role.is_admin() {
            tracing::warn!(user_id = %user.id, path = %req.path(), "non-admin on admin route");
            return Err(ApiError::forbidden("Acesso negado. Apenas administradores."));
        }
        Ok(())
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleMiddleware {
            service: Rc::new(service),
            guard: *self,
        }))
    }
}

pub struct RequireRoleMiddleware<S> {
    service: Rc<S>,
    guard: RequireRole,
}

impl<S, B> Service<ServiceRequest> for RequireRoleMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<ServiceResponse<B>, Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if let Err(err) = self.guard.check(&req) {
            return async move { Err(err.into()) }.boxed_local();
        }

        self.service.call(req).boxed_local()
    }
}
