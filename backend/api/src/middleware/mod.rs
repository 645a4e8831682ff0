/// HTTP middleware for the townsquare API
///
/// Authentication resolves an opaque bearer token to a live session row
/// and stashes the user id in request extensions; handlers pull it back
/// out through the `AuthUser` extractor.
use crate::db::session_repo;
use crate::error::AppError;
use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{web, Error, FromRequest, HttpMessage, HttpRequest, ResponseError};
use chrono::Utc;
use futures::future::LocalBoxFuture;
use sqlx::PgPool;
use std::future::{ready, Ready};
use std::rc::Rc;
use uuid::Uuid;

/// Authenticated user id stored in request extensions after session lookup.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Uuid);

/// Actix middleware that validates `Authorization: Bearer <token>`
/// against the sessions table.
pub struct SessionAuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for SessionAuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionAuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionAuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct SessionAuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for SessionAuthMiddlewareService<S>
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
        let service = self.service.clone();
        let pool = req.app_data::<web::Data<PgPool>>().cloned();

        Box::pin(async move {
            let outcome: Result<Uuid, AppError> = async {
                let pool = pool.ok_or_else(|| {
                    AppError::Internal("database pool not configured".into())
                })?;

                let token = bearer_token(&req).ok_or_else(|| {
                    AppError::Authentication(
                        "Missing or malformed Authorization header".into(),
                    )
                })?;

                let session = session_repo::find_by_token(pool.get_ref(), &token)
                    .await
                    .map_err(AppError::from)?
                    .filter(|s| s.is_live(Utc::now()))
                    .ok_or_else(|| {
                        AppError::Authentication("Invalid or expired session".into())
                    })?;

                Ok(session.user_id)
            }
            .await;

            match outcome {
                Ok(user_id) => {
                    req.extensions_mut().insert(AuthUser(user_id));
                    service
                        .call(req)
                        .await
                        .map(|res| res.map_into_left_body())
                }
                // Convert the error to its response here so the 401/500
                // envelope is visible at the service boundary too, not
                // only after the HTTP dispatcher's conversion.
                Err(err) => {
                    let res = err.error_response().map_into_right_body();
                    Ok(req.into_response(res))
                }
            }
        })
    }
}

/// Pull the bearer token out of the Authorization header.
fn bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|t| t.to_string())
}

impl FromRequest for AuthUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<AuthUser>()
                .copied()
                .ok_or_else(|| {
                    Error::from(AppError::Authentication("Not authenticated".into()))
                }),
        )
    }
}

/// The raw bearer token itself, needed by logout to revoke the session.
#[derive(Debug, Clone)]
pub struct SessionToken(pub String);

impl FromRequest for SessionToken {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let token = req
            .headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(|t| t.to_string());

        ready(token.map(SessionToken).ok_or_else(|| {
            Error::from(AppError::Authentication(
                "Missing or malformed Authorization header".into(),
            ))
        }))
    }
}
