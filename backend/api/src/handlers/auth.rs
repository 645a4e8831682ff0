/// Auth handlers - registration, login, logout
use crate::config::SessionConfig;
use crate::db::{session_repo, user_repo};
use crate::error::{AppError, Result};
use crate::middleware::SessionToken;
use crate::models::UserProfile;
use crate::security;
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(custom(function = "crate::validators::validate_mobile_number"))]
    pub mobile_number: String,

    #[validate(
        length(min = 3, max = 32),
        custom(function = "crate::validators::validate_username_shape")
    )]
    pub username: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,

    #[validate(length(min = 1, max = 100))]
    pub display_name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(custom(function = "crate::validators::validate_mobile_number"))]
    pub mobile_number: String,

    #[validate(length(min = 1, max = 256))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserProfile,
}

/// Register a new account with mobile number and password
pub async fn register(
    pool: web::Data<PgPool>,
    req: web::Json<RegisterRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    if user_repo::identity_taken(&pool, &req.mobile_number, &req.username).await? {
        return Err(AppError::Conflict(
            "Mobile number or username already registered".into(),
        ));
    }

    let password_hash = security::hash_password(&req.password)?;
    let user = user_repo::create_user(
        &pool,
        &req.mobile_number,
        &req.username,
        &password_hash,
        &req.display_name,
    )
    .await?;

    Ok(HttpResponse::Created().json(UserProfile::from(user)))
}

/// Log in and receive an opaque session token
pub async fn login(
    pool: web::Data<PgPool>,
    session_cfg: web::Data<SessionConfig>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let user = user_repo::find_by_mobile(&pool, &req.mobile_number)
        .await?
        .ok_or_else(|| AppError::Authentication("Invalid mobile number or password".into()))?;

    if !security::verify_password(&req.password, &user.password_hash)? {
        return Err(AppError::Authentication(
            "Invalid mobile number or password".into(),
        ));
    }

    let token = security::generate_session_token();
    session_repo::create_session(&pool, user.id, &token, session_cfg.ttl_days).await?;

    tracing::info!(user_id = %user.id, "user logged in");

    Ok(HttpResponse::Ok().json(AuthResponse {
        token,
        user: UserProfile::from(user),
    }))
}

/// Revoke the current session
pub async fn logout(pool: web::Data<PgPool>, token: SessionToken) -> Result<HttpResponse> {
    session_repo::revoke_by_token(&pool, &token.0).await?;
    Ok(HttpResponse::NoContent().finish())
}
