/// Profile handlers
use crate::db::user_repo;
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::UserProfile;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// Get the caller's own profile
pub async fn get_me(pool: web::Data<PgPool>, user: AuthUser) -> Result<HttpResponse> {
    let me = user_repo::find_by_id(&pool, user.0)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    Ok(HttpResponse::Ok().json(UserProfile::from(me)))
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100))]
    pub display_name: String,

    #[validate(length(max = 500))]
    pub bio: Option<String>,

    #[validate(url)]
    pub avatar_url: Option<String>,

    #[validate(length(max = 100))]
    pub location: Option<String>,
}

/// Update the caller's own profile
pub async fn update_me(
    pool: web::Data<PgPool>,
    user: AuthUser,
    req: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let updated = user_repo::update_profile(
        &pool,
        user.0,
        &req.display_name,
        req.bio.as_deref(),
        req.avatar_url.as_deref(),
        req.location.as_deref(),
    )
    .await?
    .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    Ok(HttpResponse::Ok().json(UserProfile::from(updated)))
}

/// Get another user's public profile
pub async fn get_profile(pool: web::Data<PgPool>, path: web::Path<Uuid>) -> Result<HttpResponse> {
    let user = user_repo::find_by_id(&pool, *path)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    Ok(HttpResponse::Ok().json(UserProfile::from(user)))
}
