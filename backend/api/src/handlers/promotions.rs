/// Promotional content handlers
use super::PaginationParams;
use crate::db::{admin_repo, promotion_repo};
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::Promotion;
use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePromotionRequest {
    #[validate(length(min = 1, max = 150))]
    pub title: String,

    #[validate(length(min = 1, max = 5000))]
    pub body: String,

    #[validate(url)]
    pub image_url: Option<String>,

    #[validate(url)]
    pub link_url: Option<String>,

    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

/// Create promotional content (starts pending)
pub async fn create_promotion(
    pool: web::Data<PgPool>,
    user: AuthUser,
    req: web::Json<CreatePromotionRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    if req.ends_at <= req.starts_at {
        return Err(AppError::Validation("ends_at must be after starts_at".into()));
    }
    if req.ends_at <= Utc::now() {
        return Err(AppError::Validation("active window is already over".into()));
    }

    let promotion = promotion_repo::create_promotion(
        &pool,
        user.0,
        &req.title,
        &req.body,
        req.image_url.as_deref(),
        req.link_url.as_deref(),
        req.starts_at,
        req.ends_at,
    )
    .await?;

    Ok(HttpResponse::Created().json(promotion))
}

/// List approved promotions currently inside their active window
pub async fn list_promotions(
    pool: web::Data<PgPool>,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    let (limit, offset) = query.clamp();
    let promotions = promotion_repo::list_active(&pool, limit, offset).await?;

    Ok(HttpResponse::Ok().json(promotions))
}

/// List the caller's own promotions, any status
pub async fn list_my_promotions(
    pool: web::Data<PgPool>,
    user: AuthUser,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    let (limit, offset) = query.clamp();
    let promotions = promotion_repo::list_by_owner(&pool, user.0, limit, offset).await?;

    Ok(HttpResponse::Ok().json(promotions))
}

/// Get a promotion; inactive or unapproved ones are visible only to
/// their owner and platform admins
pub async fn get_promotion(
    pool: web::Data<PgPool>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let promotion = promotion_repo::find_by_id(&pool, *path)
        .await?
        .ok_or_else(|| AppError::NotFound("Promotion not found".into()))?;

    if !visible_to(&pool, &promotion, user.0).await? {
        return Err(AppError::NotFound("Promotion not found".into()));
    }

    Ok(HttpResponse::Ok().json(promotion))
}

/// Owner delete
pub async fn delete_promotion(
    pool: web::Data<PgPool>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let promotion = promotion_repo::find_by_id(&pool, *path)
        .await?
        .ok_or_else(|| AppError::NotFound("Promotion not found".into()))?;

    if promotion.owner_id != user.0 {
        return Err(AppError::Authorization(
            "Only the owner may delete this promotion".into(),
        ));
    }

    promotion_repo::delete_promotion(&pool, promotion.id).await?;

    Ok(HttpResponse::NoContent().finish())
}

async fn visible_to(pool: &PgPool, promotion: &Promotion, user_id: Uuid) -> Result<bool> {
    if promotion.is_active(Utc::now()) || promotion.owner_id == user_id {
        return Ok(true);
    }

    Ok(admin_repo::find_role(pool, user_id).await?.is_some())
}
