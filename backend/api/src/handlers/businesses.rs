/// Business listing handlers
///
/// New and edited listings sit in `pending` until approved by a
/// moderator; only approved listings are publicly visible.
use super::PaginationParams;
use crate::db::{admin_repo, business_repo};
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{ApprovalStatus, Business};
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct BusinessRequest {
    #[validate(length(min = 1, max = 150))]
    pub name: String,

    #[validate(length(min = 1, max = 50))]
    pub category: String,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    #[validate(custom(function = "crate::validators::validate_mobile_number"))]
    pub phone: Option<String>,

    #[validate(email)]
    pub email: Option<String>,

    #[validate(length(max = 300))]
    pub address: Option<String>,
}

/// Create a business listing (starts pending)
pub async fn create_business(
    pool: web::Data<PgPool>,
    user: AuthUser,
    req: web::Json<BusinessRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let business = business_repo::create_business(
        &pool,
        user.0,
        &req.name,
        &req.category,
        req.description.as_deref(),
        req.phone.as_deref(),
        req.email.as_deref(),
        req.address.as_deref(),
    )
    .await?;

    Ok(HttpResponse::Created().json(business))
}

/// Get a listing; unapproved listings are visible only to their owner
/// and platform admins
pub async fn get_business(
    pool: web::Data<PgPool>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let business = business_repo::find_by_id(&pool, *path)
        .await?
        .ok_or_else(|| AppError::NotFound("Business not found".into()))?;

    if !visible_to(&pool, &business, user.0).await? {
        return Err(AppError::NotFound("Business not found".into()));
    }

    Ok(HttpResponse::Ok().json(business))
}

#[derive(Debug, Deserialize)]
pub struct ListBusinessesParams {
    pub category: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// List approved businesses
pub async fn list_businesses(
    pool: web::Data<PgPool>,
    query: web::Query<ListBusinessesParams>,
) -> Result<HttpResponse> {
    let (limit, offset) = PaginationParams {
        limit: query.limit,
        offset: query.offset,
    }
    .clamp();

    let businesses =
        business_repo::list_approved(&pool, query.category.as_deref(), limit, offset).await?;

    Ok(HttpResponse::Ok().json(businesses))
}

/// List the caller's own listings, any status
pub async fn list_my_businesses(
    pool: web::Data<PgPool>,
    user: AuthUser,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    let (limit, offset) = query.clamp();
    let businesses = business_repo::list_by_owner(&pool, user.0, limit, offset).await?;

    Ok(HttpResponse::Ok().json(businesses))
}

/// Owner update; the listing re-enters moderation as pending
pub async fn update_business(
    pool: web::Data<PgPool>,
    user: AuthUser,
    path: web::Path<Uuid>,
    req: web::Json<BusinessRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let business = business_repo::find_by_id(&pool, *path)
        .await?
        .ok_or_else(|| AppError::NotFound("Business not found".into()))?;

    if business.owner_id != user.0 {
        return Err(AppError::Authorization(
            "Only the owner may update this listing".into(),
        ));
    }

    let updated = business_repo::update_business(
        &pool,
        business.id,
        &req.name,
        &req.category,
        req.description.as_deref(),
        req.phone.as_deref(),
        req.email.as_deref(),
        req.address.as_deref(),
    )
    .await?
    .ok_or_else(|| AppError::NotFound("Business not found".into()))?;

    Ok(HttpResponse::Ok().json(updated))
}

/// Owner delete
pub async fn delete_business(
    pool: web::Data<PgPool>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let business = business_repo::find_by_id(&pool, *path)
        .await?
        .ok_or_else(|| AppError::NotFound("Business not found".into()))?;

    if business.owner_id != user.0 {
        return Err(AppError::Authorization(
            "Only the owner may delete this listing".into(),
        ));
    }

    business_repo::delete_business(&pool, business.id).await?;

    Ok(HttpResponse::NoContent().finish())
}

async fn visible_to(pool: &PgPool, business: &Business, user_id: Uuid) -> Result<bool> {
    if business.status == ApprovalStatus::Approved.as_str() || business.owner_id == user_id {
        return Ok(true);
    }

    Ok(admin_repo::find_role(pool, user_id).await?.is_some())
}
