/// Admin moderation panel handlers
///
/// Every handler re-checks the caller's admin role against the
/// admin_roles table; there is no ambient admin state.
use super::PaginationParams;
use crate::db::{
    admin_repo, business_repo, comment_repo, job_repo, post_repo, promotion_repo, user_repo,
};
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{AdminRole, ApprovalStatus};
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

/// Resolve the caller's admin role or fail with 403.
async fn require_admin(pool: &PgPool, user_id: Uuid) -> Result<AdminRole> {
    admin_repo::find_role(pool, user_id)
        .await?
        .and_then(|r| AdminRole::from_str(&r))
        .ok_or_else(|| AppError::Authorization("Admin role required".into()))
}

#[derive(Debug, Deserialize)]
pub struct ModerationQueueParams {
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ModerationQueueParams {
    /// Queue endpoints default to the pending backlog.
    fn status(&self) -> Result<ApprovalStatus> {
        match self.status.as_deref() {
            None => Ok(ApprovalStatus::Pending),
            Some(s) => ApprovalStatus::from_str(s)
                .ok_or_else(|| AppError::Validation("Unknown approval status".into())),
        }
    }

    fn page(&self) -> (i64, i64) {
        PaginationParams {
            limit: self.limit,
            offset: self.offset,
        }
        .clamp()
    }
}

#[derive(Debug, Deserialize)]
pub struct ModerationDecision {
    pub status: String,
}

impl ModerationDecision {
    /// Moderators decide approved or rejected; nothing else.
    fn decision(&self) -> Result<ApprovalStatus> {
        match ApprovalStatus::from_str(&self.status) {
            Some(ApprovalStatus::Approved) => Ok(ApprovalStatus::Approved),
            Some(ApprovalStatus::Rejected) => Ok(ApprovalStatus::Rejected),
            _ => Err(AppError::Validation(
                "Decision must be approved or rejected".into(),
            )),
        }
    }
}

/// List the business moderation queue
pub async fn list_businesses(
    pool: web::Data<PgPool>,
    user: AuthUser,
    query: web::Query<ModerationQueueParams>,
) -> Result<HttpResponse> {
    require_admin(&pool, user.0).await?;

    let (limit, offset) = query.page();
    let businesses =
        business_repo::list_by_status(&pool, query.status()?.as_str(), limit, offset).await?;

    Ok(HttpResponse::Ok().json(businesses))
}

/// Approve or reject a business listing
pub async fn moderate_business(
    pool: web::Data<PgPool>,
    user: AuthUser,
    path: web::Path<Uuid>,
    req: web::Json<ModerationDecision>,
) -> Result<HttpResponse> {
    require_admin(&pool, user.0).await?;

    let decision = req.decision()?;
    let updated = business_repo::set_status(&pool, *path, decision.as_str()).await?;
    if updated == 0 {
        return Err(AppError::NotFound("Business not found".into()));
    }

    tracing::info!(business_id = %path, decision = decision.as_str(), admin = %user.0, "business moderated");

    Ok(HttpResponse::NoContent().finish())
}

/// List the job moderation queue
pub async fn list_jobs(
    pool: web::Data<PgPool>,
    user: AuthUser,
    query: web::Query<ModerationQueueParams>,
) -> Result<HttpResponse> {
    require_admin(&pool, user.0).await?;

    let (limit, offset) = query.page();
    let jobs = job_repo::list_by_status(&pool, query.status()?.as_str(), limit, offset).await?;

    Ok(HttpResponse::Ok().json(jobs))
}

/// Approve or reject a job posting
pub async fn moderate_job(
    pool: web::Data<PgPool>,
    user: AuthUser,
    path: web::Path<Uuid>,
    req: web::Json<ModerationDecision>,
) -> Result<HttpResponse> {
    require_admin(&pool, user.0).await?;

    let decision = req.decision()?;
    let updated = job_repo::set_status(&pool, *path, decision.as_str()).await?;
    if updated == 0 {
        return Err(AppError::NotFound("Job not found".into()));
    }

    tracing::info!(job_id = %path, decision = decision.as_str(), admin = %user.0, "job moderated");

    Ok(HttpResponse::NoContent().finish())
}

/// List the promotion moderation queue
pub async fn list_promotions(
    pool: web::Data<PgPool>,
    user: AuthUser,
    query: web::Query<ModerationQueueParams>,
) -> Result<HttpResponse> {
    require_admin(&pool, user.0).await?;

    let (limit, offset) = query.page();
    let promotions =
        promotion_repo::list_by_status(&pool, query.status()?.as_str(), limit, offset).await?;

    Ok(HttpResponse::Ok().json(promotions))
}

/// Approve or reject promotional content
pub async fn moderate_promotion(
    pool: web::Data<PgPool>,
    user: AuthUser,
    path: web::Path<Uuid>,
    req: web::Json<ModerationDecision>,
) -> Result<HttpResponse> {
    require_admin(&pool, user.0).await?;

    let decision = req.decision()?;
    let updated = promotion_repo::set_status(&pool, *path, decision.as_str()).await?;
    if updated == 0 {
        return Err(AppError::NotFound("Promotion not found".into()));
    }

    Ok(HttpResponse::NoContent().finish())
}

/// Remove any post
pub async fn remove_post(
    pool: web::Data<PgPool>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    require_admin(&pool, user.0).await?;

    let deleted = post_repo::delete_post(&pool, *path).await?;
    if deleted == 0 {
        return Err(AppError::NotFound("Post not found".into()));
    }

    tracing::info!(post_id = %path, admin = %user.0, "post removed by moderation");

    Ok(HttpResponse::NoContent().finish())
}

/// Remove any comment
pub async fn remove_comment(
    pool: web::Data<PgPool>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    require_admin(&pool, user.0).await?;

    let deleted = comment_repo::delete_comment(&pool, *path).await?;
    if deleted == 0 {
        return Err(AppError::NotFound("Comment not found".into()));
    }

    Ok(HttpResponse::NoContent().finish())
}

/// List registered users
pub async fn list_users(
    pool: web::Data<PgPool>,
    user: AuthUser,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    require_admin(&pool, user.0).await?;

    let (limit, offset) = query.clamp();
    let users = user_repo::list_profiles(&pool, limit, offset).await?;

    Ok(HttpResponse::Ok().json(users))
}

#[derive(Debug, Deserialize)]
pub struct GrantRoleRequest {
    pub role: String,
}

/// Grant an admin role to a user; superadmin only
pub async fn grant_role(
    pool: web::Data<PgPool>,
    user: AuthUser,
    path: web::Path<Uuid>,
    req: web::Json<GrantRoleRequest>,
) -> Result<HttpResponse> {
    let caller = require_admin(&pool, user.0).await?;
    if caller != AdminRole::Superadmin {
        return Err(AppError::Authorization(
            "Only superadmins may manage roles".into(),
        ));
    }

    let role = AdminRole::from_str(&req.role)
        .ok_or_else(|| AppError::Validation("Unknown admin role".into()))?;

    let target = user_repo::find_by_id(&pool, *path)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    admin_repo::grant_role(&pool, target.id, role.as_str(), user.0).await?;

    tracing::info!(target = %target.id, role = role.as_str(), admin = %user.0, "admin role granted");

    Ok(HttpResponse::NoContent().finish())
}

/// Revoke a user's admin role; superadmin only
pub async fn revoke_role(
    pool: web::Data<PgPool>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let caller = require_admin(&pool, user.0).await?;
    if caller != AdminRole::Superadmin {
        return Err(AppError::Authorization(
            "Only superadmins may manage roles".into(),
        ));
    }

    if *path == user.0 {
        return Err(AppError::BadRequest(
            "Superadmins cannot revoke their own role".into(),
        ));
    }

    let revoked = admin_repo::revoke_role(&pool, *path).await?;
    if revoked == 0 {
        return Err(AppError::NotFound("User has no admin role".into()));
    }

    Ok(HttpResponse::NoContent().finish())
}
