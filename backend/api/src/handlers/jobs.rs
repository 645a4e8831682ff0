/// Jobs board handlers - postings and applications
use super::PaginationParams;
use crate::db::{admin_repo, application_repo, business_repo, job_repo};
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{ApplicationStatus, Job, JobStatus};
use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct JobRequest {
    #[validate(length(min = 1, max = 150))]
    pub title: String,

    #[validate(length(min = 1, max = 10_000))]
    pub description: String,

    pub business_id: Option<Uuid>,

    #[validate(length(max = 100))]
    pub location: Option<String>,

    #[validate(range(min = 0))]
    pub salary_min: Option<i32>,

    #[validate(range(min = 0))]
    pub salary_max: Option<i32>,

    pub expires_at: DateTime<Utc>,
}

impl JobRequest {
    fn check(&self) -> Result<()> {
        self.validate()?;

        if let (Some(min), Some(max)) = (self.salary_min, self.salary_max) {
            if min > max {
                return Err(AppError::Validation(
                    "salary_min cannot exceed salary_max".into(),
                ));
            }
        }

        if self.expires_at <= Utc::now() {
            return Err(AppError::Validation(
                "expires_at must be in the future".into(),
            ));
        }

        Ok(())
    }
}

/// Create a job posting (starts pending)
///
/// A linked business must exist and belong to the caller.
pub async fn create_job(
    pool: web::Data<PgPool>,
    user: AuthUser,
    req: web::Json<JobRequest>,
) -> Result<HttpResponse> {
    req.check()?;

    if let Some(business_id) = req.business_id {
        let business = business_repo::find_by_id(&pool, business_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Business not found".into()))?;
        if business.owner_id != user.0 {
            return Err(AppError::Authorization(
                "Jobs can only be linked to your own business".into(),
            ));
        }
    }

    let job = job_repo::create_job(
        &pool,
        user.0,
        req.business_id,
        &req.title,
        &req.description,
        req.location.as_deref(),
        req.salary_min,
        req.salary_max,
        req.expires_at,
    )
    .await?;

    Ok(HttpResponse::Created().json(job))
}

/// List open jobs (approved and unexpired)
///
/// Expired approved jobs are closed lazily before the query so a stale
/// sweep never leaks them into the listing.
pub async fn list_jobs(
    pool: web::Data<PgPool>,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    let closed = job_repo::close_expired(&pool).await?;
    if closed > 0 {
        tracing::info!(closed, "auto-closed expired jobs before listing");
    }

    let (limit, offset) = query.clamp();
    let jobs = job_repo::list_open(&pool, limit, offset).await?;

    Ok(HttpResponse::Ok().json(jobs))
}

/// Get a job; pending/rejected postings are visible only to the owner
/// and platform admins
pub async fn get_job(
    pool: web::Data<PgPool>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let job = job_repo::find_by_id(&pool, *path)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".into()))?;

    if !visible_to(&pool, &job, user.0).await? {
        return Err(AppError::NotFound("Job not found".into()));
    }

    Ok(HttpResponse::Ok().json(job))
}

/// List the caller's own postings, any status
pub async fn list_my_jobs(
    pool: web::Data<PgPool>,
    user: AuthUser,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    let (limit, offset) = query.clamp();
    let jobs = job_repo::list_by_owner(&pool, user.0, limit, offset).await?;

    Ok(HttpResponse::Ok().json(jobs))
}

/// Owner update; the posting re-enters moderation as pending
///
/// A changed business link goes through the same ownership check as
/// creation.
pub async fn update_job(
    pool: web::Data<PgPool>,
    user: AuthUser,
    path: web::Path<Uuid>,
    req: web::Json<JobRequest>,
) -> Result<HttpResponse> {
    req.check()?;

    let job = job_repo::find_by_id(&pool, *path)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".into()))?;

    if job.owner_id != user.0 {
        return Err(AppError::Authorization(
            "Only the owner may update this job".into(),
        ));
    }

    if let Some(business_id) = req.business_id {
        let business = business_repo::find_by_id(&pool, business_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Business not found".into()))?;
        if business.owner_id != user.0 {
            return Err(AppError::Authorization(
                "Jobs can only be linked to your own business".into(),
            ));
        }
    }

    let updated = job_repo::update_job(
        &pool,
        job.id,
        req.business_id,
        &req.title,
        &req.description,
        req.location.as_deref(),
        req.salary_min,
        req.salary_max,
        req.expires_at,
    )
    .await?
    .ok_or_else(|| AppError::NotFound("Job not found".into()))?;

    Ok(HttpResponse::Ok().json(updated))
}

/// Owner delete
pub async fn delete_job(
    pool: web::Data<PgPool>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let job = job_repo::find_by_id(&pool, *path)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".into()))?;

    if job.owner_id != user.0 {
        return Err(AppError::Authorization(
            "Only the owner may delete this job".into(),
        ));
    }

    job_repo::delete_job(&pool, job.id).await?;

    Ok(HttpResponse::NoContent().finish())
}

#[derive(Debug, Deserialize, Validate)]
pub struct ApplyRequest {
    #[validate(length(max = 4000))]
    pub cover_note: Option<String>,
}

/// Apply to an open job; one application per user per job
pub async fn apply_to_job(
    pool: web::Data<PgPool>,
    user: AuthUser,
    path: web::Path<Uuid>,
    req: web::Json<ApplyRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let job = job_repo::find_by_id(&pool, *path)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".into()))?;

    if job.status != JobStatus::Approved.as_str() || job.is_expired(Utc::now()) {
        return Err(AppError::BadRequest(
            "This job is not open for applications".into(),
        ));
    }

    if job.owner_id == user.0 {
        return Err(AppError::BadRequest("You cannot apply to your own job".into()));
    }

    if application_repo::has_applied(&pool, job.id, user.0).await? {
        return Err(AppError::Conflict("You have already applied to this job".into()));
    }

    let application =
        application_repo::create_application(&pool, job.id, user.0, req.cover_note.as_deref())
            .await?;

    Ok(HttpResponse::Created().json(application))
}

/// List applications for a job; owner only
pub async fn list_applications(
    pool: web::Data<PgPool>,
    user: AuthUser,
    path: web::Path<Uuid>,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    let job = job_repo::find_by_id(&pool, *path)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".into()))?;

    if job.owner_id != user.0 {
        return Err(AppError::Authorization(
            "Only the job owner may review applications".into(),
        ));
    }

    let (limit, offset) = query.clamp();
    let applications = application_repo::list_by_job(&pool, job.id, limit, offset).await?;

    Ok(HttpResponse::Ok().json(applications))
}

/// List the caller's own applications
pub async fn list_my_applications(
    pool: web::Data<PgPool>,
    user: AuthUser,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    let (limit, offset) = query.clamp();
    let applications = application_repo::list_by_applicant(&pool, user.0, limit, offset).await?;

    Ok(HttpResponse::Ok().json(applications))
}

#[derive(Debug, Deserialize)]
pub struct ReviewApplicationRequest {
    pub status: String,
}

/// Set an application's review status; job owner only
pub async fn review_application(
    pool: web::Data<PgPool>,
    user: AuthUser,
    path: web::Path<Uuid>,
    req: web::Json<ReviewApplicationRequest>,
) -> Result<HttpResponse> {
    let status = ApplicationStatus::from_str(&req.status)
        .ok_or_else(|| AppError::Validation("Unknown application status".into()))?;

    let application = application_repo::find_by_id(&pool, *path)
        .await?
        .ok_or_else(|| AppError::NotFound("Application not found".into()))?;

    let job = job_repo::find_by_id(&pool, application.job_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".into()))?;

    if job.owner_id != user.0 {
        return Err(AppError::Authorization(
            "Only the job owner may review applications".into(),
        ));
    }

    application_repo::set_status(&pool, application.id, status.as_str()).await?;

    Ok(HttpResponse::NoContent().finish())
}

async fn visible_to(pool: &PgPool, job: &Job, user_id: Uuid) -> Result<bool> {
    let status = JobStatus::from_str(&job.status);
    if matches!(status, Some(JobStatus::Approved) | Some(JobStatus::Closed))
        || job.owner_id == user_id
    {
        return Ok(true);
    }

    Ok(admin_repo::find_role(pool, user_id).await?.is_some())
}
