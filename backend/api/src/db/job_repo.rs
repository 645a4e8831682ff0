use crate::models::Job;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

const JOB_COLUMNS: &str = "id, owner_id, business_id, title, description, location, \
                           salary_min, salary_max, expires_at, status, created_at, updated_at";

/// Create a job posting; new jobs start pending moderation
#[allow(clippy::too_many_arguments)]
pub async fn create_job(
    pool: &PgPool,
    owner_id: Uuid,
    business_id: Option<Uuid>,
    title: &str,
    description: &str,
    location: Option<&str>,
    salary_min: Option<i32>,
    salary_max: Option<i32>,
    expires_at: DateTime<Utc>,
) -> Result<Job, sqlx::Error> {
    let query = format!(
        r#"
        INSERT INTO jobs (owner_id, business_id, title, description, location,
                          salary_min, salary_max, expires_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING {JOB_COLUMNS}
        "#
    );

    sqlx::query_as::<_, Job>(&query)
        .bind(owner_id)
        .bind(business_id)
        .bind(title)
        .bind(description)
        .bind(location)
        .bind(salary_min)
        .bind(salary_max)
        .bind(expires_at)
        .fetch_one(pool)
        .await
}

/// Find a job by ID
pub async fn find_by_id(pool: &PgPool, job_id: Uuid) -> Result<Option<Job>, sqlx::Error> {
    let query = format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = $1");

    sqlx::query_as::<_, Job>(&query)
        .bind(job_id)
        .fetch_optional(pool)
        .await
}

/// Transition approved jobs past their expiry to closed
///
/// Called both by the background sweep and lazily before public
/// listing, so closure never depends on traffic alone.
pub async fn close_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE jobs
        SET status = 'closed', updated_at = NOW()
        WHERE status = 'approved' AND expires_at <= NOW()
        "#,
    )
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// List approved, unexpired jobs, newest first
pub async fn list_open(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Job>, sqlx::Error> {
    let query = format!(
        r#"
        SELECT {JOB_COLUMNS}
        FROM jobs
        WHERE status = 'approved' AND expires_at > NOW()
        ORDER BY created_at DESC
        LIMIT $1 OFFSET $2
        "#
    );

    sqlx::query_as::<_, Job>(&query)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}

/// List a user's own jobs regardless of status
pub async fn list_by_owner(
    pool: &PgPool,
    owner_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<Job>, sqlx::Error> {
    let query = format!(
        r#"
        SELECT {JOB_COLUMNS}
        FROM jobs
        WHERE owner_id = $1
        ORDER BY created_at DESC
        LIMIT $2 OFFSET $3
        "#
    );

    sqlx::query_as::<_, Job>(&query)
        .bind(owner_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}

/// Owner update; edits re-enter moderation as pending
#[allow(clippy::too_many_arguments)]
pub async fn update_job(
    pool: &PgPool,
    job_id: Uuid,
    business_id: Option<Uuid>,
    title: &str,
    description: &str,
    location: Option<&str>,
    salary_min: Option<i32>,
    salary_max: Option<i32>,
    expires_at: DateTime<Utc>,
) -> Result<Option<Job>, sqlx::Error> {
    let query = format!(
        r#"
        UPDATE jobs
        SET business_id = $2, title = $3, description = $4, location = $5,
            salary_min = $6, salary_max = $7, expires_at = $8,
            status = 'pending', updated_at = NOW()
        WHERE id = $1
        RETURNING {JOB_COLUMNS}
        "#
    );

    sqlx::query_as::<_, Job>(&query)
        .bind(job_id)
        .bind(business_id)
        .bind(title)
        .bind(description)
        .bind(location)
        .bind(salary_min)
        .bind(salary_max)
        .bind(expires_at)
        .fetch_optional(pool)
        .await
}

/// Delete a job posting
pub async fn delete_job(pool: &PgPool, job_id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
        .bind(job_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// Set the moderation status (admin)
pub async fn set_status(pool: &PgPool, job_id: Uuid, status: &str) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("UPDATE jobs SET status = $2, updated_at = NOW() WHERE id = $1")
        .bind(job_id)
        .bind(status)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// List jobs in a given moderation status, oldest first (admin queue)
pub async fn list_by_status(
    pool: &PgPool,
    status: &str,
    limit: i64,
    offset: i64,
) -> Result<Vec<Job>, sqlx::Error> {
    let query = format!(
        r#"
        SELECT {JOB_COLUMNS}
        FROM jobs
        WHERE status = $1
        ORDER BY created_at ASC
        LIMIT $2 OFFSET $3
        "#
    );

    sqlx::query_as::<_, Job>(&query)
        .bind(status)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}
