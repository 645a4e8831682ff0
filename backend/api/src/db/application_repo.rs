use crate::models::JobApplication;
use sqlx::PgPool;
use uuid::Uuid;

const APPLICATION_COLUMNS: &str =
    "id, job_id, applicant_id, cover_note, status, created_at, updated_at";

/// Create an application; uniqueness of (job, applicant) is enforced
/// by the schema, callers check first to return a clean conflict.
pub async fn create_application(
    pool: &PgPool,
    job_id: Uuid,
    applicant_id: Uuid,
    cover_note: Option<&str>,
) -> Result<JobApplication, sqlx::Error> {
    let query = format!(
        r#"
        INSERT INTO job_applications (job_id, applicant_id, cover_note)
        VALUES ($1, $2, $3)
        RETURNING {APPLICATION_COLUMNS}
        "#
    );

    sqlx::query_as::<_, JobApplication>(&query)
        .bind(job_id)
        .bind(applicant_id)
        .bind(cover_note)
        .fetch_one(pool)
        .await
}

/// Check whether a user already applied to a job
pub async fn has_applied(
    pool: &PgPool,
    job_id: Uuid,
    applicant_id: Uuid,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM job_applications WHERE job_id = $1 AND applicant_id = $2)",
    )
    .bind(job_id)
    .bind(applicant_id)
    .fetch_one(pool)
    .await
}

/// Find an application by ID
pub async fn find_by_id(
    pool: &PgPool,
    application_id: Uuid,
) -> Result<Option<JobApplication>, sqlx::Error> {
    let query = format!("SELECT {APPLICATION_COLUMNS} FROM job_applications WHERE id = $1");

    sqlx::query_as::<_, JobApplication>(&query)
        .bind(application_id)
        .fetch_optional(pool)
        .await
}

/// List applications for a job, oldest first (owner review)
pub async fn list_by_job(
    pool: &PgPool,
    job_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<JobApplication>, sqlx::Error> {
    let query = format!(
        r#"
        SELECT {APPLICATION_COLUMNS}
        FROM job_applications
        WHERE job_id = $1
        ORDER BY created_at ASC
        LIMIT $2 OFFSET $3
        "#
    );

    sqlx::query_as::<_, JobApplication>(&query)
        .bind(job_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}

/// List a user's own applications, newest first
pub async fn list_by_applicant(
    pool: &PgPool,
    applicant_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<JobApplication>, sqlx::Error> {
    let query = format!(
        r#"
        SELECT {APPLICATION_COLUMNS}
        FROM job_applications
        WHERE applicant_id = $1
        ORDER BY created_at DESC
        LIMIT $2 OFFSET $3
        "#
    );

    sqlx::query_as::<_, JobApplication>(&query)
        .bind(applicant_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}

/// Set the review status of an application
pub async fn set_status(
    pool: &PgPool,
    application_id: Uuid,
    status: &str,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE job_applications SET status = $2, updated_at = NOW() WHERE id = $1",
    )
    .bind(application_id)
    .bind(status)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}
