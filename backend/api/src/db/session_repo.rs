/// Session database operations
use crate::models::Session;
use chrono::{Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Create a new session with the given token and lifetime
pub async fn create_session(
    pool: &PgPool,
    user_id: Uuid,
    token: &str,
    ttl_days: i64,
) -> Result<Session, sqlx::Error> {
    let expires_at = Utc::now() + Duration::days(ttl_days);

    sqlx::query_as::<_, Session>(
        r#"
        INSERT INTO sessions (user_id, token, expires_at)
        VALUES ($1, $2, $3)
        RETURNING id, user_id, token, expires_at, revoked_at, created_at
        "#,
    )
    .bind(user_id)
    .bind(token)
    .bind(expires_at)
    .fetch_one(pool)
    .await
}

/// Resolve a token to its session row, if any
///
/// Liveness (revocation, expiry) is the caller's call via
/// `Session::is_live`.
pub async fn find_by_token(pool: &PgPool, token: &str) -> Result<Option<Session>, sqlx::Error> {
    sqlx::query_as::<_, Session>(
        r#"
        SELECT id, user_id, token, expires_at, revoked_at, created_at
        FROM sessions
        WHERE token = $1
        "#,
    )
    .bind(token)
    .fetch_optional(pool)
    .await
}

/// Revoke the session holding this token (logout)
pub async fn revoke_by_token(pool: &PgPool, token: &str) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE sessions
        SET revoked_at = NOW()
        WHERE token = $1 AND revoked_at IS NULL
        "#,
    )
    .bind(token)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Delete expired sessions (cleanup)
pub async fn cleanup_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM sessions WHERE expires_at < NOW()")
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
