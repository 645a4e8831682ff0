use crate::models::Promotion;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

const PROMOTION_COLUMNS: &str = "id, owner_id, title, body, image_url, link_url, \
                                 starts_at, ends_at, status, created_at, updated_at";

/// Create promotional content; starts pending moderation
pub async fn create_promotion(
    pool: &PgPool,
    owner_id: Uuid,
    title: &str,
    body: &str,
    image_url: Option<&str>,
    link_url: Option<&str>,
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
) -> Result<Promotion, sqlx::Error> {
    let query = format!(
        r#"
        INSERT INTO promotions (owner_id, title, body, image_url, link_url, starts_at, ends_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {PROMOTION_COLUMNS}
        "#
    );

    sqlx::query_as::<_, Promotion>(&query)
        .bind(owner_id)
        .bind(title)
        .bind(body)
        .bind(image_url)
        .bind(link_url)
        .bind(starts_at)
        .bind(ends_at)
        .fetch_one(pool)
        .await
}

/// Find a promotion by ID
pub async fn find_by_id(pool: &PgPool, promotion_id: Uuid) -> Result<Option<Promotion>, sqlx::Error> {
    let query = format!("SELECT {PROMOTION_COLUMNS} FROM promotions WHERE id = $1");

    sqlx::query_as::<_, Promotion>(&query)
        .bind(promotion_id)
        .fetch_optional(pool)
        .await
}

/// List approved promotions whose active window covers now
pub async fn list_active(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Promotion>, sqlx::Error> {
    let query = format!(
        r#"
        SELECT {PROMOTION_COLUMNS}
        FROM promotions
        WHERE status = 'approved' AND starts_at <= NOW() AND ends_at > NOW()
        ORDER BY starts_at DESC
        LIMIT $1 OFFSET $2
        "#
    );

    sqlx::query_as::<_, Promotion>(&query)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}

/// List a user's own promotions regardless of status
pub async fn list_by_owner(
    pool: &PgPool,
    owner_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<Promotion>, sqlx::Error> {
    let query = format!(
        r#"
        SELECT {PROMOTION_COLUMNS}
        FROM promotions
        WHERE owner_id = $1
        ORDER BY created_at DESC
        LIMIT $2 OFFSET $3
        "#
    );

    sqlx::query_as::<_, Promotion>(&query)
        .bind(owner_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}

/// Delete a promotion
pub async fn delete_promotion(pool: &PgPool, promotion_id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM promotions WHERE id = $1")
        .bind(promotion_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// Set the moderation status (admin)
pub async fn set_status(
    pool: &PgPool,
    promotion_id: Uuid,
    status: &str,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE promotions SET status = $2, updated_at = NOW() WHERE id = $1",
    )
    .bind(promotion_id)
    .bind(status)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// List promotions in a given moderation status, oldest first (admin queue)
pub async fn list_by_status(
    pool: &PgPool,
    status: &str,
    limit: i64,
    offset: i64,
) -> Result<Vec<Promotion>, sqlx::Error> {
    let query = format!(
        r#"
        SELECT {PROMOTION_COLUMNS}
        FROM promotions
        WHERE status = $1
        ORDER BY created_at ASC
        LIMIT $2 OFFSET $3
        "#
    );

    sqlx::query_as::<_, Promotion>(&query)
        .bind(status)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}
