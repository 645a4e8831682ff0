use crate::models::Business;
use sqlx::PgPool;
use uuid::Uuid;

const BUSINESS_COLUMNS: &str = "id, owner_id, name, category, description, phone, email, \
                                address, status, created_at, updated_at";

/// Create a business listing; new listings start pending moderation
pub async fn create_business(
    pool: &PgPool,
    owner_id: Uuid,
    name: &str,
    category: &str,
    description: Option<&str>,
    phone: Option<&str>,
    email: Option<&str>,
    address: Option<&str>,
) -> Result<Business, sqlx::Error> {
    let query = format!(
        r#"
        INSERT INTO businesses (owner_id, name, category, description, phone, email, address)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {BUSINESS_COLUMNS}
        "#
    );

    sqlx::query_as::<_, Business>(&query)
        .bind(owner_id)
        .bind(name)
        .bind(category)
        .bind(description)
        .bind(phone)
        .bind(email)
        .bind(address)
        .fetch_one(pool)
        .await
}

/// Find a business by ID
pub async fn find_by_id(pool: &PgPool, business_id: Uuid) -> Result<Option<Business>, sqlx::Error> {
    let query = format!("SELECT {BUSINESS_COLUMNS} FROM businesses WHERE id = $1");

    sqlx::query_as::<_, Business>(&query)
        .bind(business_id)
        .fetch_optional(pool)
        .await
}

/// List approved businesses, newest first, optionally filtered by category
pub async fn list_approved(
    pool: &PgPool,
    category: Option<&str>,
    limit: i64,
    offset: i64,
) -> Result<Vec<Business>, sqlx::Error> {
    let query = format!(
        r#"
        SELECT {BUSINESS_COLUMNS}
        FROM businesses
        WHERE status = 'approved' AND ($1::varchar IS NULL OR category = $1)
        ORDER BY created_at DESC
        LIMIT $2 OFFSET $3
        "#
    );

    sqlx::query_as::<_, Business>(&query)
        .bind(category)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}

/// List a user's own listings regardless of status
pub async fn list_by_owner(
    pool: &PgPool,
    owner_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<Business>, sqlx::Error> {
    let query = format!(
        r#"
        SELECT {BUSINESS_COLUMNS}
        FROM businesses
        WHERE owner_id = $1
        ORDER BY created_at DESC
        LIMIT $2 OFFSET $3
        "#
    );

    sqlx::query_as::<_, Business>(&query)
        .bind(owner_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}

/// Owner update; edits re-enter moderation as pending
pub async fn update_business(
    pool: &PgPool,
    business_id: Uuid,
    name: &str,
    category: &str,
    description: Option<&str>,
    phone: Option<&str>,
    email: Option<&str>,
    address: Option<&str>,
) -> Result<Option<Business>, sqlx::Error> {
    let query = format!(
        r#"
        UPDATE businesses
        SET name = $2, category = $3, description = $4, phone = $5, email = $6,
            address = $7, status = 'pending', updated_at = NOW()
        WHERE id = $1
        RETURNING {BUSINESS_COLUMNS}
        "#
    );

    sqlx::query_as::<_, Business>(&query)
        .bind(business_id)
        .bind(name)
        .bind(category)
        .bind(description)
        .bind(phone)
        .bind(email)
        .bind(address)
        .fetch_optional(pool)
        .await
}

/// Delete a listing
pub async fn delete_business(pool: &PgPool, business_id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM businesses WHERE id = $1")
        .bind(business_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// Set the moderation status (admin)
pub async fn set_status(
    pool: &PgPool,
    business_id: Uuid,
    status: &str,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE businesses SET status = $2, updated_at = NOW() WHERE id = $1",
    )
    .bind(business_id)
    .bind(status)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// List listings in a given moderation status, oldest first (admin queue)
pub async fn list_by_status(
    pool: &PgPool,
    status: &str,
    limit: i64,
    offset: i64,
) -> Result<Vec<Business>, sqlx::Error> {
    let query = format!(
        r#"
        SELECT {BUSINESS_COLUMNS}
        FROM businesses
        WHERE status = $1
        ORDER BY created_at ASC
        LIMIT $2 OFFSET $3
        "#
    );

    sqlx::query_as::<_, Business>(&query)
        .bind(status)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}
