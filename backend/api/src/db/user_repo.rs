use crate::models::{User, UserProfile};
use sqlx::PgPool;
use uuid::Uuid;

/// Create a new user with a pre-hashed password
pub async fn create_user(
    pool: &PgPool,
    mobile_number: &str,
    username: &str,
    password_hash: &str,
    display_name: &str,
) -> Result<User, sqlx::Error> {
    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (mobile_number, username, password_hash, display_name)
        VALUES ($1, $2, $3, $4)
        RETURNING id, mobile_number, username, password_hash, display_name,
                  bio, avatar_url, location, created_at, updated_at
        "#,
    )
    .bind(mobile_number)
    .bind(username)
    .bind(password_hash)
    .bind(display_name)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

/// Find a user by mobile number (login lookup)
pub async fn find_by_mobile(pool: &PgPool, mobile_number: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, mobile_number, username, password_hash, display_name,
               bio, avatar_url, location, created_at, updated_at
        FROM users
        WHERE mobile_number = $1
        "#,
    )
    .bind(mobile_number)
    .fetch_optional(pool)
    .await
}

/// Find a user by ID
pub async fn find_by_id(pool: &PgPool, user_id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, mobile_number, username, password_hash, display_name,
               bio, avatar_url, location, created_at, updated_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// Check whether a mobile number or username is already taken
pub async fn identity_taken(
    pool: &PgPool,
    mobile_number: &str,
    username: &str,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM users WHERE mobile_number = $1 OR username = $2)",
    )
    .bind(mobile_number)
    .bind(username)
    .fetch_one(pool)
    .await
}

/// Update the caller's own profile fields
pub async fn update_profile(
    pool: &PgPool,
    user_id: Uuid,
    display_name: &str,
    bio: Option<&str>,
    avatar_url: Option<&str>,
    location: Option<&str>,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET display_name = $2, bio = $3, avatar_url = $4, location = $5, updated_at = NOW()
        WHERE id = $1
        RETURNING id, mobile_number, username, password_hash, display_name,
                  bio, avatar_url, location, created_at, updated_at
        "#,
    )
    .bind(user_id)
    .bind(display_name)
    .bind(bio)
    .bind(avatar_url)
    .bind(location)
    .fetch_optional(pool)
    .await
}

/// List user profiles, newest first (admin panel)
pub async fn list_profiles(
    pool: &PgPool,
    limit: i64,
    offset: i64,
) -> Result<Vec<UserProfile>, sqlx::Error> {
    sqlx::query_as::<_, UserProfile>(
        r#"
        SELECT id, username, display_name, bio, avatar_url, location, created_at
        FROM users
        ORDER BY created_at DESC
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}
