use crate::models::{Post, PostWithCounts};
use sqlx::PgPool;
use uuid::Uuid;

const POST_WITH_COUNTS: &str = r#"
    SELECT p.id, p.user_id, u.username AS author_username, p.community_id,
           p.content, p.image_url,
           (SELECT COUNT(*) FROM post_likes pl WHERE pl.post_id = p.id) AS like_count,
           (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id) AS comment_count,
           p.created_at, p.updated_at
    FROM posts p
    JOIN users u ON u.id = p.user_id
"#;

/// Create a new post
pub async fn create_post(
    pool: &PgPool,
    user_id: Uuid,
    community_id: Option<Uuid>,
    content: &str,
    image_url: Option<&str>,
) -> Result<Post, sqlx::Error> {
    sqlx::query_as::<_, Post>(
        r#"
        INSERT INTO posts (user_id, community_id, content, image_url)
        VALUES ($1, $2, $3, $4)
        RETURNING id, user_id, community_id, content, image_url, created_at, updated_at
        "#,
    )
    .bind(user_id)
    .bind(community_id)
    .bind(content)
    .bind(image_url)
    .fetch_one(pool)
    .await
}

/// Find a post by ID
pub async fn find_post_by_id(pool: &PgPool, post_id: Uuid) -> Result<Option<Post>, sqlx::Error> {
    sqlx::query_as::<_, Post>(
        r#"
        SELECT id, user_id, community_id, content, image_url, created_at, updated_at
        FROM posts
        WHERE id = $1
        "#,
    )
    .bind(post_id)
    .fetch_optional(pool)
    .await
}

/// Get a post with its like/comment counts
pub async fn get_post_with_counts(
    pool: &PgPool,
    post_id: Uuid,
) -> Result<Option<PostWithCounts>, sqlx::Error> {
    let query = format!("{POST_WITH_COUNTS} WHERE p.id = $1");

    sqlx::query_as::<_, PostWithCounts>(&query)
        .bind(post_id)
        .fetch_optional(pool)
        .await
}

/// List recent posts, newest first, optionally scoped to a community
pub async fn list_recent(
    pool: &PgPool,
    community_id: Option<Uuid>,
    limit: i64,
    offset: i64,
) -> Result<Vec<PostWithCounts>, sqlx::Error> {
    let query = format!(
        r#"{POST_WITH_COUNTS}
        WHERE ($1::uuid IS NULL AND p.community_id IS NULL) OR p.community_id = $1
        ORDER BY p.created_at DESC
        LIMIT $2 OFFSET $3"#
    );

    sqlx::query_as::<_, PostWithCounts>(&query)
        .bind(community_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}

/// List a user's posts, newest first
pub async fn list_by_user(
    pool: &PgPool,
    user_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<PostWithCounts>, sqlx::Error> {
    let query = format!(
        r#"{POST_WITH_COUNTS}
        WHERE p.user_id = $1
        ORDER BY p.created_at DESC
        LIMIT $2 OFFSET $3"#
    );

    sqlx::query_as::<_, PostWithCounts>(&query)
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}

/// Delete a post; likes and comments cascade
pub async fn delete_post(pool: &PgPool, post_id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM posts WHERE id = $1")
        .bind(post_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// Like a post; the composite key makes repeat likes no-ops
pub async fn like_post(pool: &PgPool, post_id: Uuid, user_id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO post_likes (post_id, user_id)
        VALUES ($1, $2)
        ON CONFLICT (post_id, user_id) DO NOTHING
        "#,
    )
    .bind(post_id)
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Remove a like
pub async fn unlike_post(pool: &PgPool, post_id: Uuid, user_id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM post_likes WHERE post_id = $1 AND user_id = $2")
        .bind(post_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
