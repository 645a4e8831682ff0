use crate::models::{Community, CommunityMember};
use sqlx::PgPool;
use uuid::Uuid;

/// Create a community and enroll the creator as its owner, atomically
pub async fn create_community(
    pool: &PgPool,
    name: &str,
    description: Option<&str>,
    posting_policy: &str,
    created_by: Uuid,
) -> Result<Community, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let community = sqlx::query_as::<_, Community>(
        r#"
        INSERT INTO communities (name, description, posting_policy, created_by)
        VALUES ($1, $2, $3, $4)
        RETURNING id, name, description, posting_policy, created_by, created_at, updated_at
        "#,
    )
    .bind(name)
    .bind(description)
    .bind(posting_policy)
    .bind(created_by)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO community_members (community_id, user_id, role)
        VALUES ($1, $2, 'owner')
        "#,
    )
    .bind(community.id)
    .bind(created_by)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(community)
}

/// Find a community by ID
pub async fn find_by_id(pool: &PgPool, community_id: Uuid) -> Result<Option<Community>, sqlx::Error> {
    sqlx::query_as::<_, Community>(
        r#"
        SELECT id, name, description, posting_policy, created_by, created_at, updated_at
        FROM communities
        WHERE id = $1
        "#,
    )
    .bind(community_id)
    .fetch_optional(pool)
    .await
}

/// Check whether a community name is already taken
pub async fn name_taken(pool: &PgPool, name: &str) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM communities WHERE name = $1)")
        .bind(name)
        .fetch_one(pool)
        .await
}

/// List communities alphabetically
pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Community>, sqlx::Error> {
    sqlx::query_as::<_, Community>(
        r#"
        SELECT id, name, description, posting_policy, created_by, created_at, updated_at
        FROM communities
        ORDER BY name ASC
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

/// Update community settings
pub async fn update_community(
    pool: &PgPool,
    community_id: Uuid,
    description: Option<&str>,
    posting_policy: &str,
) -> Result<Option<Community>, sqlx::Error> {
    sqlx::query_as::<_, Community>(
        r#"
        UPDATE communities
        SET description = $2, posting_policy = $3, updated_at = NOW()
        WHERE id = $1
        RETURNING id, name, description, posting_policy, created_by, created_at, updated_at
        "#,
    )
    .bind(community_id)
    .bind(description)
    .bind(posting_policy)
    .fetch_optional(pool)
    .await
}

/// Look up a user's membership role in a community, if any
pub async fn find_member_role(
    pool: &PgPool,
    community_id: Uuid,
    user_id: Uuid,
) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>(
        "SELECT role FROM community_members WHERE community_id = $1 AND user_id = $2",
    )
    .bind(community_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// Add a member; joining twice is a no-op
pub async fn add_member(
    pool: &PgPool,
    community_id: Uuid,
    user_id: Uuid,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO community_members (community_id, user_id, role)
        VALUES ($1, $2, 'member')
        ON CONFLICT (community_id, user_id) DO NOTHING
        "#,
    )
    .bind(community_id)
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Remove a member
pub async fn remove_member(
    pool: &PgPool,
    community_id: Uuid,
    user_id: Uuid,
) -> Result<u64, sqlx::Error> {
    let result =
        sqlx::query("DELETE FROM community_members WHERE community_id = $1 AND user_id = $2")
            .bind(community_id)
            .bind(user_id)
            .execute(pool)
            .await?;

    Ok(result.rows_affected())
}

/// Change a member's role
pub async fn update_member_role(
    pool: &PgPool,
    community_id: Uuid,
    user_id: Uuid,
    role: &str,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE community_members
        SET role = $3
        WHERE community_id = $1 AND user_id = $2
        "#,
    )
    .bind(community_id)
    .bind(user_id)
    .bind(role)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// List members with usernames, owners first then by join date
pub async fn list_members(
    pool: &PgPool,
    community_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<CommunityMember>, sqlx::Error> {
    sqlx::query_as::<_, CommunityMember>(
        r#"
        SELECT m.community_id, m.user_id, u.username, m.role, m.joined_at
        FROM community_members m
        JOIN users u ON u.id = m.user_id
        WHERE m.community_id = $1
        ORDER BY CASE m.role WHEN 'owner' THEN 0 WHEN 'moderator' THEN 1 ELSE 2 END,
                 m.joined_at ASC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(community_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}
