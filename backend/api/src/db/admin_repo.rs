/// Admin role database operations
use sqlx::PgPool;
use uuid::Uuid;

/// Look up the platform admin role for a user, if any
pub async fn find_role(pool: &PgPool, user_id: Uuid) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>("SELECT role FROM admin_roles WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

/// Grant (or change) a user's admin role
pub async fn grant_role(
    pool: &PgPool,
    user_id: Uuid,
    role: &str,
    granted_by: Uuid,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO admin_roles (user_id, role, granted_by)
        VALUES ($1, $2, $3)
        ON CONFLICT (user_id) DO UPDATE SET role = $2, granted_by = $3
        "#,
    )
    .bind(user_id)
    .bind(role)
    .bind(granted_by)
    .execute(pool)
    .await?;

    Ok(())
}

/// Revoke a user's admin role
pub async fn revoke_role(pool: &PgPool, user_id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM admin_roles WHERE user_id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
