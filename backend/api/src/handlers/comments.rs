/// Comment handlers
use super::PaginationParams;
use crate::db::{admin_repo, comment_repo, post_repo};
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(min = 1, max = 2000))]
    pub content: String,
}

/// Comment on a post
pub async fn create_comment(
    pool: web::Data<PgPool>,
    user: AuthUser,
    path: web::Path<Uuid>,
    req: web::Json<CreateCommentRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let post = post_repo::find_post_by_id(&pool, *path)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".into()))?;

    let comment = comment_repo::create_comment(&pool, post.id, user.0, &req.content).await?;

    Ok(HttpResponse::Created().json(comment))
}

/// List a post's comments, oldest first
pub async fn list_comments(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    let post = post_repo::find_post_by_id(&pool, *path)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".into()))?;

    let (limit, offset) = query.clamp();
    let comments = comment_repo::list_by_post(&pool, post.id, limit, offset).await?;

    Ok(HttpResponse::Ok().json(comments))
}

/// Delete a comment
///
/// Allowed for the comment author, the owner of the post it sits on,
/// and platform admins.
pub async fn delete_comment(
    pool: web::Data<PgPool>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let comment = comment_repo::find_by_id(&pool, *path)
        .await?
        .ok_or_else(|| AppError::NotFound("Comment not found".into()))?;

    let mut allowed = comment.user_id == user.0;

    if !allowed {
        if let Some(post) = post_repo::find_post_by_id(&pool, comment.post_id).await? {
            allowed = post.user_id == user.0;
        }
    }

    if !allowed {
        allowed = admin_repo::find_role(&pool, user.0).await?.is_some();
    }

    if !allowed {
        return Err(AppError::Authorization(
            "Not allowed to delete this comment".into(),
        ));
    }

    comment_repo::delete_comment(&pool, comment.id).await?;

    Ok(HttpResponse::NoContent().finish())
}
