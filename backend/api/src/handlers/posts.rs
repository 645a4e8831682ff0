/// Post handlers - posts and likes
use super::PaginationParams;
use crate::db::{admin_repo, community_repo, post_repo};
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{CommunityRole, PostingPolicy};
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(length(min = 1, max = 5000))]
    pub content: String,

    #[validate(url)]
    pub image_url: Option<String>,

    pub community_id: Option<Uuid>,
}

/// Create a post, optionally inside a community
///
/// Community posts require membership and a posting policy that allows
/// the member's role.
pub async fn create_post(
    pool: web::Data<PgPool>,
    user: AuthUser,
    req: web::Json<CreatePostRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    if let Some(community_id) = req.community_id {
        let community = community_repo::find_by_id(&pool, community_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Community not found".into()))?;

        let role = community_repo::find_member_role(&pool, community_id, user.0)
            .await?
            .and_then(|r| CommunityRole::from_str(&r))
            .ok_or_else(|| {
                AppError::Authorization("Join the community before posting".into())
            })?;

        let policy = PostingPolicy::from_str(&community.posting_policy)
            .unwrap_or(PostingPolicy::Everyone);
        if !policy.allows_posting(role) {
            return Err(AppError::Authorization(
                "Only moderators may post in this community".into(),
            ));
        }
    }

    let post = post_repo::create_post(
        &pool,
        user.0,
        req.community_id,
        &req.content,
        req.image_url.as_deref(),
    )
    .await?;

    Ok(HttpResponse::Created().json(post))
}

/// Get a post with its like/comment counts
pub async fn get_post(pool: web::Data<PgPool>, path: web::Path<Uuid>) -> Result<HttpResponse> {
    let post = post_repo::get_post_with_counts(&pool, *path)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".into()))?;

    Ok(HttpResponse::Ok().json(post))
}

#[derive(Debug, Deserialize)]
pub struct ListPostsParams {
    pub community_id: Option<Uuid>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// List recent posts, newest first, optionally scoped to a community
pub async fn list_posts(
    pool: web::Data<PgPool>,
    query: web::Query<ListPostsParams>,
) -> Result<HttpResponse> {
    let (limit, offset) = PaginationParams {
        limit: query.limit,
        offset: query.offset,
    }
    .clamp();
    let posts = post_repo::list_recent(&pool, query.community_id, limit, offset).await?;

    Ok(HttpResponse::Ok().json(posts))
}

/// List a user's posts
pub async fn get_user_posts(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    let (limit, offset) = query.clamp();
    let posts = post_repo::list_by_user(&pool, *path, limit, offset).await?;

    Ok(HttpResponse::Ok().json(posts))
}

/// Delete a post; allowed for the author or a platform admin
pub async fn delete_post(
    pool: web::Data<PgPool>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let post = post_repo::find_post_by_id(&pool, *path)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".into()))?;

    if post.user_id != user.0 {
        let is_admin = admin_repo::find_role(&pool, user.0).await?.is_some();
        if !is_admin {
            return Err(AppError::Authorization(
                "Only the author may delete this post".into(),
            ));
        }
    }

    post_repo::delete_post(&pool, post.id).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// Like a post; liking twice is a no-op
pub async fn like_post(
    pool: web::Data<PgPool>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let post = post_repo::find_post_by_id(&pool, *path)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".into()))?;

    post_repo::like_post(&pool, post.id, user.0).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// Remove a like
pub async fn unlike_post(
    pool: web::Data<PgPool>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    post_repo::unlike_post(&pool, *path, user.0).await?;

    Ok(HttpResponse::NoContent().finish())
}
