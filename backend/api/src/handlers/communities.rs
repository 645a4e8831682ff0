/// Community handlers - communities, membership, permissions
use super::PaginationParams;
use crate::db::community_repo;
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{CommunityRole, PostingPolicy};
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommunityRequest {
    #[validate(length(min = 3, max = 100))]
    pub name: String,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    pub posting_policy: Option<String>,
}

/// Create a community; the creator becomes its owner member
pub async fn create_community(
    pool: web::Data<PgPool>,
    user: AuthUser,
    req: web::Json<CreateCommunityRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let policy = parse_policy(req.posting_policy.as_deref())?;

    if community_repo::name_taken(&pool, &req.name).await? {
        return Err(AppError::Conflict("Community name already taken".into()));
    }

    let community = community_repo::create_community(
        &pool,
        &req.name,
        req.description.as_deref(),
        policy.as_str(),
        user.0,
    )
    .await?;

    Ok(HttpResponse::Created().json(community))
}

/// Get a community
pub async fn get_community(pool: web::Data<PgPool>, path: web::Path<Uuid>) -> Result<HttpResponse> {
    let community = community_repo::find_by_id(&pool, *path)
        .await?
        .ok_or_else(|| AppError::NotFound("Community not found".into()))?;

    Ok(HttpResponse::Ok().json(community))
}

/// List communities
pub async fn list_communities(
    pool: web::Data<PgPool>,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    let (limit, offset) = query.clamp();
    let communities = community_repo::list(&pool, limit, offset).await?;

    Ok(HttpResponse::Ok().json(communities))
}

#[derive(Debug, Deserialize)]
pub struct UpdateCommunityRequest {
    /// Absent keeps the current description; an explicit `null` clears it.
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,

    pub posting_policy: Option<String>,
}

/// Wraps present values (including `null`) in `Some` so an omitted
/// field and an explicit `null` deserialize differently.
fn double_option<'de, D>(deserializer: D) -> std::result::Result<Option<Option<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// Update community settings; owner or community moderator only
pub async fn update_community(
    pool: web::Data<PgPool>,
    user: AuthUser,
    path: web::Path<Uuid>,
    req: web::Json<UpdateCommunityRequest>,
) -> Result<HttpResponse> {
    if let Some(Some(description)) = &req.description {
        if description.len() > 1000 {
            return Err(AppError::Validation(
                "description must be at most 1000 characters".into(),
            ));
        }
    }

    let community = community_repo::find_by_id(&pool, *path)
        .await?
        .ok_or_else(|| AppError::NotFound("Community not found".into()))?;

    let role = member_role(&pool, community.id, user.0).await?;
    if !role.is_some_and(|r| r.can_moderate()) {
        return Err(AppError::Authorization(
            "Only owners and moderators may update the community".into(),
        ));
    }

    let policy = match req.posting_policy.as_deref() {
        Some(_) => parse_policy(req.posting_policy.as_deref())?.as_str().to_string(),
        None => community.posting_policy.clone(),
    };
    let description = match &req.description {
        Some(new_value) => new_value.as_deref(),
        None => community.description.as_deref(),
    };

    let updated = community_repo::update_community(&pool, community.id, description, &policy)
        .await?
        .ok_or_else(|| AppError::NotFound("Community not found".into()))?;

    Ok(HttpResponse::Ok().json(updated))
}

/// Join a community as a plain member
pub async fn join_community(
    pool: web::Data<PgPool>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let community = community_repo::find_by_id(&pool, *path)
        .await?
        .ok_or_else(|| AppError::NotFound("Community not found".into()))?;

    community_repo::add_member(&pool, community.id, user.0).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// Leave a community; owners cannot leave their own community
pub async fn leave_community(
    pool: web::Data<PgPool>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let role = member_role(&pool, *path, user.0)
        .await?
        .ok_or_else(|| AppError::NotFound("Not a member of this community".into()))?;

    if role == CommunityRole::Owner {
        return Err(AppError::BadRequest(
            "Owners cannot leave their own community".into(),
        ));
    }

    community_repo::remove_member(&pool, *path, user.0).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// List members with their roles
pub async fn list_members(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    let community = community_repo::find_by_id(&pool, *path)
        .await?
        .ok_or_else(|| AppError::NotFound("Community not found".into()))?;

    let (limit, offset) = query.clamp();
    let members = community_repo::list_members(&pool, community.id, limit, offset).await?;

    Ok(HttpResponse::Ok().json(members))
}

#[derive(Debug, Deserialize)]
pub struct UpdateMemberRoleRequest {
    pub role: String,
}

/// Change a member's role; community owner only
pub async fn update_member_role(
    pool: web::Data<PgPool>,
    user: AuthUser,
    path: web::Path<(Uuid, Uuid)>,
    req: web::Json<UpdateMemberRoleRequest>,
) -> Result<HttpResponse> {
    let (community_id, member_id) = path.into_inner();

    let caller_role = member_role(&pool, community_id, user.0).await?;
    if caller_role != Some(CommunityRole::Owner) {
        return Err(AppError::Authorization(
            "Only the owner may change member roles".into(),
        ));
    }

    let new_role = CommunityRole::from_str(&req.role)
        .ok_or_else(|| AppError::Validation("Unknown community role".into()))?;
    if new_role == CommunityRole::Owner {
        return Err(AppError::BadRequest("Ownership cannot be reassigned".into()));
    }
    if member_id == user.0 {
        return Err(AppError::BadRequest("Owners cannot change their own role".into()));
    }

    let updated =
        community_repo::update_member_role(&pool, community_id, member_id, new_role.as_str())
            .await?;
    if updated == 0 {
        return Err(AppError::NotFound("Member not found".into()));
    }

    Ok(HttpResponse::NoContent().finish())
}

async fn member_role(
    pool: &PgPool,
    community_id: Uuid,
    user_id: Uuid,
) -> Result<Option<CommunityRole>> {
    Ok(community_repo::find_member_role(pool, community_id, user_id)
        .await?
        .and_then(|r| CommunityRole::from_str(&r)))
}

fn parse_policy(raw: Option<&str>) -> Result<PostingPolicy> {
    match raw {
        None => Ok(PostingPolicy::Everyone),
        Some(s) => PostingPolicy::from_str(s)
            .ok_or_else(|| AppError::Validation("Unknown posting policy".into())),
    }
}
