use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Community row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Community {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub posting_policy: String,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Membership row joined with the member's username.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CommunityMember {
    pub community_id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub role: String,
    pub joined_at: DateTime<Utc>,
}

/// Member role within a community
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommunityRole {
    Owner,
    Moderator,
    Member,
}

impl CommunityRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommunityRole::Owner => "owner",
            CommunityRole::Moderator => "moderator",
            CommunityRole::Member => "member",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "owner" => Some(CommunityRole::Owner),
            "moderator" => Some(CommunityRole::Moderator),
            "member" => Some(CommunityRole::Member),
            _ => None,
        }
    }

    /// Moderator-or-above check used by community management endpoints.
    pub fn can_moderate(&self) -> bool {
        matches!(self, CommunityRole::Owner | CommunityRole::Moderator)
    }
}

/// Who may create posts in a community.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostingPolicy {
    Everyone,
    Moderators,
}

impl PostingPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostingPolicy::Everyone => "everyone",
            PostingPolicy::Moderators => "moderators",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "everyone" => Some(PostingPolicy::Everyone),
            "moderators" => Some(PostingPolicy::Moderators),
            _ => None,
        }
    }

    pub fn allows_posting(&self, role: CommunityRole) -> bool {
        match self {
            PostingPolicy::Everyone => true,
            PostingPolicy::Moderators => role.can_moderate(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_and_moderator_can_moderate() {
        assert!(CommunityRole::Owner.can_moderate());
        assert!(CommunityRole::Moderator.can_moderate());
        assert!(!CommunityRole::Member.can_moderate());
    }

    #[test]
    fn moderators_policy_blocks_plain_members() {
        assert!(PostingPolicy::Everyone.allows_posting(CommunityRole::Member));
        assert!(!PostingPolicy::Moderators.allows_posting(CommunityRole::Member));
        assert!(PostingPolicy::Moderators.allows_posting(CommunityRole::Owner));
    }

    #[test]
    fn role_round_trips() {
        for s in ["owner", "moderator", "member"] {
            assert_eq!(CommunityRole::from_str(s).unwrap().as_str(), s);
        }
        assert!(CommunityRole::from_str("admin").is_none());
    }
}
