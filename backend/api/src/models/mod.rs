/// Data models for the townsquare API
///
/// Row structs mirror the PostgreSQL schema; status columns are stored
/// as strings and parsed into the enums defined alongside them.
pub mod business;
pub mod community;
pub mod content;
pub mod job;
pub mod promotion;
pub mod user;

pub use business::Business;
pub use community::{Community, CommunityMember, CommunityRole, PostingPolicy};
pub use content::{Comment, CommentWithAuthor, Post, PostWithCounts};
pub use job::{ApplicationStatus, Job, JobApplication, JobStatus};
pub use promotion::Promotion;
pub use user::{AdminRole, Session, User, UserProfile};

use serde::{Deserialize, Serialize};

/// Moderation status shared by businesses, jobs and promotions.
///
/// New listings default to `Pending`; only `Approved` listings are
/// publicly visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "pending",
            ApprovalStatus::Approved => "approved",
            ApprovalStatus::Rejected => "rejected",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(ApprovalStatus::Pending),
            "approved" => Some(ApprovalStatus::Approved),
            "rejected" => Some(ApprovalStatus::Rejected),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approval_status_round_trips() {
        for s in ["pending", "approved", "rejected"] {
            assert_eq!(ApprovalStatus::from_str(s).unwrap().as_str(), s);
        }
        assert!(ApprovalStatus::from_str("closed").is_none());
    }
}
