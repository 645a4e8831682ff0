/// HTTP handlers for the townsquare API
///
/// One module per feature; one handler function per backend action.
/// Handlers validate input, rely on `AuthUser` for identity, perform
/// ownership/role checks, call the repositories, and return JSON.
pub mod admin;
pub mod auth;
pub mod businesses;
pub mod comments;
pub mod communities;
pub mod health;
pub mod jobs;
pub mod posts;
pub mod promotions;
pub mod users;

use serde::Deserialize;

/// Pagination query parameters shared by list endpoints.
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

const DEFAULT_PAGE_SIZE: i64 = 20;
const MAX_PAGE_SIZE: i64 = 100;

impl PaginationParams {
    /// Clamp to sane bounds so a client cannot request unbounded pages.
    pub fn clamp(&self) -> (i64, i64) {
        let limit = self
            .limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        let offset = self.offset.unwrap_or(0).max(0);
        (limit, offset)
    }
}
