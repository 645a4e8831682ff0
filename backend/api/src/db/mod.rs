/// Database access layer
///
/// Plain-function sqlx repositories, one module per entity. Handlers
/// own authorization; repositories are straight reads and writes.
pub mod admin_repo;
pub mod application_repo;
pub mod business_repo;
pub mod comment_repo;
pub mod community_repo;
pub mod job_repo;
pub mod post_repo;
pub mod promotion_repo;
pub mod session_repo;
pub mod user_repo;
