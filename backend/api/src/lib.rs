/// Townsquare API
///
/// Backend for the townsquare community platform: user profiles, posts
/// with likes and comments, communities with membership and
/// permissions, business listings, a jobs board with applications,
/// promotional content, and an admin moderation panel.
///
/// # Modules
///
/// - `handlers`: per-feature HTTP request handlers
/// - `models`: row structs and request/response DTOs
/// - `db`: sqlx repositories, one module per entity
/// - `middleware`: session-token authentication
/// - `security`: password hashing and session-token generation
/// - `jobs`: background maintenance loops
/// - `error`: error types and the JSON error envelope
/// - `config`: environment-based configuration
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod jobs;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod security;
pub mod validators;

pub use config::Config;
pub use error::{AppError, Result};
