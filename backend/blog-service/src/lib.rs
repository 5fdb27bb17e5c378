/// Blog Service Library
///
/// Handles the page-facing endpoints of the Quill blogging platform:
/// feeds, post authoring, comments, and the follow graph, plus the admin
/// exposure for the management collaborator.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers emitting render contexts
/// - `admin`: admin exposure (descriptor registry + CRUD handlers)
/// - `models`: entities and the joined view shapes
/// - `services`: business logic layer and the paginator
/// - `db`: database access layer, one repository per entity
/// - `forms`: user-submitted payloads and their validation
/// - `cache`: TTL page cache over Redis
/// - `auth`: resolved-identity extractors for handlers
/// - `error`: error types and HTTP mapping
/// - `config`: configuration management
/// - `metrics`: observability collectors and the /metrics endpoint
pub mod admin;
pub mod auth;
pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod forms;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};
