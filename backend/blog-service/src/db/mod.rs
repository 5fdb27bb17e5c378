/// Database access layer
///
/// One repository module per entity. Repositories are free async functions
/// over `&PgPool`: they own the SQL and return rows, leaving paging
/// decisions and error translation to the service layer.
pub mod comment_repo;
pub mod follow_repo;
pub mod group_repo;
pub mod post_repo;
pub mod user_repo;
