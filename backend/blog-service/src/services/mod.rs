/// Business logic layer
///
/// Services own a `PgPool` and orchestrate the repositories: feed
/// assembly and paging, post authoring, commenting, and the follow graph.
/// Handlers construct them per request.
pub mod comments;
pub mod feeds;
pub mod follows;
pub mod pagination;
pub mod posts;

pub use comments::CommentService;
pub use feeds::{FeedService, ProfileFeed};
pub use follows::FollowService;
pub use pagination::{Page, Paginator};
pub use posts::PostService;
