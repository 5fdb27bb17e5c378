/// Feed service - assembles the paginated post listings
use crate::db::{follow_repo, group_repo, post_repo, user_repo};
use crate::error::{AppError, Result};
use crate::models::{Group, PostView, User};
use crate::services::pagination::{Page, Paginator};
use sqlx::PgPool;
use uuid::Uuid;

pub struct FeedService {
    pool: PgPool,
    paginator: Paginator,
}

/// Profile page payload: the author's posts plus the viewer-dependent
/// follow state.
pub struct ProfileFeed {
    pub author: User,
    pub page: Page<PostView>,
    pub following: bool,
    pub followers: i64,
}

impl FeedService {
    pub fn new(pool: PgPool, posts_per_page: i64) -> Self {
        Self {
            pool,
            paginator: Paginator::new(posts_per_page),
        }
    }

    /// All posts, newest first.
    pub async fn index_page(&self, page: i64) -> Result<Page<PostView>> {
        let total = post_repo::count_all(&self.pool).await?;
        let bounds = self.paginator.bounds(total, page);
        let items = post_repo::list_recent(&self.pool, bounds.limit, bounds.offset).await?;

        Ok(self.paginator.page(items, total, bounds))
    }

    /// One group's posts; 404 for an unknown slug.
    pub async fn group_page(&self, slug: &str, page: i64) -> Result<(Group, Page<PostView>)> {
        let group = group_repo::find_group_by_slug(&self.pool, slug)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("group '{}'", slug)))?;

        let total = post_repo::count_by_group(&self.pool, group.id).await?;
        let bounds = self.paginator.bounds(total, page);
        let items =
            post_repo::list_by_group(&self.pool, group.id, bounds.limit, bounds.offset).await?;
        let page = self.paginator.page(items, total, bounds);

        Ok((group, page))
    }

    /// One author's posts with follow state for the viewer; 404 for an
    /// unknown username. Anonymous viewers are never "following".
    pub async fn profile_page(
        &self,
        username: &str,
        viewer: Option<Uuid>,
        page: i64,
    ) -> Result<ProfileFeed> {
        let author = user_repo::find_user_by_username(&self.pool, username)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user '{}'", username)))?;

        let total = post_repo::count_by_author(&self.pool, author.id).await?;
        let bounds = self.paginator.bounds(total, page);
        let items =
            post_repo::list_by_author(&self.pool, author.id, bounds.limit, bounds.offset).await?;
        let page = self.paginator.page(items, total, bounds);

        let following = match viewer {
            Some(viewer_id) => follow_repo::is_following(&self.pool, viewer_id, author.id).await?,
            None => false,
        };
        let followers = follow_repo::follower_count(&self.pool, author.id).await?;

        Ok(ProfileFeed {
            author,
            page,
            following,
            followers,
        })
    }

    /// Posts authored by anyone the viewer follows.
    pub async fn follow_page(&self, viewer_id: Uuid, page: i64) -> Result<Page<PostView>> {
        let total = post_repo::count_by_followed(&self.pool, viewer_id).await?;
        let bounds = self.paginator.bounds(total, page);
        let items =
            post_repo::list_by_followed(&self.pool, viewer_id, bounds.limit, bounds.offset)
                .await?;

        Ok(self.paginator.page(items, total, bounds))
    }
}
