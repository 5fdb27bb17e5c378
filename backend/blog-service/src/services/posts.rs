/// Post service - authoring and detail lookups
use crate::db::{comment_repo, group_repo, post_repo};
use crate::error::{AppError, Result};
use crate::forms::PostForm;
use crate::models::{CommentView, Post, PostView};
use sqlx::PgPool;
use uuid::Uuid;

pub struct PostService {
    pool: PgPool,
}

impl PostService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A post with author and group joined in, or None.
    pub async fn get_post(&self, post_id: Uuid) -> Result<Option<PostView>> {
        Ok(post_repo::find_post_by_id(&self.pool, post_id).await?)
    }

    /// A post plus its comments in creation order; 404 if absent.
    pub async fn detail(&self, post_id: Uuid) -> Result<(PostView, Vec<CommentView>)> {
        let post = post_repo::find_post_by_id(&self.pool, post_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("post {}", post_id)))?;
        let comments = comment_repo::list_by_post(&self.pool, post_id).await?;

        Ok((post, comments))
    }

    /// Does the submitted group id reference an existing group?
    /// A missing group is a form error, not a server error.
    pub async fn group_exists(&self, group_id: Uuid) -> Result<bool> {
        Ok(group_repo::find_group_by_id(&self.pool, group_id)
            .await?
            .is_some())
    }

    /// Persist a validated form as a new post owned by `author_id`.
    pub async fn create_post(&self, author_id: Uuid, form: &PostForm) -> Result<Post> {
        let post = post_repo::create_post(
            &self.pool,
            author_id,
            &form.text,
            form.group,
            form.image_key.as_deref(),
        )
        .await?;

        Ok(post)
    }

    /// Apply a validated form to an existing post and bump its
    /// publication timestamp.
    pub async fn update_post(&self, post_id: Uuid, form: &PostForm) -> Result<bool> {
        let updated = post_repo::update_post(
            &self.pool,
            post_id,
            &form.text,
            form.group,
            form.image_key.as_deref(),
        )
        .await?;

        Ok(updated)
    }
}
