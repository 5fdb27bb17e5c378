/// Comment service - comment creation and retrieval
use crate::db::comment_repo;
use crate::error::Result;
use crate::models::{Comment, CommentView};
use sqlx::PgPool;
use uuid::Uuid;

pub struct CommentService {
    pool: PgPool,
}

impl CommentService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Persist a validated comment on a post.
    pub async fn add_comment(
        &self,
        post_id: Uuid,
        author_id: Uuid,
        text: &str,
    ) -> Result<Comment> {
        let comment = comment_repo::create_comment(&self.pool, post_id, author_id, text).await?;

        Ok(comment)
    }

    /// All comments on a post, in creation order.
    pub async fn post_comments(&self, post_id: Uuid) -> Result<Vec<CommentView>> {
        Ok(comment_repo::list_by_post(&self.pool, post_id).await?)
    }
}
