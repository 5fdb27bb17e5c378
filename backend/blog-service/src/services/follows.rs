/// Follow service - the directed follow graph between users
use crate::db::follow_repo;
use crate::error::Result;
use crate::metrics::FOLLOW_ACTIONS_TOTAL;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct FollowService {
    pool: PgPool,
}

impl FollowService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Idempotent follow. A self-follow is silently ignored; repeating a
    /// follow leaves exactly one edge. Returns true if a new edge was
    /// inserted.
    pub async fn follow(&self, user_id: Uuid, author_id: Uuid) -> Result<bool> {
        if user_id == author_id {
            FOLLOW_ACTIONS_TOTAL.with_label_values(&["self"]).inc();
            return Ok(false);
        }

        let created = follow_repo::create_follow(&self.pool, user_id, author_id).await?;
        let outcome = if created { "created" } else { "duplicate" };
        FOLLOW_ACTIONS_TOTAL.with_label_values(&[outcome]).inc();

        Ok(created)
    }

    /// Remove an existing edge; returns false when there was none.
    pub async fn unfollow(&self, user_id: Uuid, author_id: Uuid) -> Result<bool> {
        let removed = follow_repo::delete_follow(&self.pool, user_id, author_id).await?;
        if removed {
            FOLLOW_ACTIONS_TOTAL.with_label_values(&["removed"]).inc();
        }

        Ok(removed)
    }

    pub async fn is_following(&self, user_id: Uuid, author_id: Uuid) -> Result<bool> {
        Ok(follow_repo::is_following(&self.pool, user_id, author_id).await?)
    }

    pub async fn follower_count(&self, author_id: Uuid) -> Result<i64> {
        Ok(follow_repo::follower_count(&self.pool, author_id).await?)
    }
}
