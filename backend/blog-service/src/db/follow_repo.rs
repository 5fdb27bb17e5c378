use crate::models::FollowView;
use sqlx::PgPool;
use uuid::Uuid;

/// Idempotent follow creation; returns true if a new edge was inserted.
/// The UNIQUE constraint on (user_id, author_id) makes this safe under
/// concurrent requests.
pub async fn create_follow(
    pool: &PgPool,
    user_id: Uuid,
    author_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let inserted = sqlx::query_as::<_, (Uuid,)>(
        r#"
        INSERT INTO follows (user_id, author_id)
        VALUES ($1, $2)
        ON CONFLICT (user_id, author_id) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(user_id)
    .bind(author_id)
    .fetch_optional(pool)
    .await?;

    Ok(inserted.is_some())
}

/// Delete a follow edge; returns true if a row was removed.
pub async fn delete_follow(
    pool: &PgPool,
    user_id: Uuid,
    author_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let affected = sqlx::query(
        r#"
        DELETE FROM follows
        WHERE user_id = $1 AND author_id = $2
        "#,
    )
    .bind(user_id)
    .bind(author_id)
    .execute(pool)
    .await?
    .rows_affected();

    Ok(affected > 0)
}

/// Delete a follow edge by its row id (admin surface)
pub async fn delete_follow_by_id(pool: &PgPool, follow_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM follows WHERE id = $1")
        .bind(follow_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Does `user_id` follow `author_id`?
pub async fn is_following(
    pool: &PgPool,
    user_id: Uuid,
    author_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let (exists,): (bool,) = sqlx::query_as(
        "SELECT EXISTS(SELECT 1 FROM follows WHERE user_id = $1 AND author_id = $2)",
    )
    .bind(user_id)
    .bind(author_id)
    .fetch_one(pool)
    .await?;

    Ok(exists)
}

/// How many users follow this author
pub async fn follower_count(pool: &PgPool, author_id: Uuid) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM follows WHERE author_id = $1")
        .bind(author_id)
        .fetch_one(pool)
        .await?;

    Ok(count)
}

/// How many authors this user follows
pub async fn following_count(pool: &PgPool, user_id: Uuid) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM follows WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await?;

    Ok(count)
}

/// Follow edges with both usernames joined in, for the admin listing
pub async fn list_follows(
    pool: &PgPool,
    user: Option<&str>,
    author: Option<&str>,
    limit: i64,
    offset: i64,
) -> Result<Vec<FollowView>, sqlx::Error> {
    let follows = sqlx::query_as::<_, FollowView>(
        r#"
        SELECT f.id, f.user_id, fu.username AS user_username,
               f.author_id, au.username AS author_username, f.created_at
        FROM follows f
        JOIN users fu ON fu.id = f.user_id
        JOIN users au ON au.id = f.author_id
        WHERE ($1::text IS NULL OR fu.username = $1)
          AND ($2::text IS NULL OR au.username = $2)
        ORDER BY f.created_at DESC
        LIMIT $3 OFFSET $4
        "#,
    )
    .bind(user)
    .bind(author)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(follows)
}

/// Count follow edges matching an admin filter
pub async fn count_follows(
    pool: &PgPool,
    user: Option<&str>,
    author: Option<&str>,
) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*)
        FROM follows f
        JOIN users fu ON fu.id = f.user_id
        JOIN users au ON au.id = f.author_id
        WHERE ($1::text IS NULL OR fu.username = $1)
          AND ($2::text IS NULL OR au.username = $2)
        "#,
    )
    .bind(user)
    .bind(author)
    .fetch_one(pool)
    .await?;

    Ok(count)
}
