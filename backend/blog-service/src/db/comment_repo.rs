use crate::models::{Comment, CommentView};
use sqlx::PgPool;
use uuid::Uuid;

const COMMENT_VIEW_SELECT: &str = r#"
    SELECT c.id, c.post_id, c.text, c.created_at,
           c.author_id, u.username AS author_username
    FROM comments c
    JOIN users u ON u.id = c.author_id
"#;

/// Create a new comment on a post
pub async fn create_comment(
    pool: &PgPool,
    post_id: Uuid,
    author_id: Uuid,
    text: &str,
) -> Result<Comment, sqlx::Error> {
    let comment = sqlx::query_as::<_, Comment>(
        r#"
        INSERT INTO comments (post_id, author_id, text)
        VALUES ($1, $2, $3)
        RETURNING id, post_id, author_id, text, created_at
        "#,
    )
    .bind(post_id)
    .bind(author_id)
    .bind(text)
    .fetch_one(pool)
    .await?;

    Ok(comment)
}

/// All comments on a post, in creation order
pub async fn list_by_post(pool: &PgPool, post_id: Uuid) -> Result<Vec<CommentView>, sqlx::Error> {
    let comments = sqlx::query_as::<_, CommentView>(&format!(
        "{COMMENT_VIEW_SELECT} WHERE c.post_id = $1 ORDER BY c.created_at ASC"
    ))
    .bind(post_id)
    .fetch_all(pool)
    .await?;

    Ok(comments)
}

/// Find a comment by ID
pub async fn find_comment_by_id(
    pool: &PgPool,
    comment_id: Uuid,
) -> Result<Option<Comment>, sqlx::Error> {
    let comment = sqlx::query_as::<_, Comment>(
        r#"
        SELECT id, post_id, author_id, text, created_at
        FROM comments
        WHERE id = $1
        "#,
    )
    .bind(comment_id)
    .fetch_optional(pool)
    .await?;

    Ok(comment)
}

/// Delete a comment
pub async fn delete_comment(pool: &PgPool, comment_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM comments WHERE id = $1")
        .bind(comment_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Count comments on a post
pub async fn count_by_post(pool: &PgPool, post_id: Uuid) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM comments WHERE post_id = $1")
        .bind(post_id)
        .fetch_one(pool)
        .await?;

    Ok(count)
}

/// Search comments for the admin listing: text substring and author username
pub async fn search(
    pool: &PgPool,
    text: Option<&str>,
    author: Option<&str>,
    limit: i64,
    offset: i64,
) -> Result<Vec<CommentView>, sqlx::Error> {
    let comments = sqlx::query_as::<_, CommentView>(&format!(
        r#"{COMMENT_VIEW_SELECT}
        WHERE ($1::text IS NULL OR c.text ILIKE '%' || $1 || '%')
          AND ($2::text IS NULL OR u.username = $2)
        ORDER BY c.created_at DESC
        LIMIT $3 OFFSET $4"#
    ))
    .bind(text)
    .bind(author)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(comments)
}

/// Count comments matching an admin search
pub async fn count_search(
    pool: &PgPool,
    text: Option<&str>,
    author: Option<&str>,
) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*)
        FROM comments c
        JOIN users u ON u.id = c.author_id
        WHERE ($1::text IS NULL OR c.text ILIKE '%' || $1 || '%')
          AND ($2::text IS NULL OR u.username = $2)
        "#,
    )
    .bind(text)
    .bind(author)
    .fetch_one(pool)
    .await?;

    Ok(count)
}
