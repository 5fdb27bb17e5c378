use crate::models::{Post, PostView};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Shared SELECT for the joined post shape shown in feeds and detail pages.
const POST_VIEW_SELECT: &str = r#"
    SELECT p.id, p.text, p.image_key, p.is_published, p.published_at,
           p.author_id, u.username AS author_username,
           p.group_id, g.slug AS group_slug, g.title AS group_title
    FROM posts p
    JOIN users u ON u.id = p.author_id
    LEFT JOIN groups g ON g.id = p.group_id
"#;

/// Create a new post. `published_at` defaults to the current time.
pub async fn create_post(
    pool: &PgPool,
    author_id: Uuid,
    text: &str,
    group_id: Option<Uuid>,
    image_key: Option<&str>,
) -> Result<Post, sqlx::Error> {
    let post = sqlx::query_as::<_, Post>(
        r#"
        INSERT INTO posts (author_id, text, group_id, image_key)
        VALUES ($1, $2, $3, $4)
        RETURNING id, author_id, group_id, text, image_key, is_published, published_at
        "#,
    )
    .bind(author_id)
    .bind(text)
    .bind(group_id)
    .bind(image_key)
    .fetch_one(pool)
    .await?;

    Ok(post)
}

/// Find a post by ID with author and group joined in
pub async fn find_post_by_id(pool: &PgPool, post_id: Uuid) -> Result<Option<PostView>, sqlx::Error> {
    let post = sqlx::query_as::<_, PostView>(&format!("{POST_VIEW_SELECT} WHERE p.id = $1"))
        .bind(post_id)
        .fetch_optional(pool)
        .await?;

    Ok(post)
}

/// Update a post's editable fields and bump its publication timestamp
pub async fn update_post(
    pool: &PgPool,
    post_id: Uuid,
    text: &str,
    group_id: Option<Uuid>,
    image_key: Option<&str>,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE posts
        SET text = $1, group_id = $2, image_key = $3, published_at = NOW()
        WHERE id = $4
        "#,
    )
    .bind(text)
    .bind(group_id)
    .bind(image_key)
    .bind(post_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete a post; its comments cascade away with it
pub async fn delete_post(pool: &PgPool, post_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM posts WHERE id = $1")
        .bind(post_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// List all posts, newest first
pub async fn list_recent(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<PostView>, sqlx::Error> {
    let posts = sqlx::query_as::<_, PostView>(&format!(
        "{POST_VIEW_SELECT} ORDER BY p.published_at DESC LIMIT $1 OFFSET $2"
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(posts)
}

/// Count all posts
pub async fn count_all(pool: &PgPool) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM posts")
        .fetch_one(pool)
        .await?;

    Ok(count)
}

/// List a group's posts, newest first
pub async fn list_by_group(
    pool: &PgPool,
    group_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<PostView>, sqlx::Error> {
    let posts = sqlx::query_as::<_, PostView>(&format!(
        "{POST_VIEW_SELECT} WHERE p.group_id = $1 ORDER BY p.published_at DESC LIMIT $2 OFFSET $3"
    ))
    .bind(group_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(posts)
}

/// Count a group's posts
pub async fn count_by_group(pool: &PgPool, group_id: Uuid) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM posts WHERE group_id = $1")
        .bind(group_id)
        .fetch_one(pool)
        .await?;

    Ok(count)
}

/// List an author's posts, newest first
pub async fn list_by_author(
    pool: &PgPool,
    author_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<PostView>, sqlx::Error> {
    let posts = sqlx::query_as::<_, PostView>(&format!(
        "{POST_VIEW_SELECT} WHERE p.author_id = $1 ORDER BY p.published_at DESC LIMIT $2 OFFSET $3"
    ))
    .bind(author_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(posts)
}

/// Count an author's posts
pub async fn count_by_author(pool: &PgPool, author_id: Uuid) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM posts WHERE author_id = $1")
        .bind(author_id)
        .fetch_one(pool)
        .await?;

    Ok(count)
}

/// List posts authored by anyone the viewer follows, newest first
pub async fn list_by_followed(
    pool: &PgPool,
    viewer_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<PostView>, sqlx::Error> {
    let posts = sqlx::query_as::<_, PostView>(&format!(
        r#"{POST_VIEW_SELECT}
        WHERE p.author_id IN (SELECT author_id FROM follows WHERE user_id = $1)
        ORDER BY p.published_at DESC
        LIMIT $2 OFFSET $3"#
    ))
    .bind(viewer_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(posts)
}

/// Count posts authored by anyone the viewer follows
pub async fn count_by_followed(pool: &PgPool, viewer_id: Uuid) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*) FROM posts
        WHERE author_id IN (SELECT author_id FROM follows WHERE user_id = $1)
        "#,
    )
    .bind(viewer_id)
    .fetch_one(pool)
    .await?;

    Ok(count)
}

/// Admin search filter over posts. `None` fields match everything.
#[derive(Debug, Clone, Default)]
pub struct PostSearch {
    pub text: Option<String>,
    pub author: Option<String>,
    pub published_after: Option<DateTime<Utc>>,
    pub published_before: Option<DateTime<Utc>>,
}

/// Search posts for the admin listing: text substring, author username,
/// publication date range.
pub async fn search(
    pool: &PgPool,
    filter: &PostSearch,
    limit: i64,
    offset: i64,
) -> Result<Vec<PostView>, sqlx::Error> {
    let posts = sqlx::query_as::<_, PostView>(&format!(
        r#"{POST_VIEW_SELECT}
        WHERE ($1::text IS NULL OR p.text ILIKE '%' || $1 || '%')
          AND ($2::text IS NULL OR u.username = $2)
          AND ($3::timestamptz IS NULL OR p.published_at >= $3)
          AND ($4::timestamptz IS NULL OR p.published_at <= $4)
        ORDER BY p.published_at DESC
        LIMIT $5 OFFSET $6"#
    ))
    .bind(&filter.text)
    .bind(&filter.author)
    .bind(filter.published_after)
    .bind(filter.published_before)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(posts)
}

/// Count posts matching an admin search
pub async fn count_search(pool: &PgPool, filter: &PostSearch) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*)
        FROM posts p
        JOIN users u ON u.id = p.author_id
        WHERE ($1::text IS NULL OR p.text ILIKE '%' || $1 || '%')
          AND ($2::text IS NULL OR u.username = $2)
          AND ($3::timestamptz IS NULL OR p.published_at >= $3)
          AND ($4::timestamptz IS NULL OR p.published_at <= $4)
        "#,
    )
    .bind(&filter.text)
    .bind(&filter.author)
    .bind(filter.published_after)
    .bind(filter.published_before)
    .fetch_one(pool)
    .await?;

    Ok(count)
}

/// Admin list-editable column: move a post to another group (or none)
pub async fn set_group(
    pool: &PgPool,
    post_id: Uuid,
    group_id: Option<Uuid>,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE posts SET group_id = $1 WHERE id = $2")
        .bind(group_id)
        .bind(post_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Admin list-editable column: publish or unpublish a post
pub async fn set_published(
    pool: &PgPool,
    post_id: Uuid,
    is_published: bool,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE posts SET is_published = $1 WHERE id = $2")
        .bind(is_published)
        .bind(post_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
