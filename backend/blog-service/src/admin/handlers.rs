/// Admin handlers - direct CRUD with search and filters, all behind a
/// resolved identity
use crate::admin::registry::{self, EntityAdmin};
use crate::auth::Identity;
use crate::cache::PageCache;
use crate::db::{comment_repo, follow_repo, group_repo, post_repo};
use crate::error::{AppError, Result};
use crate::services::pagination::parse_page_param;
use crate::services::{Page, Paginator};
use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

const ADMIN_PAGE_SIZE: i64 = 50;

/// One entity listing: its descriptor plus a page of rows.
#[derive(Debug, Serialize)]
pub struct AdminList<T> {
    pub admin: &'static EntityAdmin,
    pub rows: Page<T>,
}

/// Descriptor overview for the management UI.
pub async fn overview(_identity: Identity) -> HttpResponse {
    HttpResponse::Ok().json(registry::ENTITY_ADMINS)
}

#[derive(Debug, Deserialize)]
pub struct PostListQuery {
    pub q: Option<String>,
    pub author: Option<String>,
    pub published_after: Option<DateTime<Utc>>,
    pub published_before: Option<DateTime<Utc>>,
    pub page: Option<String>,
}

/// Post listing with text search, author filter, and date range.
pub async fn list_posts(
    pool: web::Data<PgPool>,
    _identity: Identity,
    query: web::Query<PostListQuery>,
) -> Result<HttpResponse> {
    let filter = post_repo::PostSearch {
        text: query.q.clone(),
        author: query.author.clone(),
        published_after: query.published_after,
        published_before: query.published_before,
    };

    let paginator = Paginator::new(ADMIN_PAGE_SIZE);
    let total = post_repo::count_search(pool.get_ref(), &filter).await?;
    let bounds = paginator.bounds(total, parse_page_param(query.page.as_deref()));
    let items = post_repo::search(pool.get_ref(), &filter, bounds.limit, bounds.offset).await?;

    Ok(HttpResponse::Ok().json(AdminList {
        admin: &registry::POST_ADMIN,
        rows: paginator.page(items, total, bounds),
    }))
}

/// Admin update of the list-editable post columns.
#[derive(Debug, Deserialize)]
pub struct PostAdminUpdate {
    pub is_published: Option<bool>,
    pub group: Option<Uuid>,
    /// Detach the post from its group.
    #[serde(default)]
    pub clear_group: bool,
}

pub async fn update_post(
    pool: web::Data<PgPool>,
    _identity: Identity,
    post_id: web::Path<Uuid>,
    payload: web::Json<PostAdminUpdate>,
) -> Result<HttpResponse> {
    let existing = post_repo::find_post_by_id(pool.get_ref(), *post_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post {}", post_id)))?;

    if let Some(is_published) = payload.is_published {
        post_repo::set_published(pool.get_ref(), existing.id, is_published).await?;
    }
    if payload.clear_group {
        post_repo::set_group(pool.get_ref(), existing.id, None).await?;
    } else if let Some(group_id) = payload.group {
        if group_repo::find_group_by_id(pool.get_ref(), group_id)
            .await?
            .is_none()
        {
            return Err(AppError::NotFound(format!("group {}", group_id)));
        }
        post_repo::set_group(pool.get_ref(), existing.id, Some(group_id)).await?;
    }

    match post_repo::find_post_by_id(pool.get_ref(), existing.id).await? {
        Some(post) => Ok(HttpResponse::Ok().json(post)),
        None => Err(AppError::NotFound(format!("post {}", post_id))),
    }
}

pub async fn delete_post(
    pool: web::Data<PgPool>,
    _identity: Identity,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    if post_repo::delete_post(pool.get_ref(), *post_id).await? {
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(AppError::NotFound(format!("post {}", post_id)))
    }
}

#[derive(Debug, Deserialize)]
pub struct GroupListQuery {
    pub page: Option<String>,
}

pub async fn list_groups(
    pool: web::Data<PgPool>,
    _identity: Identity,
    query: web::Query<GroupListQuery>,
) -> Result<HttpResponse> {
    let paginator = Paginator::new(ADMIN_PAGE_SIZE);
    let total = group_repo::count_groups(pool.get_ref()).await?;
    let bounds = paginator.bounds(total, parse_page_param(query.page.as_deref()));
    let items = group_repo::list_groups(pool.get_ref(), bounds.limit, bounds.offset).await?;

    Ok(HttpResponse::Ok().json(AdminList {
        admin: &registry::GROUP_ADMIN,
        rows: paginator.page(items, total, bounds),
    }))
}

/// Group payload for administrator create/update.
#[derive(Debug, Deserialize, Validate)]
pub struct GroupPayload {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Slug is required"))]
    pub slug: String,
    #[serde(default)]
    pub description: String,
}

pub async fn create_group(
    pool: web::Data<PgPool>,
    _identity: Identity,
    payload: web::Json<GroupPayload>,
) -> Result<HttpResponse> {
    if let Err(e) = payload.validate() {
        return Ok(HttpResponse::BadRequest().json(crate::forms::field_errors(&e)));
    }

    let group = group_repo::create_group(
        pool.get_ref(),
        payload.title.trim(),
        payload.slug.trim(),
        payload.description.trim(),
    )
    .await?;

    Ok(HttpResponse::Created().json(group))
}

pub async fn update_group(
    pool: web::Data<PgPool>,
    _identity: Identity,
    group_id: web::Path<Uuid>,
    payload: web::Json<GroupPayload>,
) -> Result<HttpResponse> {
    if let Err(e) = payload.validate() {
        return Ok(HttpResponse::BadRequest().json(crate::forms::field_errors(&e)));
    }

    let updated = group_repo::update_group(
        pool.get_ref(),
        *group_id,
        payload.title.trim(),
        payload.slug.trim(),
        payload.description.trim(),
    )
    .await?;

    if !updated {
        return Err(AppError::NotFound(format!("group {}", group_id)));
    }

    match group_repo::find_group_by_id(pool.get_ref(), *group_id).await? {
        Some(group) => Ok(HttpResponse::Ok().json(group)),
        None => Err(AppError::NotFound(format!("group {}", group_id))),
    }
}

/// Delete a group. Its posts stay, detached.
pub async fn delete_group(
    pool: web::Data<PgPool>,
    _identity: Identity,
    group_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    if group_repo::delete_group(pool.get_ref(), *group_id).await? {
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(AppError::NotFound(format!("group {}", group_id)))
    }
}

#[derive(Debug, Deserialize)]
pub struct CommentListQuery {
    pub q: Option<String>,
    pub author: Option<String>,
    pub page: Option<String>,
}

pub async fn list_comments(
    pool: web::Data<PgPool>,
    _identity: Identity,
    query: web::Query<CommentListQuery>,
) -> Result<HttpResponse> {
    let paginator = Paginator::new(ADMIN_PAGE_SIZE);
    let total =
        comment_repo::count_search(pool.get_ref(), query.q.as_deref(), query.author.as_deref())
            .await?;
    let bounds = paginator.bounds(total, parse_page_param(query.page.as_deref()));
    let items = comment_repo::search(
        pool.get_ref(),
        query.q.as_deref(),
        query.author.as_deref(),
        bounds.limit,
        bounds.offset,
    )
    .await?;

    Ok(HttpResponse::Ok().json(AdminList {
        admin: &registry::COMMENT_ADMIN,
        rows: paginator.page(items, total, bounds),
    }))
}

pub async fn delete_comment(
    pool: web::Data<PgPool>,
    _identity: Identity,
    comment_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    if comment_repo::delete_comment(pool.get_ref(), *comment_id).await? {
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(AppError::NotFound(format!("comment {}", comment_id)))
    }
}

#[derive(Debug, Deserialize)]
pub struct FollowListQuery {
    pub user: Option<String>,
    pub author: Option<String>,
    pub page: Option<String>,
}

pub async fn list_follows(
    pool: web::Data<PgPool>,
    _identity: Identity,
    query: web::Query<FollowListQuery>,
) -> Result<HttpResponse> {
    let paginator = Paginator::new(ADMIN_PAGE_SIZE);
    let total = follow_repo::count_follows(
        pool.get_ref(),
        query.user.as_deref(),
        query.author.as_deref(),
    )
    .await?;
    let bounds = paginator.bounds(total, parse_page_param(query.page.as_deref()));
    let items = follow_repo::list_follows(
        pool.get_ref(),
        query.user.as_deref(),
        query.author.as_deref(),
        bounds.limit,
        bounds.offset,
    )
    .await?;

    Ok(HttpResponse::Ok().json(AdminList {
        admin: &registry::FOLLOW_ADMIN,
        rows: paginator.page(items, total, bounds),
    }))
}

pub async fn delete_follow(
    pool: web::Data<PgPool>,
    _identity: Identity,
    follow_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    if follow_repo::delete_follow_by_id(pool.get_ref(), *follow_id).await? {
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(AppError::NotFound(format!("follow {}", follow_id)))
    }
}

/// Drop every cached page so the next index request renders fresh.
pub async fn clear_page_cache(
    cache: web::Data<PageCache>,
    _identity: Identity,
) -> Result<HttpResponse> {
    let cleared = cache.clear_all().await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "cleared": cleared })))
}
