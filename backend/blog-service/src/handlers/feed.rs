/// Feed handlers - the index, group, and follow listings
use crate::auth::Identity;
use crate::cache::{CachedPage, PageCache};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::handlers::PageQuery;
use crate::models::{Group, PostView};
use crate::services::pagination::parse_page_param;
use crate::services::{FeedService, Page};
use actix_web::{web, HttpRequest, HttpResponse};
use serde::Serialize;
use sqlx::PgPool;
use tracing::warn;

#[derive(Debug, Serialize)]
pub struct IndexContext {
    pub page_obj: Page<PostView>,
}

#[derive(Debug, Serialize)]
pub struct GroupContext {
    pub group: Group,
    pub page_obj: Page<PostView>,
}

#[derive(Debug, Serialize)]
pub struct FollowFeedContext {
    pub page_obj: Page<PostView>,
}

/// Site index: all posts, newest first. The whole response sits behind
/// the TTL page cache, keyed by path+query, so each page number caches
/// separately. Cache trouble falls back to rendering.
pub async fn index(
    pool: web::Data<PgPool>,
    cache: web::Data<PageCache>,
    config: web::Data<Config>,
    query: web::Query<PageQuery>,
    http_req: HttpRequest,
) -> Result<HttpResponse> {
    let cache_key = match http_req.query_string() {
        "" => http_req.path().to_string(),
        q => format!("{}?{}", http_req.path(), q),
    };

    if let Some(cached) = cache.read(&cache_key).await {
        return Ok(HttpResponse::Ok()
            .content_type(cached.content_type)
            .body(cached.body));
    }

    let page = parse_page_param(query.page.as_deref());
    let service = FeedService::new((**pool).clone(), config.feed.posts_per_page);
    let context = IndexContext {
        page_obj: service.index_page(page).await?,
    };

    let body = serde_json::to_string(&context)
        .map_err(|e| AppError::Internal(format!("Context serialization error: {}", e)))?;

    let entry = CachedPage {
        content_type: "application/json".to_string(),
        body: body.clone(),
    };
    if let Err(e) = cache.write(&cache_key, &entry).await {
        warn!("Index cache write failed: {}", e);
    }

    Ok(HttpResponse::Ok()
        .content_type("application/json")
        .body(body))
}

/// One group's posts; 404 for an unknown slug.
pub async fn group_feed(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    slug: web::Path<String>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let page = parse_page_param(query.page.as_deref());
    let service = FeedService::new((**pool).clone(), config.feed.posts_per_page);
    let (group, page_obj) = service.group_page(&slug, page).await?;

    Ok(HttpResponse::Ok().json(GroupContext { group, page_obj }))
}

/// Posts from followed authors; requires a logged-in viewer.
pub async fn follow_feed(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    identity: Identity,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let page = parse_page_param(query.page.as_deref());
    let service = FeedService::new((**pool).clone(), config.feed.posts_per_page);
    let page_obj = service.follow_page(identity.0, page).await?;

    Ok(HttpResponse::Ok().json(FollowFeedContext { page_obj }))
}

/// Custom not-found page context for unmatched routes.
pub async fn not_found(http_req: HttpRequest) -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "error": "Page not found",
        "path": http_req.path(),
        "status": 404,
    }))
}
