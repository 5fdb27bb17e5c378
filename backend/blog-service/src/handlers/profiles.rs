/// Profile handlers - author pages and the follow/unfollow actions
use crate::auth::{Identity, Viewer};
use crate::config::Config;
use crate::db::user_repo;
use crate::error::{AppError, Result};
use crate::handlers::{redirect_to, PageQuery};
use crate::models::{PostView, User};
use crate::services::pagination::parse_page_param;
use crate::services::{FeedService, FollowService, Page};
use actix_web::{web, HttpResponse};
use serde::Serialize;
use sqlx::PgPool;

#[derive(Debug, Serialize)]
pub struct ProfileContext {
    pub author: User,
    pub page_obj: Page<PostView>,
    /// Whether the current viewer already follows this author.
    pub following: bool,
    pub followers: i64,
}

/// An author's page: their posts plus follow state for the viewer.
/// Anonymous viewers see `following: false`.
pub async fn profile(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    viewer: Viewer,
    username: web::Path<String>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let page = parse_page_param(query.page.as_deref());
    let service = FeedService::new((**pool).clone(), config.feed.posts_per_page);
    let feed = service.profile_page(&username, viewer.0, page).await?;

    Ok(HttpResponse::Ok().json(ProfileContext {
        author: feed.author,
        page_obj: feed.page,
        following: feed.following,
        followers: feed.followers,
    }))
}

/// Follow an author. Idempotent; following yourself is a silent no-op.
/// Either way the flow returns to the author's profile.
pub async fn follow_author(
    pool: web::Data<PgPool>,
    identity: Identity,
    username: web::Path<String>,
) -> Result<HttpResponse> {
    let author = user_repo::find_user_by_username(pool.get_ref(), &username)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user '{}'", username)))?;

    let service = FollowService::new((**pool).clone());
    service.follow(identity.0, author.id).await?;

    Ok(redirect_to(&format!("/profile/{}/", author.username)))
}

/// Unfollow an author; 404 when there is no edge to remove.
pub async fn unfollow_author(
    pool: web::Data<PgPool>,
    identity: Identity,
    username: web::Path<String>,
) -> Result<HttpResponse> {
    let author = user_repo::find_user_by_username(pool.get_ref(), &username)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user '{}'", username)))?;

    let service = FollowService::new((**pool).clone());
    let removed = service.unfollow(identity.0, author.id).await?;
    if !removed {
        return Err(AppError::NotFound(format!(
            "follow of '{}' by the current user",
            author.username
        )));
    }

    Ok(redirect_to(&format!("/profile/{}/", author.username)))
}
