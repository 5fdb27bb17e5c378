/// Comment handler - attach a comment to a post
use crate::auth::Identity;
use crate::error::Result;
use crate::forms::{field_errors, CommentForm};
use crate::handlers::posts::PostDetailContext;
use crate::handlers::redirect_to;
use crate::services::{CommentService, PostService};
use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// Add a comment to a post. On success the flow returns to the detail
/// page; an invalid submission re-renders the detail context with field
/// errors instead of dropping the request on the floor.
pub async fn add_comment(
    pool: web::Data<PgPool>,
    identity: Identity,
    post_id: web::Path<Uuid>,
    payload: web::Json<CommentForm>,
) -> Result<HttpResponse> {
    let posts = PostService::new((**pool).clone());
    let (post, comments) = posts.detail(*post_id).await?;

    let form = payload.trimmed();
    if let Err(e) = form.validate() {
        return Ok(HttpResponse::Ok().json(PostDetailContext {
            post,
            comments,
            errors: field_errors(&e),
            form,
        }));
    }

    let service = CommentService::new((**pool).clone());
    service.add_comment(post.id, identity.0, &form.text).await?;

    Ok(redirect_to(&format!("/posts/{}/", post.id)))
}
