/// Post handlers - detail page and the create/edit flow
use crate::auth::Identity;
use crate::db::user_repo;
use crate::error::{AppError, Result};
use crate::forms::{field_errors, FormErrors, CommentForm, PostForm};
use crate::handlers::redirect_to;
use crate::models::{CommentView, PostView};
use crate::services::PostService;
use actix_web::{web, HttpResponse};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// Context for the create/edit form page, blank, bound, or re-rendered
/// with errors.
#[derive(Debug, Serialize)]
pub struct PostFormContext {
    pub is_edit: bool,
    pub post_id: Option<Uuid>,
    pub form: PostForm,
    pub errors: FormErrors,
}

/// Context for the detail page: the post, its comments, and the comment
/// form (blank, or carrying errors after an invalid submission).
#[derive(Debug, Serialize)]
pub struct PostDetailContext {
    pub post: PostView,
    pub comments: Vec<CommentView>,
    pub form: CommentForm,
    pub errors: FormErrors,
}

/// Validate a submitted post form, including that a chosen group exists.
/// A dangling group id is a field error, not a server error.
async fn validate_post_form(service: &PostService, form: &PostForm) -> Result<FormErrors> {
    let mut errors = match form.validate() {
        Ok(()) => FormErrors::new(),
        Err(e) => field_errors(&e),
    };

    if let Some(group_id) = form.group {
        if !service.group_exists(group_id).await? {
            errors
                .entry("group".to_string())
                .or_default()
                .push("Select a valid group".to_string());
        }
    }

    Ok(errors)
}

/// Post detail page; visible to anyone.
pub async fn post_detail(
    pool: web::Data<PgPool>,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let service = PostService::new((**pool).clone());
    let (post, comments) = service.detail(*post_id).await?;

    Ok(HttpResponse::Ok().json(PostDetailContext {
        post,
        comments,
        form: CommentForm::default(),
        errors: FormErrors::new(),
    }))
}

/// Blank create form; requires a logged-in user.
pub async fn create_post_page(_identity: Identity) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(PostFormContext {
        is_edit: false,
        post_id: None,
        form: PostForm::default(),
        errors: FormErrors::new(),
    }))
}

/// Create a post. On success the flow moves to the author's profile; on
/// validation failure the form re-renders with field errors.
pub async fn create_post(
    pool: web::Data<PgPool>,
    identity: Identity,
    payload: web::Json<PostForm>,
) -> Result<HttpResponse> {
    let service = PostService::new((**pool).clone());
    let form = payload.trimmed();

    let errors = validate_post_form(&service, &form).await?;
    if !errors.is_empty() {
        return Ok(HttpResponse::Ok().json(PostFormContext {
            is_edit: false,
            post_id: None,
            form,
            errors,
        }));
    }

    service.create_post(identity.0, &form).await?;

    let author = user_repo::find_user_by_id(pool.get_ref(), identity.0)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {}", identity.0)))?;

    Ok(redirect_to(&format!("/profile/{}/", author.username)))
}

/// Edit form bound with the post's current values. Someone else's post
/// silently redirects to the read-only detail page.
pub async fn edit_post_page(
    pool: web::Data<PgPool>,
    identity: Identity,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let service = PostService::new((**pool).clone());
    let post = service
        .get_post(*post_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post {}", post_id)))?;

    if post.author_id != identity.0 {
        return Ok(redirect_to(&format!("/posts/{}/", post.id)));
    }

    Ok(HttpResponse::Ok().json(PostFormContext {
        is_edit: true,
        post_id: Some(post.id),
        form: PostForm {
            text: post.text,
            group: post.group_id,
            image_key: post.image_key,
        },
        errors: FormErrors::new(),
    }))
}

/// Apply an edit. Ownership is re-checked on the write path; the
/// publication timestamp moves to "now" on success.
pub async fn edit_post(
    pool: web::Data<PgPool>,
    identity: Identity,
    post_id: web::Path<Uuid>,
    payload: web::Json<PostForm>,
) -> Result<HttpResponse> {
    let service = PostService::new((**pool).clone());
    let post = service
        .get_post(*post_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post {}", post_id)))?;

    if post.author_id != identity.0 {
        return Ok(redirect_to(&format!("/posts/{}/", post.id)));
    }

    let form = payload.trimmed();
    let errors = validate_post_form(&service, &form).await?;
    if !errors.is_empty() {
        return Ok(HttpResponse::Ok().json(PostFormContext {
            is_edit: true,
            post_id: Some(post.id),
            form,
            errors,
        }));
    }

    service.update_post(post.id, &form).await?;

    Ok(redirect_to(&format!("/posts/{}/", post.id)))
}
