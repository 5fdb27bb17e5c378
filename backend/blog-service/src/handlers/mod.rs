/// HTTP handlers for the page-facing endpoints
///
/// Each handler loads entities through the service layer and emits the
/// render context consumed by the external templating collaborator, or a
/// 302 redirect where the page flow navigates away (after a mutation,
/// when a login is required, or on a denied edit).
pub mod comments;
pub mod feed;
pub mod posts;
pub mod profiles;

// Re-export handler functions at module level
pub use comments::add_comment;
pub use feed::{follow_feed, group_feed, index, not_found};
pub use posts::{create_post, create_post_page, edit_post, edit_post_page, post_detail};
pub use profiles::{follow_author, profile, unfollow_author};

use actix_web::http::header;
use actix_web::HttpResponse;
use serde::Deserialize;

/// 302 to `location`, the navigation primitive of the page flow.
pub(crate) fn redirect_to(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location.to_string()))
        .finish()
}

/// Query parameters shared by the paginated listings. The page value is
/// kept raw so a non-numeric value degrades to page 1 instead of a 400.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn redirect_is_302_with_location() {
        let resp = redirect_to("/profile/alice/");
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(
            resp.headers().get(header::LOCATION).unwrap(),
            "/profile/alice/"
        );
    }
}
