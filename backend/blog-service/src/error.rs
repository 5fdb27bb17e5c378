/// Error types for blog-service
///
/// Errors are converted to HTTP responses: missing entities become 404s,
/// a missing identity becomes a redirect into the login flow, everything
/// else is a 500. Form validation failures are not errors at all — the
/// handlers fold them back into the page context they re-render.
use actix_web::http::{header, StatusCode};
use actix_web::{error::ResponseError, HttpResponse};
use thiserror::Error;

/// Result type for blog-service operations
pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// A protected page was requested without a resolvable identity.
    /// Rendered as a redirect to the login flow carrying the original URL.
    #[error("Login required for {next}")]
    LoginRequired { next: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Login URL used in the redirect. The login flow itself belongs to
    /// the external identity service; only the path is agreed on.
    pub fn login_location(next: &str) -> String {
        format!("/auth/login/?next={}", next)
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(_) | AppError::Cache(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::LoginRequired { .. } => StatusCode::FOUND,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::LoginRequired { next } => HttpResponse::Found()
                .insert_header((header::LOCATION, Self::login_location(next)))
                .finish(),
            _ => {
                let status = self.status_code();
                HttpResponse::build(status).json(serde_json::json!({
                    "error": self.to_string(),
                    "status": status.as_u16(),
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404() {
        let err = AppError::NotFound("post".into());
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn login_required_redirects_with_next() {
        let err = AppError::LoginRequired {
            next: "/create/".into(),
        };
        let resp = err.error_response();
        assert_eq!(resp.status(), StatusCode::FOUND);
        let location = resp
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap();
        assert_eq!(location, "/auth/login/?next=/create/");
    }

    #[test]
    fn storage_errors_map_to_500() {
        let err = AppError::Internal("boom".into());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
