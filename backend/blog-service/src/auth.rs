/// Identity resolution for request handlers.
///
/// Session tokens are minted by the external identity service; this module
/// only validates them and hands handlers an explicit identity value
/// instead of ambient request state. `Identity` insists on a logged-in
/// user and turns its absence into the login redirect; `Viewer` resolves
/// to `None` for anonymous requests and never fails.
use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::future::{ready, Ready};
use uuid::Uuid;

use crate::error::AppError;

/// Claims carried by a session token.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub exp: i64,
}

/// HS256 keys derived from the configured session secret.
#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SessionKeys {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Mint a session token. Issuance in production belongs to the
    /// identity service; fixtures and tests use this.
    pub fn issue(
        &self,
        user_id: Uuid,
        ttl_secs: i64,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = SessionClaims {
            sub: user_id.to_string(),
            exp: chrono::Utc::now().timestamp() + ttl_secs,
        };
        encode(&Header::default(), &claims, &self.encoding)
    }

    pub fn verify(&self, token: &str) -> Option<Uuid> {
        let data = decode::<SessionClaims>(token, &self.decoding, &Validation::default()).ok()?;
        Uuid::parse_str(&data.claims.sub).ok()
    }
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_string)
}

fn session_cookie(req: &HttpRequest) -> Option<String> {
    req.cookie("session").map(|c| c.value().to_string())
}

fn resolve(req: &HttpRequest) -> Option<Uuid> {
    let keys = req.app_data::<web::Data<SessionKeys>>()?;
    let token = bearer_token(req).or_else(|| session_cookie(req))?;
    keys.verify(&token)
}

/// Resolved identity of an authenticated requester.
#[derive(Debug, Clone, Copy)]
pub struct Identity(pub Uuid);

impl FromRequest for Identity {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let resolved = resolve(req)
            .map(Identity)
            .ok_or_else(|| AppError::LoginRequired {
                next: req.path().to_string(),
            });
        ready(resolved)
    }
}

/// Identity of a viewer on a public page; anonymous is fine.
#[derive(Debug, Clone, Copy)]
pub struct Viewer(pub Option<Uuid>);

impl FromRequest for Viewer {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(Ok(Viewer(resolve(req))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_token_round_trips() {
        let keys = SessionKeys::new("test-secret");
        let user_id = Uuid::new_v4();
        let token = keys.issue(user_id, 3600).unwrap();
        assert_eq!(keys.verify(&token), Some(user_id));
    }

    #[test]
    fn expired_token_is_rejected() {
        let keys = SessionKeys::new("test-secret");
        // Past the default validation leeway.
        let token = keys.issue(Uuid::new_v4(), -300).unwrap();
        assert_eq!(keys.verify(&token), None);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let keys = SessionKeys::new("test-secret");
        let other = SessionKeys::new("other-secret");
        let token = other.issue(Uuid::new_v4(), 3600).unwrap();
        assert_eq!(keys.verify(&token), None);
    }

    #[test]
    fn garbage_token_is_rejected() {
        let keys = SessionKeys::new("test-secret");
        assert_eq!(keys.verify("not-a-token"), None);
    }
}
