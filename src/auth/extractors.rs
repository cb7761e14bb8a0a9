use axum::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum_extra::extract::cookie::CookieJar;
use tracing::warn;
use uuid::Uuid;

use crate::auth::jwt::JwtKeys;
use crate::auth::session::SESSION_COOKIE;
use crate::error::ApiError;

/// Caller identity, resolved from the session cookie. Handlers taking this
/// extractor reject unauthenticated requests before running.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(SESSION_COOKIE)
            .map(|cookie| cookie.value().to_owned())
            .ok_or(ApiError::Unauthenticated("Not authenticated"))?;

        let keys = JwtKeys::from_ref(state);
        let claims = keys.verify(&token).map_err(|e| {
            warn!(error = %e, "session token rejected");
            ApiError::Unauthenticated("Invalid or expired token")
        })?;

        Ok(AuthUser(claims.sub))
    }
}
