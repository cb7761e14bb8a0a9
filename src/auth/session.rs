use axum_extra::extract::cookie::{Cookie, SameSite};
use time::Duration;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "token";

/// Builds the session cookie set on register and login. `secure` follows
/// the environment so local HTTP development keeps working.
pub fn session_cookie(token: String, ttl: Duration, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(ttl)
        .build()
}

/// Builds the already-expired cookie that clears a session on logout.
pub fn clear_session_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(Duration::ZERO)
        .build()
}
