use async_trait::async_trait;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, HeaderMap},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::debug;

use super::{claims::Claims, jwt::JwtKeys};
use crate::error::AppError;

pub const SESSION_COOKIE: &str = "auth_token";
const SESSION_MAX_AGE_DAYS: i64 = 7;

/// Resolves the caller from the session cookie; `None` when absent or invalid.
pub fn resolve_caller(headers: &HeaderMap, keys: &JwtKeys) -> Option<Claims> {
    let jar = CookieJar::from_headers(headers);
    let Some(cookie) = jar.get(SESSION_COOKIE) else {
        debug!("no session cookie");
        return None;
    };
    let claims = keys.verify(cookie.value());
    debug!(
        token_len = cookie.value().len(),
        verified = claims.is_some(),
        "session cookie checked"
    );
    claims
}

/// Verified session claims of the caller.
pub struct AuthUser(pub Claims);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        resolve_caller(&parts.headers, &keys)
            .map(AuthUser)
            .ok_or_else(|| AppError::Auth("Not authenticated".into()))
    }
}

/// HttpOnly, SameSite=Lax, 7-day session cookie.
pub fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(time::Duration::days(SESSION_MAX_AGE_DAYS))
        .build()
}

/// Always emits an expired cookie, whether or not the request carried one.
pub fn clear_session_cookie(jar: CookieJar) -> CookieJar {
    let mut cookie = Cookie::build((SESSION_COOKIE, "")).path("/").build();
    cookie.make_removal();
    jar.add(cookie)
}
