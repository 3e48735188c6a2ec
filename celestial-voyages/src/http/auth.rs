use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::prelude::*;
use tracing::{debug, warn};

use crate::model::User;

use super::error::ApiError;
use super::state::AppState;

pub const SESSION_COOKIE: &str = "voyages_session";

/// Resolves the caller from the session cookie, falling back to HTTP Basic
/// credentials of a registered account.
pub async fn current_user(state: &AppState, jar: &CookieJar, headers: &HeaderMap) -> Option<User> {
    if let Some(user_id) = jar
        .get(SESSION_COOKIE)
        .and_then(|cookie| state.sessions.get(cookie.value()))
    {
        if let Some(user) = state.store.read().await.user(user_id).cloned() {
            debug!(user_id, "authorized request using session");
            return Some(user);
        }
    }

    if let Some((username, password)) = extract_basic_auth(headers) {
        let store = state.store.read().await;
        if let Some(user) = store
            .user_by_username(&username)
            .filter(|user| user.password.verify(&password))
        {
            debug!(user_id = user.id, "authorized request using basic auth");
            return Some(user.clone());
        }
    }

    None
}

pub async fn require_user(
    state: &AppState,
    jar: &CookieJar,
    headers: &HeaderMap,
) -> Result<User, ApiError> {
    match current_user(state, jar, headers).await {
        Some(user) => Ok(user),
        None => {
            warn!("unauthorized request");
            Err(ApiError::Unauthorized("Unauthorized"))
        }
    }
}

pub fn session_cookie(state: &AppState, token: String) -> Cookie<'static> {
    let max_age = i64::try_from(state.sessions.ttl().as_secs()).unwrap_or(i64::MAX);
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.secure_cookies)
        .max_age(cookie::time::Duration::seconds(max_age))
        .build()
}

pub fn expired_session_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE).path("/").build()
}

pub fn extract_basic_auth(headers: &HeaderMap) -> Option<(String, String)> {
    let raw = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())?;
    let mut parts = raw.split_whitespace();
    let scheme = parts.next()?;
    let encoded = parts.next()?;
    if !scheme.eq_ignore_ascii_case("basic") || parts.next().is_some() {
        return None;
    }
    let decoded = BASE64_STANDARD.decode(encoded).ok()?;
    let credentials = String::from_utf8(decoded).ok()?;
    let (username, password) = credentials.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

#[cfg(test)]
mod tests {
    use axum::http::header::AUTHORIZATION;
    use axum::http::{HeaderMap, HeaderValue};

    use super::extract_basic_auth;

    #[test]
    fn basic_auth_requires_scheme_and_single_token() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic YWRhOnNlY3JldDE="));
        assert_eq!(
            extract_basic_auth(&headers),
            Some((String::from("ada"), String::from("secret1")))
        );

        headers.insert(AUTHORIZATION, HeaderValue::from_static("YWRhOnNlY3JldDE="));
        assert_eq!(extract_basic_auth(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer YWRhOnNlY3JldDE="));
        assert_eq!(extract_basic_auth(&headers), None);
    }
}
