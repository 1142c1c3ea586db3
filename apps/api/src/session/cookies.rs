//! Session and OAuth state cookie helpers.

use axum_extra::extract::cookie::{Cookie, SameSite};
use time::Duration;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "otclick_session";

pub const OAUTH_STATE_COOKIE: &str = "otclick_oauth_state";

/// Matches the server-side session lifetime.
const SESSION_MAX_AGE_HOURS: i64 = 24;

/// Matches `oauth::STATE_TTL`.
const OAUTH_STATE_MAX_AGE_MINUTES: i64 = 10;

pub fn session_cookie(session_id: Uuid) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE.to_string(), session_id.to_string()))
        .http_only(true)
        .secure(false) // TODO: set true once the service is only reachable over https
        .same_site(SameSite::Lax)
        .path("/".to_string())
        .max_age(Duration::hours(SESSION_MAX_AGE_HOURS))
        .build()
}

pub fn clear_session_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE.to_string(), String::new()))
        .http_only(true)
        .secure(false)
        .same_site(SameSite::Lax)
        .path("/".to_string())
        .max_age(Duration::ZERO)
        .build()
}

/// Binds a pending OAuth state to the browser that started the login. Lax
/// so it survives the top-level redirect back from the provider.
pub fn oauth_state_cookie(state: &str) -> Cookie<'static> {
    Cookie::build((OAUTH_STATE_COOKIE.to_string(), state.to_string()))
        .http_only(true)
        .secure(false)
        .same_site(SameSite::Lax)
        .path("/auth".to_string())
        .max_age(Duration::minutes(OAUTH_STATE_MAX_AGE_MINUTES))
        .build()
}

pub fn clear_oauth_state_cookie() -> Cookie<'static> {
    Cookie::build((OAUTH_STATE_COOKIE.to_string(), String::new()))
        .http_only(true)
        .secure(false)
        .same_site(SameSite::Lax)
        .path("/auth".to_string())
        .max_age(Duration::ZERO)
        .build()
}
