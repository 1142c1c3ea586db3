//! Session middleware: resolves the session cookie to a live `Session`.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use uuid::Uuid;

use crate::errors::AppError;
use crate::session::cookies::SESSION_COOKIE;
use crate::session::Session;
use crate::state::AppState;

/// Stored in request extensions for handlers behind `require_session`.
#[derive(Clone)]
pub struct CurrentSession(pub Arc<Session>);

pub async fn require_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let session = jar
        .get(SESSION_COOKIE)
        .and_then(|c| Uuid::parse_str(c.value()).ok())
        .and_then(|id| state.sessions.get(&id))
        .ok_or(AppError::Unauthorized)?;

    request.extensions_mut().insert(CurrentSession(session));
    Ok(next.run(request).await)
}
