use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Redirect,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::{AppError, LoginFailure};
use crate::onboarding::should_auto_open;
use crate::session::assemble::assemble_session;
use crate::session::cookies::{
    clear_oauth_state_cookie, clear_session_cookie, oauth_state_cookie, session_cookie,
    OAUTH_STATE_COOKIE, SESSION_COOKIE,
};
use crate::session::oauth::{handle_redirect, CallbackParams};
use crate::session::Session;
use crate::state::AppState;

/// GET /auth/login
///
/// The issued state also goes into a cookie so the callback can tell that it
/// returns to the same browser.
pub async fn handle_login(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect), AppError> {
    let oauth_state = state.pending.issue();
    let url = state.hh.authorization_url(&oauth_state)?;
    Ok((jar.add(oauth_state_cookie(&oauth_state)), Redirect::to(&url)))
}

/// GET /auth/callback
///
/// On success the session cookie is set and the browser is sent home with a
/// clean URL, so a refresh cannot replay the code.
pub async fn handle_callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<CallbackParams>,
) -> Result<(CookieJar, Redirect), LoginFailure> {
    let home = state.config.home_path.clone();
    let fail = |error: AppError| LoginFailure {
        error,
        home: home.clone(),
    };

    let browser_state = jar.get(OAUTH_STATE_COOKIE).map(|c| c.value().to_string());
    let Some(token) = handle_redirect(params, browser_state.as_deref(), &state.pending, &state.hh)
        .await
        .map_err(fail)?
    else {
        return Ok((jar, Redirect::to(&home)));
    };
    let jar = jar.add(clear_oauth_state_cookie());

    let user = assemble_session(&state.hh, &token).await.map_err(fail)?;
    let onboarding_open = match should_auto_open(state.client_state.as_ref(), &user.id).await {
        Ok(open) => open,
        Err(e) => {
            warn!("Could not read onboarding flag, showing onboarding: {e}");
            true
        }
    };

    let session = Session::start(user, token, onboarding_open, state.config.sync_interval);
    state.sessions.insert(session.clone());
    info!("Session {} started", session.id);

    let source = session.source(&state.hh, &state.llm);
    let loading = session.clone();
    tokio::spawn(async move {
        loading.dashboard.load(&source).await;
    });

    Ok((jar.add(session_cookie(session.id)), Redirect::to(&home)))
}

/// POST /auth/logout
pub async fn handle_logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, StatusCode) {
    if let Some(id) = jar
        .get(SESSION_COOKIE)
        .and_then(|c| Uuid::parse_str(c.value()).ok())
    {
        state.sessions.remove(&id);
    }
    (jar.add(clear_session_cookie()), StatusCode::NO_CONTENT)
}
