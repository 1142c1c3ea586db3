use axum::{extract::State, Extension, Json};
use serde::Deserialize;

use crate::dashboard::view::TabView;
use crate::dashboard::{DashboardSnapshot, Tab};
use crate::errors::AppError;
use crate::models::user::User;
use crate::session::middleware::CurrentSession;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SelectTabRequest {
    pub tab: Tab,
}

/// GET /api/v1/session
pub async fn handle_get_session(
    Extension(CurrentSession(session)): Extension<CurrentSession>,
) -> Json<User> {
    Json(session.user.read().await.clone())
}

/// GET /api/v1/dashboard
pub async fn handle_get_dashboard(
    Extension(CurrentSession(session)): Extension<CurrentSession>,
) -> Json<DashboardSnapshot> {
    Json(session.dashboard.snapshot().await)
}

/// POST /api/v1/dashboard/refresh
///
/// A failed refresh is not an error: the previous data stays and the phase
/// still ends at `ready`.
pub async fn handle_refresh(
    State(state): State<AppState>,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
) -> Result<Json<DashboardSnapshot>, AppError> {
    let source = session.source(&state.hh, &state.llm);
    session.dashboard.load(&source).await;
    Ok(Json(session.dashboard.snapshot().await))
}

/// PUT /api/v1/dashboard/tab
pub async fn handle_select_tab(
    Extension(CurrentSession(session)): Extension<CurrentSession>,
    Json(req): Json<SelectTabRequest>,
) -> Json<DashboardSnapshot> {
    session.dashboard.select_tab(req.tab).await;
    Json(session.dashboard.snapshot().await)
}

/// GET /api/v1/dashboard/view
pub async fn handle_get_view(
    Extension(CurrentSession(session)): Extension<CurrentSession>,
) -> Json<TabView> {
    let user = session.user.read().await;
    Json(session.dashboard.view(&user).await)
}
