//! Provider reference data, passed through untouched.

use axum::{extract::State, Extension, Json};
use serde_json::Value;

use crate::errors::AppError;
use crate::session::middleware::CurrentSession;
use crate::state::AppState;

/// GET /api/v1/reference/dictionaries
pub async fn handle_dictionaries(
    State(state): State<AppState>,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
) -> Result<Json<Value>, AppError> {
    Ok(Json(state.hh.get_dictionaries(session.token()).await?))
}

/// GET /api/v1/reference/areas
pub async fn handle_areas(
    State(state): State<AppState>,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
) -> Result<Json<Value>, AppError> {
    Ok(Json(state.hh.get_areas(session.token()).await?))
}

/// GET /api/v1/reference/professional_roles
pub async fn handle_professional_roles(
    State(state): State<AppState>,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
) -> Result<Json<Value>, AppError> {
    Ok(Json(state.hh.get_professional_roles(session.token()).await?))
}
