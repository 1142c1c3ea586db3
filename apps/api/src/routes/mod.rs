pub mod auth;
pub mod cover_letter;
pub mod dashboard;
pub mod health;
pub mod onboarding;
pub mod reference;
pub mod subscription;
pub mod vacancies;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::session::middleware::require_session;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    // Public routes (no session required)
    let public = Router::new()
        .route("/health", get(health::health_handler))
        .route("/auth/login", get(auth::handle_login))
        .route("/auth/callback", get(auth::handle_callback))
        .route("/auth/logout", post(auth::handle_logout));

    // Session routes (require the session cookie)
    let protected = Router::new()
        .route("/api/v1/session", get(dashboard::handle_get_session))
        .route("/api/v1/dashboard", get(dashboard::handle_get_dashboard))
        .route("/api/v1/dashboard/refresh", post(dashboard::handle_refresh))
        .route("/api/v1/dashboard/tab", put(dashboard::handle_select_tab))
        .route("/api/v1/dashboard/view", get(dashboard::handle_get_view))
        .route("/api/v1/vacancies/search", post(vacancies::handle_search))
        .route("/api/v1/vacancies/:id/apply", post(vacancies::handle_apply))
        .route(
            "/api/v1/cover-letter/config",
            get(cover_letter::handle_get_config).patch(cover_letter::handle_patch_config),
        )
        .route(
            "/api/v1/cover-letter/generate",
            post(cover_letter::handle_generate),
        )
        .route("/api/v1/onboarding", get(onboarding::handle_get_onboarding))
        .route(
            "/api/v1/onboarding/:action",
            post(onboarding::handle_onboarding_action),
        )
        .route(
            "/api/v1/subscription/plans",
            get(subscription::handle_list_plans),
        )
        .route(
            "/api/v1/subscription/upgrade",
            post(subscription::handle_upgrade),
        )
        .route(
            "/api/v1/reference/dictionaries",
            get(reference::handle_dictionaries),
        )
        .route("/api/v1/reference/areas", get(reference::handle_areas))
        .route(
            "/api/v1/reference/professional_roles",
            get(reference::handle_professional_roles),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .with_state(state)
}
