use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::onboarding::store::ClientStateStore;
use crate::onboarding::{mark_completed, Step, Transition, Wizard, STEPS};
use crate::session::middleware::CurrentSession;
use crate::state::AppState;

#[derive(Serialize)]
pub struct OnboardingResponse {
    pub open: bool,
    pub current: usize,
    pub total: usize,
    pub step: &'static Step,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transition: Option<Transition>,
}

impl OnboardingResponse {
    fn new(wizard: &Wizard, transition: Option<Transition>) -> Self {
        Self {
            open: wizard.open,
            current: wizard.current,
            total: STEPS.len(),
            step: wizard.step(),
            transition,
        }
    }
}

/// GET /api/v1/onboarding
pub async fn handle_get_onboarding(
    Extension(CurrentSession(session)): Extension<CurrentSession>,
) -> Json<OnboardingResponse> {
    let wizard = session.onboarding.lock().await;
    Json(OnboardingResponse::new(&wizard, None))
}

/// POST /api/v1/onboarding/:action
pub async fn handle_onboarding_action(
    State(state): State<AppState>,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
    Path(action): Path<String>,
) -> Result<Json<OnboardingResponse>, AppError> {
    let user_id = session.user.read().await.id.clone();
    let mut wizard = session.onboarding.lock().await;
    let transition =
        apply_action(&mut wizard, &action, state.client_state.as_ref(), &user_id).await?;
    Ok(Json(OnboardingResponse::new(&wizard, Some(transition))))
}

/// Moves the wizard. A completion whose flag cannot be stored leaves the
/// wizard as it was.
async fn apply_action(
    wizard: &mut Wizard,
    action: &str,
    store: &dyn ClientStateStore,
    user_id: &str,
) -> Result<Transition, AppError> {
    let before = *wizard;
    let transition = match action {
        "next" => wizard.next(),
        "prev" => wizard.prev(),
        "skip" => wizard.skip(),
        "reopen" => {
            wizard.reopen();
            Transition::Moved
        }
        other => {
            return Err(AppError::Validation(format!(
                "Unknown onboarding action '{other}'"
            )))
        }
    };

    if transition == Transition::Completed {
        if let Err(e) = mark_completed(store, user_id).await {
            *wizard = before;
            return Err(e);
        }
    }
    Ok(transition)
}
