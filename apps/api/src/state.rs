use std::sync::Arc;

use crate::config::Config;
use crate::hh_client::HhClient;
use crate::llm_client::LlmClient;
use crate::onboarding::store::ClientStateStore;
use crate::session::oauth::PendingStates;
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub hh: HhClient,
    pub llm: LlmClient,
    pub sessions: Arc<SessionStore>,
    /// OAuth `state` values issued by `/auth/login`.
    pub pending: Arc<PendingStates>,
    /// Per-user flags that outlive sessions (onboarding completion).
    pub client_state: Arc<dyn ClientStateStore>,
}
