//! OAuth code-flow plumbing: pending `state` values and callback handling.
//!
//! A state is only redeemable by the browser that started the login: the
//! callback must carry it both in the query and in the `otclick_oauth_state`
//! cookie set by `/auth/login`.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde::Deserialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::hh_client::{AccessToken, HhClient};

/// How long an issued `state` stays redeemable.
pub const STATE_TTL: Duration = Duration::from_secs(600);

/// `state` values issued by `/auth/login` and not yet redeemed.
pub struct PendingStates {
    states: DashMap<String, Instant>,
    ttl: Duration,
}

impl PendingStates {
    pub fn new() -> Self {
        Self::with_ttl(STATE_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            states: DashMap::new(),
            ttl,
        }
    }

    /// Issues a fresh random state.
    pub fn issue(&self) -> String {
        let state = Uuid::new_v4().simple().to_string();
        self.states.insert(state.clone(), Instant::now());
        state
    }

    /// Redeems a state. Each state works once; expired ones are rejected.
    pub fn take(&self, state: &str) -> bool {
        match self.states.remove(state) {
            Some((_, issued_at)) => issued_at.elapsed() < self.ttl,
            None => false,
        }
    }

    pub fn cleanup(&self) {
        let ttl = self.ttl;
        self.states.retain(|_, issued_at| issued_at.elapsed() < ttl);
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn spawn_cleanup_task(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let store = Arc::clone(self);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(60));
            loop {
                interval.tick().await;
                store.cleanup();
            }
        })
    }
}

impl Default for PendingStates {
    fn default() -> Self {
        Self::new()
    }
}

/// Query string of the provider's redirect back to us.
#[derive(Debug, Default, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub error: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Callback {
    /// Plain visit to the callback URL; nothing to do.
    NotACallback,
    Code { code: String, state: Option<String> },
}

/// Sorts the redirect parameters. `error` wins over everything else.
pub fn classify(params: CallbackParams) -> Result<Callback, AppError> {
    if let Some(error) = params.error {
        return Err(AppError::Authorization(error));
    }
    Ok(match params.code {
        Some(code) => Callback::Code {
            code,
            state: params.state,
        },
        None => Callback::NotACallback,
    })
}

/// Processes the provider redirect. `browser_state` is the state cookie sent
/// with the callback. `Ok(None)` means the request carried no callback
/// parameters.
pub async fn handle_redirect(
    params: CallbackParams,
    browser_state: Option<&str>,
    pending: &PendingStates,
    hh: &HhClient,
) -> Result<Option<AccessToken>, AppError> {
    let (code, state) = match classify(params) {
        Ok(Callback::NotACallback) => {
            debug!("Callback hit without code or error");
            return Ok(None);
        }
        Ok(Callback::Code { code, state }) => (code, state),
        Err(e) => {
            warn!("{e}");
            return Err(e);
        }
    };

    let Some(state) = state.filter(|s| Some(s.as_str()) == browser_state) else {
        warn!("Rejected callback whose state is not bound to this browser");
        return Err(AppError::StateMismatch);
    };
    if !pending.take(&state) {
        warn!("Rejected callback with unknown or expired state");
        return Err(AppError::StateMismatch);
    }

    let token = hh.exchange_code_for_token(&code).await?;
    info!("Authorization code exchanged for access token");
    Ok(Some(token))
}
