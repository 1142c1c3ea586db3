//! Logged-in sessions.
//!
//! A session owns everything tied to one login: the provider token, the
//! assembled user, the dashboard, the onboarding wizard and the background
//! sync task. Sessions live in `SessionStore` and are found per request via
//! the `otclick_session` cookie.

pub mod assemble;
pub mod cookies;
pub mod middleware;
pub mod oauth;

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tokio::sync::{Mutex, RwLock};
use tracing::info;
use uuid::Uuid;

use crate::dashboard::source::ProviderSource;
use crate::dashboard::sync::{resync_tick, SyncTask};
use crate::dashboard::Dashboard;
use crate::hh_client::{AccessToken, HhClient};
use crate::llm_client::LlmClient;
use crate::models::user::User;
use crate::onboarding::Wizard;

/// Server-side session lifetime.
pub const SESSION_TTL: Duration = Duration::from_secs(24 * 60 * 60);

pub struct Session {
    pub id: Uuid,
    token: AccessToken,
    pub user: RwLock<User>,
    pub dashboard: Dashboard,
    pub onboarding: Mutex<Wizard>,
    sync: SyncTask,
    created_at: Instant,
}

impl Session {
    /// Starts a session and its resync task. Must be called inside a Tokio
    /// runtime.
    pub fn start(
        user: User,
        token: AccessToken,
        onboarding_open: bool,
        sync_interval: Duration,
    ) -> Arc<Self> {
        let id = Uuid::new_v4();
        let sync = SyncTask::spawn(sync_interval, move || resync_tick(id));
        Arc::new(Self {
            id,
            token,
            user: RwLock::new(user),
            dashboard: Dashboard::new(),
            onboarding: Mutex::new(Wizard::new(onboarding_open)),
            sync,
            created_at: Instant::now(),
        })
    }

    pub fn token(&self) -> &AccessToken {
        &self.token
    }

    /// Production data source for this session's dashboard.
    pub fn source(&self, hh: &HhClient, llm: &LlmClient) -> ProviderSource {
        ProviderSource::new(hh.clone(), llm.clone(), self.token.clone())
    }

    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.created_at.elapsed() >= ttl
    }

    pub fn stop_sync(&self) {
        self.sync.stop();
    }

    #[cfg(test)]
    pub fn sync_finished(&self) -> bool {
        self.sync.is_finished()
    }
}

pub struct SessionStore {
    sessions: DashMap<Uuid, Arc<Session>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::with_ttl(SESSION_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl,
        }
    }

    pub fn insert(&self, session: Arc<Session>) {
        self.sessions.insert(session.id, session);
    }

    /// Live session by id. Expired sessions are evicted on lookup.
    pub fn get(&self, id: &Uuid) -> Option<Arc<Session>> {
        let session = self.sessions.get(id).map(|s| Arc::clone(s.value()))?;
        if session.is_expired(self.ttl) {
            self.remove(id);
            return None;
        }
        Some(session)
    }

    pub fn remove(&self, id: &Uuid) -> Option<Arc<Session>> {
        let (_, session) = self.sessions.remove(id)?;
        session.stop_sync();
        info!("Session {id} closed");
        Some(session)
    }

    pub fn cleanup(&self) {
        let ttl = self.ttl;
        self.sessions.retain(|_, s| {
            let keep = !s.is_expired(ttl);
            if !keep {
                s.stop_sync();
            }
            keep
        });
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn spawn_cleanup_task(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let store = Arc::clone(self);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(300));
            loop {
                interval.tick().await;
                store.cleanup();
            }
        })
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::Profile;

    fn test_user() -> User {
        User::from_provider(
            Profile {
                id: "42".to_string(),
                name: "Ivan Petrov".to_string(),
                avatar_url: String::new(),
            },
            vec![],
            vec![],
        )
    }

    fn start() -> Arc<Session> {
        Session::start(
            test_user(),
            AccessToken::new("tok"),
            true,
            Duration::from_secs(300),
        )
    }

    #[tokio::test]
    async fn test_insert_get_remove() {
        let store = SessionStore::new();
        let session = start();
        let id = session.id;
        store.insert(session);

        assert!(store.get(&id).is_some());
        assert!(store.remove(&id).is_some());
        assert!(store.get(&id).is_none());
    }

    #[tokio::test]
    async fn test_remove_stops_sync_task() {
        let store = SessionStore::new();
        let session = start();
        let id = session.id;
        store.insert(Arc::clone(&session));

        store.remove(&id);
        tokio::task::yield_now().await;
        for _ in 0..10 {
            if session.sync_finished() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(session.sync_finished());
    }

    #[tokio::test]
    async fn test_expired_sessions_are_evicted() {
        let store = SessionStore::with_ttl(Duration::ZERO);
        let session = start();
        let id = session.id;
        store.insert(session);
        store.insert(start());

        assert!(store.get(&id).is_none());
        store.cleanup();
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn test_token_stays_out_of_user_json() {
        let session = Session::start(
            test_user(),
            AccessToken::new("secret-bearer-xyz"),
            false,
            Duration::from_secs(300),
        );
        let json = serde_json::to_string(&*session.user.read().await).unwrap();
        assert!(!json.contains("secret-bearer-xyz"));
        assert_eq!(session.token().secret(), "secret-bearer-xyz");
    }
}
