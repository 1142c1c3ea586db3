//! Dashboard orchestration: the per-session data behind the four tabs.
//!
//! Flow: `Loading` → fan-out over a `DashboardSource` (resumes, application
//! logs, LLM availability) → chart bucketed from the logs → `Ready`. The join
//! is all-or-nothing; a failed load logs and keeps whatever was shown before.
//!
//! Loads are serialized, so results land in the order loads were started.
//! The phase reads `Ready` only once no load is in flight.

pub mod chart;
pub mod ledger;
pub mod letters;
pub mod source;
pub mod sync;
pub mod view;

use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

use crate::dashboard::chart::weekly_chart;
use crate::dashboard::ledger::SentLedger;
use crate::dashboard::source::DashboardSource;
use crate::dashboard::view::{build_view, TabView};
use crate::models::resume::{ApplicationLog, Resume};
use crate::models::user::User;
use crate::models::vacancy::{ChartData, FilterSettings, Vacancy};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Loading,
    Ready,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Dashboard,
    Vacancies,
    Applications,
    Settings,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub resumes: Vec<Resume>,
    pub application_logs: Vec<ApplicationLog>,
    pub chart: Vec<ChartData>,
    /// `None` until the first successful load.
    pub llm_available: Option<bool>,
    pub vacancies: Vec<Vacancy>,
    pub last_loaded_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub phase: Phase,
    pub active_tab: Tab,
    pub data: DashboardData,
}

#[derive(Debug)]
struct DashboardState {
    /// Set by the first load to finish, successful or not.
    settled: bool,
    tab: Tab,
    data: DashboardData,
    filters: FilterSettings,
}

#[derive(Debug)]
pub struct Dashboard {
    state: RwLock<DashboardState>,
    ledger: SentLedger,
    load_lock: Mutex<()>,
    loads_in_flight: AtomicUsize,
}

/// Counts a load as in flight until dropped.
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Dashboard {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(DashboardState {
                settled: false,
                tab: Tab::default(),
                data: DashboardData::default(),
                filters: FilterSettings::default(),
            }),
            ledger: SentLedger::default(),
            load_lock: Mutex::new(()),
            loads_in_flight: AtomicUsize::new(0),
        }
    }

    /// Fetches everything the dashboard shows in parallel. Returns whether
    /// fresh data was stored; on failure the previous data stays in place.
    pub async fn load(&self, source: &dyn DashboardSource) -> bool {
        let _in_flight = InFlight::enter(&self.loads_in_flight);
        let _serial = self.load_lock.lock().await;

        let joined = tokio::try_join!(
            source.resumes(),
            source.application_logs(),
            source.llm_available(),
        );

        let fresh = match joined {
            Ok((resumes, mut application_logs, llm_available)) => {
                let now = Utc::now();
                let chart = weekly_chart(&application_logs, now);
                self.ledger.annotate(&mut application_logs).await;
                let mut state = self.state.write().await;
                state.data.resumes = resumes;
                state.data.application_logs = application_logs;
                state.data.chart = chart;
                state.data.llm_available = Some(llm_available);
                state.data.last_loaded_at = Some(now);
                info!(
                    "Dashboard loaded: {} resumes, {} applications",
                    state.data.resumes.len(),
                    state.data.application_logs.len()
                );
                true
            }
            Err(e) => {
                warn!("Dashboard load failed, keeping previous data: {e}");
                false
            }
        };

        self.state.write().await.settled = true;
        fresh
    }

    fn phase(&self, settled: bool) -> Phase {
        if settled && self.loads_in_flight.load(Ordering::SeqCst) == 0 {
            Phase::Ready
        } else {
            Phase::Loading
        }
    }

    pub async fn select_tab(&self, tab: Tab) {
        self.state.write().await.tab = tab;
    }

    pub async fn snapshot(&self) -> DashboardSnapshot {
        let state = self.state.read().await;
        DashboardSnapshot {
            phase: self.phase(state.settled),
            active_tab: state.tab,
            data: state.data.clone(),
        }
    }

    /// View of the active tab.
    pub async fn view(&self, user: &User) -> TabView {
        let state = self.state.read().await;
        build_view(state.tab, &state.data, user)
    }

    pub async fn store_search(&self, filters: FilterSettings, vacancies: Vec<Vacancy>) {
        let mut state = self.state.write().await;
        state.filters = filters;
        state.data.vacancies = vacancies;
    }

    /// Daily cap from the most recent search filters. 0 means no cap.
    pub async fn application_limit(&self) -> u32 {
        self.state.read().await.filters.application_limit
    }

    pub async fn first_resume(&self) -> Option<Resume> {
        self.state.read().await.data.resumes.first().cloned()
    }

    pub async fn find_vacancy(&self, vacancy_id: &str) -> Option<Vacancy> {
        self.state
            .read()
            .await
            .data
            .vacancies
            .iter()
            .find(|v| v.id == vacancy_id)
            .cloned()
    }

    pub async fn first_vacancy(&self) -> Option<Vacancy> {
        self.state.read().await.data.vacancies.first().cloned()
    }

    pub fn ledger(&self) -> &SentLedger {
        &self.ledger
    }
}
