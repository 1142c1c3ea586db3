//! Read-only per-tab views derived from dashboard data and the session user.

use serde::Serialize;

use crate::dashboard::{DashboardData, Tab};
use crate::models::resume::{ApplicationLog, ApplicationStatus};
use crate::models::user::{CoverLetterConfig, PaymentMethod, Subscription, User};
use crate::models::vacancy::{ChartData, Vacancy};

/// Placeholder shown instead of an empty list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmptyState {
    pub title: &'static str,
    pub hint: &'static str,
    pub action: &'static str,
}

pub const NO_VACANCIES: EmptyState = EmptyState {
    title: "No vacancies found",
    hint: "Adjust the search filters and the service will find matching vacancies",
    action: "Configure filters",
};

pub const NO_APPLICATIONS: EmptyState = EmptyState {
    title: "No applications yet",
    hint: "Applications you send will show up here with their status",
    action: "Find vacancies",
};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub resumes: usize,
    pub applications: usize,
    pub vacancies_found: usize,
    pub viewed: usize,
    pub invitations: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "tab", rename_all = "lowercase")]
pub enum TabView {
    #[serde(rename_all = "camelCase")]
    Dashboard {
        user_name: String,
        overview: Overview,
        chart: Vec<ChartData>,
        llm_available: Option<bool>,
    },
    #[serde(rename_all = "camelCase")]
    Vacancies {
        vacancies: Vec<Vacancy>,
        empty_state: Option<EmptyState>,
    },
    #[serde(rename_all = "camelCase")]
    Applications {
        applications: Vec<ApplicationLog>,
        empty_state: Option<EmptyState>,
    },
    #[serde(rename_all = "camelCase")]
    Settings {
        cover_letter_config: CoverLetterConfig,
        subscription: Subscription,
        payment_method: PaymentMethod,
    },
}

pub fn build_view(tab: Tab, data: &DashboardData, user: &User) -> TabView {
    match tab {
        Tab::Dashboard => TabView::Dashboard {
            user_name: user.name.clone(),
            overview: overview(data),
            chart: data.chart.clone(),
            llm_available: data.llm_available,
        },
        Tab::Vacancies => TabView::Vacancies {
            empty_state: data.vacancies.is_empty().then_some(NO_VACANCIES),
            vacancies: data.vacancies.clone(),
        },
        Tab::Applications => TabView::Applications {
            empty_state: data.application_logs.is_empty().then_some(NO_APPLICATIONS),
            applications: data.application_logs.clone(),
        },
        Tab::Settings => TabView::Settings {
            cover_letter_config: user.cover_letter_config.clone(),
            subscription: user.subscription.clone(),
            payment_method: user.payment_method.clone(),
        },
    }
}

fn overview(data: &DashboardData) -> Overview {
    let count = |status: ApplicationStatus| {
        data.application_logs
            .iter()
            .filter(|l| l.status == status)
            .count()
    };
    Overview {
        resumes: data.resumes.len(),
        applications: data.application_logs.len(),
        vacancies_found: data.vacancies.len(),
        viewed: count(ApplicationStatus::Viewed),
        invitations: count(ApplicationStatus::Invitation),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::Profile;

    fn user() -> User {
        User::from_provider(
            Profile {
                id: "1".to_string(),
                name: "Ivan Petrov".to_string(),
                avatar_url: String::new(),
            },
            vec![],
            vec![],
        )
    }

    fn vacancy(id: &str) -> Vacancy {
        Vacancy {
            id: id.to_string(),
            title: "Rust Engineer".to_string(),
            company: "Acme".to_string(),
            salary: "300000 RUR".to_string(),
            url: String::new(),
            location: "Moscow".to_string(),
            published_at: None,
            requirement: None,
            responsibility: None,
        }
    }

    #[test]
    fn test_empty_vacancies_render_no_results_affordance() {
        let view = build_view(Tab::Vacancies, &DashboardData::default(), &user());
        match view {
            TabView::Vacancies {
                vacancies,
                empty_state,
            } => {
                assert!(vacancies.is_empty());
                assert_eq!(empty_state, Some(NO_VACANCIES));
            }
            other => panic!("unexpected view {other:?}"),
        }

        let json = serde_json::to_value(build_view(
            Tab::Vacancies,
            &DashboardData::default(),
            &user(),
        ))
        .unwrap();
        assert_eq!(json["tab"], "vacancies");
        assert_eq!(json["emptyState"]["title"], "No vacancies found");
        assert!(json.get("empty_state").is_none());
    }

    #[test]
    fn test_non_empty_vacancies_have_no_affordance() {
        let data = DashboardData {
            vacancies: vec![vacancy("v1")],
            ..Default::default()
        };
        match build_view(Tab::Vacancies, &data, &user()) {
            TabView::Vacancies { empty_state, .. } => assert!(empty_state.is_none()),
            other => panic!("unexpected view {other:?}"),
        }
    }

    #[test]
    fn test_settings_view_mirrors_user() {
        let user = user();
        match build_view(Tab::Settings, &DashboardData::default(), &user) {
            TabView::Settings {
                cover_letter_config,
                subscription,
                ..
            } => {
                assert_eq!(cover_letter_config, user.cover_letter_config);
                assert_eq!(subscription.plan_name, "Premium");
            }
            other => panic!("unexpected view {other:?}"),
        }
    }

    #[test]
    fn test_overview_counts() {
        let data = DashboardData {
            vacancies: vec![vacancy("v1"), vacancy("v2")],
            llm_available: Some(true),
            ..Default::default()
        };
        match build_view(Tab::Dashboard, &data, &user()) {
            TabView::Dashboard {
                overview,
                llm_available,
                user_name,
                ..
            } => {
                assert_eq!(overview.vacancies_found, 2);
                assert_eq!(overview.applications, 0);
                assert_eq!(llm_available, Some(true));
                assert_eq!(user_name, "Ivan Petrov");
            }
            other => panic!("unexpected view {other:?}"),
        }
    }

    #[test]
    fn test_views_serialize_camel_case() {
        let data = DashboardData {
            vacancies: vec![vacancy("v1")],
            llm_available: Some(false),
            ..Default::default()
        };
        let json = serde_json::to_value(build_view(Tab::Dashboard, &data, &user())).unwrap();
        assert_eq!(json["tab"], "dashboard");
        assert_eq!(json["userName"], "Ivan Petrov");
        assert_eq!(json["llmAvailable"], false);
        assert_eq!(json["overview"]["vacanciesFound"], 1);

        let json = serde_json::to_value(build_view(Tab::Settings, &data, &user())).unwrap();
        assert!(json["coverLetterConfig"].is_object());
        assert!(json["paymentMethod"].is_object());
    }
}
