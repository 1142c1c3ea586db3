//! Provider JSON shapes and their translation into local records.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::warn;

use crate::models::resume::{ApplicationLog, ApplicationStatus, Resume};
use crate::models::user::{CoverLetterMode, Profile};
use crate::models::vacancy::Vacancy;

pub const NOT_SPECIFIED: &str = "Not specified";

/// Negotiation states that mean the employer answered with an invite.
const INVITATION_STATES: &[&str] = &["invitation", "interview", "offer", "hired"];

#[derive(Debug, Deserialize)]
pub struct HhMe {
    pub id: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub photo: Option<HhPhoto>,
}

#[derive(Debug, Deserialize)]
pub struct HhPhoto {
    #[serde(default)]
    pub medium: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HhResume {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub alternate_url: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Named {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HhSalary {
    #[serde(default)]
    pub from: Option<u64>,
    #[serde(default)]
    pub to: Option<u64>,
    #[serde(default)]
    pub currency: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HhSnippet {
    #[serde(default)]
    pub requirement: Option<String>,
    #[serde(default)]
    pub responsibility: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HhVacancy {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub employer: Option<Named>,
    #[serde(default)]
    pub salary: Option<HhSalary>,
    #[serde(default)]
    pub area: Option<Named>,
    #[serde(default)]
    pub alternate_url: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub snippet: Option<HhSnippet>,
}

#[derive(Debug, Deserialize)]
pub struct HhState {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct HhNegotiation {
    pub id: String,
    #[serde(default)]
    pub state: Option<HhState>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub viewed_by_opponent: Option<bool>,
    #[serde(default)]
    pub vacancy: Option<HhVacancy>,
    #[serde(default)]
    pub resume: Option<HhResume>,
}

impl From<HhMe> for Profile {
    fn from(me: HhMe) -> Self {
        let name = [me.first_name, me.last_name]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        let avatar_url = me
            .photo
            .and_then(|p| p.medium.or(p.url))
            .unwrap_or_default();
        Profile {
            id: me.id,
            name,
            avatar_url,
        }
    }
}

impl From<HhResume> for Resume {
    fn from(r: HhResume) -> Self {
        Resume {
            id: r.id,
            title: r.title.unwrap_or_else(|| NOT_SPECIFIED.to_string()),
            url: r.alternate_url.or(r.url).unwrap_or_default(),
            updated_at: r.updated_at.unwrap_or_default(),
        }
    }
}

impl From<HhVacancy> for Vacancy {
    fn from(v: HhVacancy) -> Self {
        let (requirement, responsibility) = match v.snippet {
            Some(s) => (s.requirement, s.responsibility),
            None => (None, None),
        };
        Vacancy {
            id: v.id,
            title: v.name.unwrap_or_else(|| NOT_SPECIFIED.to_string()),
            company: named_or_default(v.employer),
            salary: salary_display(v.salary.as_ref()),
            url: v.alternate_url.unwrap_or_default(),
            location: named_or_default(v.area),
            published_at: v.published_at,
            requirement,
            responsibility,
        }
    }
}

impl From<HhNegotiation> for ApplicationLog {
    fn from(n: HhNegotiation) -> Self {
        let status = negotiation_status(n.state.as_ref(), n.viewed_by_opponent.unwrap_or(false));
        let applied_at = n
            .created_at
            .as_deref()
            .and_then(parse_provider_time)
            .unwrap_or_else(|| {
                warn!("Negotiation {} has no parseable created_at", n.id);
                Utc::now()
            });
        let vacancy = n.vacancy.map(Vacancy::from).unwrap_or_else(|| Vacancy {
            id: String::new(),
            title: NOT_SPECIFIED.to_string(),
            company: NOT_SPECIFIED.to_string(),
            salary: NOT_SPECIFIED.to_string(),
            url: String::new(),
            location: NOT_SPECIFIED.to_string(),
            published_at: None,
            requirement: None,
            responsibility: None,
        });
        ApplicationLog {
            id: n.id,
            vacancy,
            resume: n.resume.map(Resume::from),
            status,
            applied_at,
            cover_letter: String::new(),
            cover_letter_mode: CoverLetterMode::None,
        }
    }
}

fn named_or_default(named: Option<Named>) -> String {
    named
        .and_then(|n| n.name)
        .unwrap_or_else(|| NOT_SPECIFIED.to_string())
}

/// `"{from}-{to} {currency}"`, either bound may be missing.
pub fn salary_display(salary: Option<&HhSalary>) -> String {
    let Some(salary) = salary else {
        return NOT_SPECIFIED.to_string();
    };
    let from = salary.from.map(|v| v.to_string()).unwrap_or_default();
    let to = salary.to.map(|v| format!("-{v}")).unwrap_or_default();
    let currency = salary.currency.as_deref().unwrap_or("RUR");
    format!("{from}{to} {currency}")
}

fn negotiation_status(state: Option<&HhState>, viewed: bool) -> ApplicationStatus {
    match state {
        Some(s) if INVITATION_STATES.contains(&s.id.as_str()) => ApplicationStatus::Invitation,
        _ if viewed => ApplicationStatus::Viewed,
        _ => ApplicationStatus::Applied,
    }
}

/// The provider writes offsets without a colon (`+0300`).
pub fn parse_provider_time(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z"))
        .map(|t| t.with_timezone(&Utc))
        .ok()
}
