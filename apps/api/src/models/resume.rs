use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::user::CoverLetterMode;
use crate::models::vacancy::Vacancy;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resume {
    pub id: String,
    pub title: String,
    pub url: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicationStatus {
    Applied,
    Viewed,
    Invitation,
}

/// One application as seen by the provider. This service only reads these;
/// the provider appends them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationLog {
    pub id: String,
    pub vacancy: Vacancy,
    pub resume: Option<Resume>,
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
    /// Empty unless the letter was sent through this service.
    pub cover_letter: String,
    pub cover_letter_mode: CoverLetterMode,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_application_status_keeps_capitalized_names() {
        let status: ApplicationStatus = serde_json::from_str(r#""Invitation""#).unwrap();
        assert_eq!(status, ApplicationStatus::Invitation);
        assert_eq!(
            serde_json::to_string(&ApplicationStatus::Viewed).unwrap(),
            r#""Viewed""#
        );
    }

    #[test]
    fn test_resume_uses_camel_case() {
        let resume = Resume {
            id: "r1".to_string(),
            title: "Rust Developer".to_string(),
            url: "https://hh.ru/resume/r1".to_string(),
            updated_at: "2024-01-15T10:30:00+0300".to_string(),
        };
        let json = serde_json::to_value(&resume).unwrap();
        assert_eq!(json["updatedAt"], "2024-01-15T10:30:00+0300");
    }
}
