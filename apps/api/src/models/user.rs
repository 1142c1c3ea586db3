use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::models::resume::{ApplicationLog, Resume};

/// Length of the seeded subscription granted on login.
const SEEDED_SUBSCRIPTION_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Active,
    Trial,
    Inactive,
}

/// Read-only in this version. The upgrade flow never mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub status: SubscriptionStatus,
    pub plan_name: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentKind {
    Card,
}

/// Display metadata only. Never a real payment credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentMethod {
    #[serde(rename = "type")]
    pub kind: PaymentKind,
    pub last4: String,
    pub expires: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverLetterMode {
    #[default]
    None,
    Template,
    Ai,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiTone {
    #[default]
    Professional,
    Enthusiastic,
    Formal,
    Friendly,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AiSettings {
    pub tone: AiTone,
}

/// How cover letters are produced when applying.
///
/// `template` is sent verbatim. `{company}` and `{position}` are a naming
/// convention for the user's benefit; nothing substitutes them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverLetterConfig {
    pub mode: CoverLetterMode,
    pub template: String,
    pub ai_settings: AiSettings,
}

/// Partial update accepted by the settings tab.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverLetterConfigPatch {
    pub mode: Option<CoverLetterMode>,
    pub template: Option<String>,
    pub tone: Option<AiTone>,
}

impl CoverLetterConfig {
    pub fn apply(&mut self, patch: CoverLetterConfigPatch) {
        if let Some(mode) = patch.mode {
            self.mode = mode;
        }
        if let Some(template) = patch.template {
            self.template = template;
        }
        if let Some(tone) = patch.tone {
            self.ai_settings.tone = tone;
        }
    }
}

/// Identity as reported by the provider's `/me` endpoint, already flattened.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub id: String,
    pub name: String,
    pub avatar_url: String,
}

/// The logged-in job seeker. Exactly one subscription, payment method and
/// cover-letter config per user.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub avatar_url: String,
    pub subscription: Subscription,
    pub payment_method: PaymentMethod,
    pub cover_letter_config: CoverLetterConfig,
    pub resumes: Vec<Resume>,
    pub applications: Vec<ApplicationLog>,
}

impl User {
    /// Builds a user from provider data, seeding the billing and cover-letter
    /// records the provider has no concept of.
    pub fn from_provider(
        profile: Profile,
        resumes: Vec<Resume>,
        applications: Vec<ApplicationLog>,
    ) -> Self {
        Self {
            id: profile.id,
            name: profile.name,
            avatar_url: profile.avatar_url,
            subscription: Subscription {
                status: SubscriptionStatus::Active,
                plan_name: "Premium".to_string(),
                expires_at: Utc::now() + Duration::days(SEEDED_SUBSCRIPTION_DAYS),
            },
            payment_method: PaymentMethod {
                kind: PaymentKind::Card,
                last4: "1234".to_string(),
                expires: "12/25".to_string(),
            },
            cover_letter_config: CoverLetterConfig {
                mode: CoverLetterMode::Ai,
                template: String::new(),
                ai_settings: AiSettings {
                    tone: AiTone::Professional,
                },
            },
            resumes,
            applications,
        }
    }
}
