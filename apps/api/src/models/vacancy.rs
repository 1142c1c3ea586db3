use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vacancy {
    pub id: String,
    pub title: String,
    pub company: String,
    /// Display string, e.g. `"150000-200000 RUR"`.
    pub salary: String,
    pub url: String,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirement: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsibility: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Experience {
    NoExperience,
    Between1And3,
    Between3And6,
    MoreThan6,
}

impl Experience {
    pub fn as_param(self) -> &'static str {
        match self {
            Experience::NoExperience => "noExperience",
            Experience::Between1And3 => "between1And3",
            Experience::Between3And6 => "between3And6",
            Experience::MoreThan6 => "moreThan6",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Employment {
    Full,
    Part,
    Project,
    Volunteer,
    Probation,
}

impl Employment {
    pub fn as_param(self) -> &'static str {
        match self {
            Employment::Full => "full",
            Employment::Part => "part",
            Employment::Project => "project",
            Employment::Volunteer => "volunteer",
            Employment::Probation => "probation",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Schedule {
    FullDay,
    Shift,
    Flexible,
    Remote,
    FlyInFlyOut,
}

impl Schedule {
    pub fn as_param(self) -> &'static str {
        match self {
            Schedule::FullDay => "fullDay",
            Schedule::Shift => "shift",
            Schedule::Flexible => "flexible",
            Schedule::Remote => "remote",
            Schedule::FlyInFlyOut => "flyInFlyOut",
        }
    }
}

/// Vacancy search filters collected in the vacancies tab. Every field has a
/// default so an empty object is a valid search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterSettings {
    pub keywords: String,
    /// Comma-separated.
    pub exclude_keywords: String,
    pub search_in_description: bool,
    pub salary_from: Option<u32>,
    pub salary_not_important: bool,
    pub experience: Option<Experience>,
    pub employment: Option<Employment>,
    pub schedule: Option<Schedule>,
    /// Daily cap on applications sent through this service. 0 means no cap.
    pub application_limit: u32,
    pub area: Option<String>,
    pub currency: Option<String>,
}

impl FilterSettings {
    pub fn excluded_keywords(&self) -> Vec<&str> {
        self.exclude_keywords
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .collect()
    }
}

/// One bar of the weekly applications chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub name: String,
    pub applications: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_deserializes_to_defaults() {
        let filters: FilterSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(filters, FilterSettings::default());
        assert!(filters.experience.is_none());
        assert_eq!(filters.application_limit, 0);
    }

    #[test]
    fn test_filter_enums_match_provider_ids() {
        let filters: FilterSettings = serde_json::from_value(serde_json::json!({
            "experience": "between1And3",
            "employment": "full",
            "schedule": "flyInFlyOut"
        }))
        .unwrap();
        assert_eq!(filters.experience.unwrap().as_param(), "between1And3");
        assert_eq!(filters.employment.unwrap().as_param(), "full");
        assert_eq!(filters.schedule.unwrap().as_param(), "flyInFlyOut");
    }

    #[test]
    fn test_excluded_keywords_skip_blanks() {
        let filters = FilterSettings {
            exclude_keywords: " PHP, ,WordPress,jQuery ".to_string(),
            ..Default::default()
        };
        assert_eq!(filters.excluded_keywords(), vec!["PHP", "WordPress", "jQuery"]);
    }
}
