//! Vacancy search query building.

use crate::hh_client::{DEFAULT_AREA, DEFAULT_CURRENCY, SEARCH_ORDER, SEARCH_PAGE_SIZE};
use crate::models::vacancy::FilterSettings;

/// Serializes filters into provider query parameters. Area, currency, order
/// and page size are always present.
pub fn query_params(filters: &FilterSettings) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("text", search_text(filters)),
        (
            "area",
            filters.area.clone().unwrap_or_else(|| DEFAULT_AREA.to_string()),
        ),
        (
            "currency",
            filters
                .currency
                .clone()
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
        ),
        ("order_by", SEARCH_ORDER.to_string()),
        ("per_page", SEARCH_PAGE_SIZE.to_string()),
    ];

    if !filters.search_in_description && !filters.keywords.trim().is_empty() {
        params.push(("search_field", "name".to_string()));
    }
    if let Some(salary) = filters.salary_from.filter(|_| !filters.salary_not_important) {
        params.push(("salary", salary.to_string()));
    }
    if let Some(experience) = filters.experience {
        params.push(("experience", experience.as_param().to_string()));
    }
    if let Some(employment) = filters.employment {
        params.push(("employment", employment.as_param().to_string()));
    }
    if let Some(schedule) = filters.schedule {
        params.push(("schedule", schedule.as_param().to_string()));
    }

    params
}

/// Keywords plus excluded keywords in the provider's query language.
fn search_text(filters: &FilterSettings) -> String {
    let keywords = filters.keywords.trim();
    let excluded = filters.excluded_keywords();
    if excluded.is_empty() {
        return keywords.to_string();
    }
    let not_clause = format!("NOT ({})", excluded.join(" OR "));
    if keywords.is_empty() {
        not_clause
    } else {
        format!("{keywords} {not_clause}")
    }
}
