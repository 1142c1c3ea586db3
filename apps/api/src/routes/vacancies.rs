use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::dashboard::ledger::SentApplication;
use crate::dashboard::letters::choose_letter;
use crate::errors::AppError;
use crate::models::user::CoverLetterMode;
use crate::models::vacancy::{FilterSettings, Vacancy};
use crate::session::middleware::CurrentSession;
use crate::state::AppState;

#[derive(Serialize)]
pub struct SearchResponse {
    pub vacancies: Vec<Vacancy>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApplyRequest {
    /// Defaults to the user's first resume.
    pub resume_id: Option<String>,
    /// Overrides the cover-letter mode when non-empty.
    pub cover_letter: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyResponse {
    pub vacancy_id: String,
    pub resume_id: String,
    pub cover_letter: Option<String>,
    pub cover_letter_mode: CoverLetterMode,
    pub sent_at: DateTime<Utc>,
}

/// POST /api/v1/vacancies/search
///
/// `{}` searches with every filter at its default.
pub async fn handle_search(
    State(state): State<AppState>,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
    Json(filters): Json<FilterSettings>,
) -> Result<Json<SearchResponse>, AppError> {
    let vacancies = state.hh.search_vacancies(session.token(), &filters).await?;
    session
        .dashboard
        .store_search(filters, vacancies.clone())
        .await;
    Ok(Json(SearchResponse { vacancies }))
}

/// POST /api/v1/vacancies/:id/apply
pub async fn handle_apply(
    State(state): State<AppState>,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
    Path(vacancy_id): Path<String>,
    Json(req): Json<ApplyRequest>,
) -> Result<Json<ApplyResponse>, AppError> {
    let dashboard = &session.dashboard;
    let now = Utc::now();

    // Held until the send is recorded; any early return frees the slot.
    let limit = dashboard.application_limit().await;
    let slot = dashboard
        .ledger()
        .try_reserve(limit, now)
        .await
        .ok_or_else(|| {
            AppError::Validation(format!("Daily application limit of {limit} reached"))
        })?;

    let (resume, config) = {
        let user = session.user.read().await;
        let resume = match &req.resume_id {
            Some(id) => user.resumes.iter().find(|r| &r.id == id).cloned(),
            None => user.resumes.first().cloned(),
        };
        (resume, user.cover_letter_config.clone())
    };
    let resume = match resume {
        Some(resume) => resume,
        None => match dashboard.first_resume().await {
            Some(resume) if req.resume_id.is_none() => resume,
            _ => return Err(AppError::Validation("No resume to apply with".to_string())),
        },
    };

    let vacancy_text = match dashboard.find_vacancy(&vacancy_id).await {
        Some(v) => format!("{} at {}", v.title, v.company),
        None => vacancy_id.clone(),
    };

    let letter = choose_letter(
        &config,
        req.cover_letter,
        &resume.title,
        &vacancy_text,
        &state.llm,
    )
    .await?;

    state
        .hh
        .apply_to_vacancy(
            session.token(),
            &vacancy_id,
            &resume.id,
            letter.text.as_deref(),
        )
        .await?;

    let sent_at = Utc::now();
    slot.commit(SentApplication {
        vacancy_id: vacancy_id.clone(),
        resume_id: resume.id.clone(),
        letter: letter.text.clone().unwrap_or_default(),
        mode: letter.mode,
        sent_at,
    })
    .await;
    info!("Applied to vacancy {vacancy_id} ({:?} letter)", letter.mode);

    Ok(Json(ApplyResponse {
        vacancy_id,
        resume_id: resume.id,
        cover_letter: letter.text,
        cover_letter_mode: letter.mode,
        sent_at,
    }))
}
