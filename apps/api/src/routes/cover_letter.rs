use axum::{extract::State, Extension, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::llm_client::LetterOutcome;
use crate::models::user::{CoverLetterConfig, CoverLetterConfigPatch, CoverLetterMode};
use crate::session::middleware::CurrentSession;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GenerateRequest {
    pub resume_text: Option<String>,
    pub vacancy_text: Option<String>,
}

/// GET /api/v1/cover-letter/config
pub async fn handle_get_config(
    Extension(CurrentSession(session)): Extension<CurrentSession>,
) -> Json<CoverLetterConfig> {
    Json(session.user.read().await.cover_letter_config.clone())
}

/// PATCH /api/v1/cover-letter/config
pub async fn handle_patch_config(
    Extension(CurrentSession(session)): Extension<CurrentSession>,
    Json(patch): Json<CoverLetterConfigPatch>,
) -> Json<CoverLetterConfig> {
    let mut user = session.user.write().await;
    user.cover_letter_config.apply(patch);
    Json(user.cover_letter_config.clone())
}

/// POST /api/v1/cover-letter/generate
///
/// Only available in AI mode. Missing texts default to the first resume title
/// and the first vacancy found by the last search.
pub async fn handle_generate(
    State(state): State<AppState>,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<LetterOutcome>, AppError> {
    let (config, first_resume) = {
        let user = session.user.read().await;
        (
            user.cover_letter_config.clone(),
            user.resumes.first().map(|r| r.title.clone()),
        )
    };
    if config.mode != CoverLetterMode::Ai {
        return Err(AppError::LetterGeneration(
            "AI cover letters are disabled; switch the mode to ai first".to_string(),
        ));
    }

    let resume_text = match req.resume_text {
        Some(text) => text,
        None => match first_resume {
            Some(title) => title,
            None => session
                .dashboard
                .first_resume()
                .await
                .map(|r| r.title)
                .unwrap_or_default(),
        },
    };
    let vacancy_text = match req.vacancy_text {
        Some(text) => text,
        None => session
            .dashboard
            .first_vacancy()
            .await
            .map(|v| v.title)
            .unwrap_or_default(),
    };

    let outcome = state
        .llm
        .generate_cover_letter(&resume_text, &vacancy_text, config.ai_settings.tone)
        .await;
    Ok(Json(outcome))
}
