//! Which cover letter goes out with an application.

use tracing::debug;

use crate::errors::AppError;
use crate::llm_client::{LetterOutcome, LlmClient};
use crate::models::user::{CoverLetterConfig, CoverLetterMode};

#[derive(Debug, Clone, PartialEq)]
pub struct ChosenLetter {
    /// `None` when the application goes out without a message.
    pub text: Option<String>,
    pub mode: CoverLetterMode,
}

/// An explicit letter wins and is recorded as template mode. Otherwise the
/// configured mode decides: no letter, the template verbatim, or a generated
/// one.
pub async fn choose_letter(
    config: &CoverLetterConfig,
    explicit: Option<String>,
    resume_text: &str,
    vacancy_text: &str,
    llm: &LlmClient,
) -> Result<ChosenLetter, AppError> {
    if let Some(text) = explicit.filter(|t| !t.trim().is_empty()) {
        return Ok(ChosenLetter {
            text: Some(text),
            mode: CoverLetterMode::Template,
        });
    }

    let text = match config.mode {
        CoverLetterMode::None => None,
        CoverLetterMode::Template => {
            if config.template.trim().is_empty() {
                return Err(AppError::LetterGeneration(
                    "Template mode is selected but the template is empty".to_string(),
                ));
            }
            Some(config.template.clone())
        }
        CoverLetterMode::Ai => {
            let outcome = llm
                .generate_cover_letter(resume_text, vacancy_text, config.ai_settings.tone)
                .await;
            if let LetterOutcome::Fallback { reason, .. } = &outcome {
                debug!("Applying with fallback letter: {reason}");
            }
            Some(outcome.into_letter())
        }
    };

    Ok(ChosenLetter {
        text,
        mode: config.mode,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::prompts::fallback_letter;
    use crate::models::user::AiTone;
    use crate::test_support::{gigachat_settings, UNREACHABLE};

    fn llm() -> LlmClient {
        LlmClient::new(gigachat_settings(UNREACHABLE))
    }

    fn config(mode: CoverLetterMode, template: &str) -> CoverLetterConfig {
        CoverLetterConfig {
            mode,
            template: template.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_explicit_letter_wins_and_is_never_recorded_as_none() {
        for mode in [CoverLetterMode::None, CoverLetterMode::Ai] {
            let chosen = choose_letter(
                &config(mode, ""),
                Some("Hello".to_string()),
                "",
                "",
                &llm(),
            )
            .await
            .unwrap();
            assert_eq!(chosen.text.as_deref(), Some("Hello"));
            assert_eq!(chosen.mode, CoverLetterMode::Template);
        }
    }

    #[tokio::test]
    async fn test_blank_explicit_letter_defers_to_mode() {
        let chosen = choose_letter(
            &config(CoverLetterMode::None, ""),
            Some("   ".to_string()),
            "",
            "",
            &llm(),
        )
        .await
        .unwrap();
        assert_eq!(chosen.text, None);
        assert_eq!(chosen.mode, CoverLetterMode::None);
    }

    #[tokio::test]
    async fn test_none_mode_sends_nothing() {
        let chosen = choose_letter(&config(CoverLetterMode::None, "x"), None, "", "", &llm())
            .await
            .unwrap();
        assert_eq!(chosen.text, None);
        assert_eq!(chosen.mode, CoverLetterMode::None);
    }

    #[tokio::test]
    async fn test_template_sent_verbatim() {
        let template = "Dear {company}, I want the {position} role.";
        let chosen = choose_letter(
            &config(CoverLetterMode::Template, template),
            None,
            "",
            "",
            &llm(),
        )
        .await
        .unwrap();
        assert_eq!(chosen.text.as_deref(), Some(template));
    }

    #[tokio::test]
    async fn test_empty_template_is_an_error() {
        let result = choose_letter(
            &config(CoverLetterMode::Template, "  "),
            None,
            "",
            "",
            &llm(),
        )
        .await;
        assert!(matches!(result, Err(AppError::LetterGeneration(_))));
    }

    #[tokio::test]
    async fn test_ai_mode_falls_back_when_llm_unreachable() {
        let chosen = choose_letter(
            &config(CoverLetterMode::Ai, ""),
            None,
            "Rust Developer",
            "Backend Engineer at Acme",
            &llm(),
        )
        .await
        .unwrap();
        assert_eq!(
            chosen.text.as_deref(),
            Some(fallback_letter(AiTone::Professional).as_str())
        );
    }
}
