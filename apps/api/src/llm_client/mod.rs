/// LLM Client — the single point of entry for all GigaChat calls.
///
/// No other module may call the GigaChat API directly.
///
/// Access tokens come from a client-credentials grant and are cached with
/// their acquisition time; a stale entry is re-acquired before use.
/// Acquisition failures propagate. Cover-letter generation never fails: any
/// error turns into `LetterOutcome::Fallback` with a canned letter.
use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::GigaChatSettings;
use crate::models::user::AiTone;

pub mod prompts;

const MAX_TOKENS: u32 = 1000;
const REPETITION_PENALTY: f32 = 1.0;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Token response has no access_token")]
    MissingToken,

    #[error("LLM returned empty content")]
    EmptyContent,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    n: u32,
    stream: bool,
    max_tokens: u32,
    repetition_penalty: f32,
    update_interval: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl ChatResponse {
    /// Content of the first choice, if non-blank.
    fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .filter(|t| !t.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

/// A cached access token and when it was obtained.
#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    acquired_at: Instant,
}

impl CachedToken {
    fn is_stale(&self, ttl: Duration, now: Instant) -> bool {
        now.saturating_duration_since(self.acquired_at) >= ttl
    }
}

/// Result of a cover-letter request. Both branches carry a usable letter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LetterOutcome {
    Generated { letter: String },
    Fallback { letter: String, reason: String },
}

impl LetterOutcome {
    #[cfg(test)]
    pub fn letter(&self) -> &str {
        match self {
            LetterOutcome::Generated { letter } | LetterOutcome::Fallback { letter, .. } => letter,
        }
    }

    pub fn into_letter(self) -> String {
        match self {
            LetterOutcome::Generated { letter } | LetterOutcome::Fallback { letter, .. } => letter,
        }
    }
}

/// GigaChat client shared by every session. Clones share the token cache.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    settings: GigaChatSettings,
    token: Arc<Mutex<Option<CachedToken>>>,
}

impl LlmClient {
    pub fn new(settings: GigaChatSettings) -> Self {
        Self {
            client: Client::builder()
                .build()
                .expect("Failed to build HTTP client"),
            settings,
            token: Arc::new(Mutex::new(None)),
        }
    }

    pub fn model(&self) -> &str {
        &self.settings.model
    }

    /// Returns the cached token, re-acquiring it when missing or stale.
    pub async fn get_access_token(&self) -> Result<String, LlmError> {
        let mut cache = self.token.lock().await;
        if let Some(cached) = cache.as_ref() {
            if !cached.is_stale(self.settings.token_ttl, Instant::now()) {
                return Ok(cached.value.clone());
            }
            debug!("GigaChat token is stale, re-acquiring");
        }

        let value = self.acquire_token().await?;
        *cache = Some(CachedToken {
            value: value.clone(),
            acquired_at: Instant::now(),
        });
        Ok(value)
    }

    async fn acquire_token(&self) -> Result<String, LlmError> {
        let response = self
            .client
            .post(&self.settings.oauth_url)
            .basic_auth(&self.settings.client_id, Some(&self.settings.client_secret))
            .header("RqUID", Uuid::new_v4().to_string())
            .header("Accept", "application/json")
            .form(&[("scope", self.settings.scope.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: TokenResponse = response.json().await?;
        body.access_token
            .filter(|t| !t.is_empty())
            .ok_or(LlmError::MissingToken)
    }

    /// One non-streaming chat completion: system message, then the prompt.
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, LlmError> {
        let token = self.get_access_token().await?;
        let request_body = ChatRequest {
            model: &self.settings.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            n: 1,
            stream: false,
            max_tokens: MAX_TOKENS,
            repetition_penalty: REPETITION_PENALTY,
            update_interval: 0,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.settings.api_base))
            .bearer_auth(token)
            .header("Accept", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let chat: ChatResponse = response.json().await?;
        chat.text()
            .map(str::to_string)
            .ok_or(LlmError::EmptyContent)
    }

    /// Drafts a cover letter. Any failure degrades to the canned letter for
    /// the tone; the returned letter is never empty.
    pub async fn generate_cover_letter(
        &self,
        resume_text: &str,
        vacancy_text: &str,
        tone: AiTone,
    ) -> LetterOutcome {
        let prompt = prompts::build_cover_letter_prompt(resume_text, vacancy_text, tone);
        match self.complete(prompts::COVER_LETTER_SYSTEM, &prompt).await {
            Ok(letter) => {
                debug!("Cover letter generated ({} chars)", letter.chars().count());
                LetterOutcome::Generated { letter }
            }
            Err(e) => {
                warn!("Cover letter generation failed, using fallback: {e}");
                LetterOutcome::Fallback {
                    letter: prompts::fallback_letter(tone),
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Whether GigaChat is reachable with our credentials. Never errors.
    pub async fn check_availability(&self) -> bool {
        let token = match self.get_access_token().await {
            Ok(token) => token,
            Err(e) => {
                warn!("GigaChat unavailable (token): {e}");
                return false;
            }
        };

        match self
            .client
            .get(format!("{}/models", self.settings.api_base))
            .bearer_auth(token)
            .header("Accept", "application/json")
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                warn!("GigaChat unavailable: models returned {}", response.status());
                false
            }
            Err(e) => {
                warn!("GigaChat unavailable: {e}");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex as StdMutex;

    use axum::extract::Form;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{json, Value};

    use super::*;
    use crate::test_support::{gigachat_settings, spawn_upstream, UNREACHABLE};

    const ALL_TONES: [AiTone; 4] = [
        AiTone::Professional,
        AiTone::Enthusiastic,
        AiTone::Formal,
        AiTone::Friendly,
    ];

    #[derive(Default)]
    struct Upstream {
        token_hits: AtomicUsize,
        rq_uids: StdMutex<Vec<String>>,
        last_chat: StdMutex<Option<Value>>,
    }

    fn upstream_router(upstream: Arc<Upstream>, completion: Value) -> Router {
        let on_token = upstream.clone();
        let on_chat = upstream.clone();
        Router::new()
            .route(
                "/oauth",
                post(
                    move |headers: HeaderMap, Form(form): Form<std::collections::HashMap<String, String>>| async move {
                        on_token.token_hits.fetch_add(1, Ordering::SeqCst);
                        assert_eq!(form["scope"], "GIGACHAT_API_PERS");
                        assert!(headers["authorization"]
                            .to_str()
                            .unwrap()
                            .starts_with("Basic "));
                        let rq = headers["rquid"].to_str().unwrap().to_string();
                        on_token.rq_uids.lock().unwrap().push(rq);
                        Json(json!({"access_token": "giga-token", "expires_at": 0}))
                    },
                ),
            )
            .route(
                "/chat/completions",
                post(move |headers: HeaderMap, Json(body): Json<Value>| async move {
                    assert_eq!(headers["authorization"], "Bearer giga-token");
                    *on_chat.last_chat.lock().unwrap() = Some(body);
                    Json(completion)
                }),
            )
            .route("/models", get(|| async { Json(json!({"data": []})) }))
    }

    fn completion(content: &str) -> Value {
        json!({"choices": [{"message": {"role": "assistant", "content": content}}]})
    }

    #[test]
    fn test_cached_token_staleness() {
        let acquired_at = Instant::now();
        let token = CachedToken {
            value: "t".to_string(),
            acquired_at,
        };
        let ttl = Duration::from_secs(60);
        assert!(!token.is_stale(ttl, acquired_at + Duration::from_secs(59)));
        assert!(token.is_stale(ttl, acquired_at + Duration::from_secs(60)));
    }

    #[test]
    fn test_outcome_serializes_with_kind_tag() {
        let outcome = LetterOutcome::Fallback {
            letter: "L".to_string(),
            reason: "down".to_string(),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["kind"], "fallback");
        assert_eq!(json["reason"], "down");
        assert_eq!(outcome.letter(), "L");
    }

    #[tokio::test]
    async fn test_generate_returns_first_choice() {
        let upstream = Arc::new(Upstream::default());
        let base = spawn_upstream(upstream_router(upstream.clone(), completion("Dear Acme"))).await;
        let llm = LlmClient::new(gigachat_settings(&base));

        let outcome = llm
            .generate_cover_letter("Rust dev", "Backend at Acme", AiTone::Enthusiastic)
            .await;
        assert_eq!(
            outcome,
            LetterOutcome::Generated {
                letter: "Dear Acme".to_string()
            }
        );

        let body = upstream.last_chat.lock().unwrap().clone().unwrap();
        assert_eq!(body["model"], "GigaChat-2");
        assert_eq!(body["n"], 1);
        assert_eq!(body["stream"], false);
        assert_eq!(body["max_tokens"], 1000);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["role"], "user");
        let prompt = body["messages"][1]["content"].as_str().unwrap();
        assert!(prompt.contains("Rust dev"));
        assert!(prompt.contains("enthusiastic and energetic"));
    }

    #[tokio::test]
    async fn test_token_is_reused_while_fresh() {
        let upstream = Arc::new(Upstream::default());
        let base = spawn_upstream(upstream_router(upstream.clone(), completion("ok"))).await;
        let llm = LlmClient::new(gigachat_settings(&base));

        llm.generate_cover_letter("r", "v", AiTone::Formal).await;
        llm.generate_cover_letter("r", "v", AiTone::Formal).await;
        assert_eq!(upstream.token_hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_stale_token_is_reacquired_with_fresh_rquid() {
        let upstream = Arc::new(Upstream::default());
        let base = spawn_upstream(upstream_router(upstream.clone(), completion("ok"))).await;
        let mut settings = gigachat_settings(&base);
        settings.token_ttl = Duration::ZERO;
        let llm = LlmClient::new(settings);

        llm.get_access_token().await.unwrap();
        llm.get_access_token().await.unwrap();
        assert_eq!(upstream.token_hits.load(Ordering::SeqCst), 2);

        let ids = upstream.rq_uids.lock().unwrap().clone();
        assert_ne!(ids[0], ids[1]);
    }

    #[tokio::test]
    async fn test_token_failure_propagates() {
        let router = Router::new().route("/oauth", post(|| async { StatusCode::UNAUTHORIZED }));
        let base = spawn_upstream(router).await;
        let llm = LlmClient::new(gigachat_settings(&base));

        let err = llm.get_access_token().await.unwrap_err();
        assert!(matches!(err, LlmError::Api { status: 401, .. }));
    }

    #[tokio::test]
    async fn test_fallback_when_unreachable_for_every_tone() {
        let llm = LlmClient::new(gigachat_settings(UNREACHABLE));
        for tone in ALL_TONES {
            let outcome = llm.generate_cover_letter("", "", tone).await;
            assert!(matches!(outcome, LetterOutcome::Fallback { .. }));
            assert!(!outcome.letter().trim().is_empty());
        }
    }

    #[tokio::test]
    async fn test_fallback_on_completion_error_records_reason() {
        let router = Router::new()
            .route("/oauth", post(|| async { Json(json!({"access_token": "giga-token"})) }))
            .route(
                "/chat/completions",
                post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
            );
        let base = spawn_upstream(router).await;
        let llm = LlmClient::new(gigachat_settings(&base));

        match llm.generate_cover_letter("r", "v", AiTone::Friendly).await {
            LetterOutcome::Fallback { letter, reason } => {
                assert_eq!(letter, prompts::fallback_letter(AiTone::Friendly));
                assert!(reason.contains("500"));
            }
            other => panic!("expected fallback, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_completion_falls_back() {
        let upstream = Arc::new(Upstream::default());
        let base = spawn_upstream(upstream_router(upstream, json!({"choices": []}))).await;
        let llm = LlmClient::new(gigachat_settings(&base));

        let outcome = llm.generate_cover_letter("r", "v", AiTone::Professional).await;
        assert!(matches!(outcome, LetterOutcome::Fallback { .. }));
    }

    #[tokio::test]
    async fn test_check_availability_is_idempotent() {
        let upstream = Arc::new(Upstream::default());
        let base = spawn_upstream(upstream_router(upstream, completion("ok"))).await;
        let reachable = LlmClient::new(gigachat_settings(&base));
        assert!(reachable.check_availability().await);
        assert!(reachable.check_availability().await);

        let unreachable = LlmClient::new(gigachat_settings(UNREACHABLE));
        let first = unreachable.check_availability().await;
        let second = unreachable.check_availability().await;
        assert!(!first);
        assert_eq!(first, second);
    }
}
