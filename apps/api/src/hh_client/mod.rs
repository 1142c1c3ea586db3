/// HeadHunter client — OAuth code flow plus the bearer-authenticated REST
/// calls the dashboard needs.
///
/// Every accessor translates the provider's JSON into the flat records in
/// `crate::models`. Non-2xx responses surface as `HhError::Upstream` with the
/// status; there is no retry, the caller decides whether to degrade.
use std::fmt;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::config::HhSettings;
use crate::models::resume::{ApplicationLog, Resume};
use crate::models::user::Profile;
use crate::models::vacancy::{FilterSettings, Vacancy};

mod mapping;
pub mod search;

/// Region searched when the filters name none (Moscow).
pub const DEFAULT_AREA: &str = "1";
pub const DEFAULT_CURRENCY: &str = "RUR";
pub const SEARCH_ORDER: &str = "publication_time";
pub const SEARCH_PAGE_SIZE: u32 = 20;

#[derive(Debug, Error)]
pub enum HhError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider returned HTTP {status}")]
    Upstream { status: u16 },

    #[error("Token exchange failed: {0}")]
    TokenExchange(String),

    #[error("Invalid provider URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Bearer token issued by the provider. Only the session holds one; `Debug`
/// is redacted and there is no `Serialize`.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Items<T> {
    items: Vec<T>,
}

#[derive(Clone)]
pub struct HhClient {
    client: Client,
    settings: HhSettings,
}

impl HhClient {
    pub fn new(settings: HhSettings) -> Self {
        Self {
            client: Client::builder()
                .user_agent(settings.user_agent.clone())
                .build()
                .expect("Failed to build HTTP client"),
            settings,
        }
    }

    /// The provider's authorize URL for the code flow. `state` is echoed back
    /// on the callback.
    pub fn authorization_url(&self, state: &str) -> Result<String, HhError> {
        let mut url = Url::parse(&format!("{}/oauth/authorize", self.settings.oauth_base))?;
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", &self.settings.client_id)
            .append_pair("redirect_uri", &self.settings.redirect_uri)
            .append_pair("state", state);
        Ok(url.into())
    }

    /// Exchanges an authorization code for a bearer token. The token is
    /// returned exactly as the provider sent it.
    pub async fn exchange_code_for_token(&self, code: &str) -> Result<AccessToken, HhError> {
        let params = [
            ("grant_type", "authorization_code"),
            ("client_id", self.settings.client_id.as_str()),
            ("client_secret", self.settings.client_secret.as_str()),
            ("redirect_uri", self.settings.redirect_uri.as_str()),
            ("code", code),
        ];

        let response = self
            .client
            .post(format!("{}/oauth/token", self.settings.oauth_base))
            .form(&params)
            .send()
            .await
            .map_err(|e| HhError::TokenExchange(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Token endpoint returned {status}: {body}");
            return Err(HhError::TokenExchange(format!("HTTP {status}")));
        }

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| HhError::TokenExchange(format!("malformed token response: {e}")))?;

        body.access_token
            .filter(|t| !t.is_empty())
            .map(AccessToken::new)
            .ok_or_else(|| HhError::TokenExchange("response has no access_token".to_string()))
    }

    pub async fn get_profile(&self, token: &AccessToken) -> Result<Profile, HhError> {
        let me: mapping::HhMe = self.get_json("/me", token, &[]).await?;
        Ok(me.into())
    }

    pub async fn get_resumes(&self, token: &AccessToken) -> Result<Vec<Resume>, HhError> {
        let page: Items<mapping::HhResume> = self.get_json("/resumes/mine", token, &[]).await?;
        Ok(page.items.into_iter().map(Resume::from).collect())
    }

    pub async fn get_applications(
        &self,
        token: &AccessToken,
    ) -> Result<Vec<ApplicationLog>, HhError> {
        let page: Items<mapping::HhNegotiation> =
            self.get_json("/negotiations", token, &[]).await?;
        Ok(page.items.into_iter().map(ApplicationLog::from).collect())
    }

    pub async fn search_vacancies(
        &self,
        token: &AccessToken,
        filters: &FilterSettings,
    ) -> Result<Vec<Vacancy>, HhError> {
        let query = search::query_params(filters);
        let page: Items<mapping::HhVacancy> = self.get_json("/vacancies", token, &query).await?;
        debug!("Vacancy search returned {} items", page.items.len());
        Ok(page.items.into_iter().map(Vacancy::from).collect())
    }

    /// Creates a negotiation (an application) for the vacancy with the given
    /// resume. An absent cover letter is sent as an empty message.
    pub async fn apply_to_vacancy(
        &self,
        token: &AccessToken,
        vacancy_id: &str,
        resume_id: &str,
        cover_letter: Option<&str>,
    ) -> Result<(), HhError> {
        let body = serde_json::json!({
            "vacancy_id": vacancy_id,
            "resume_id": resume_id,
            "message": cover_letter.unwrap_or(""),
        });
        let request = self.authorized(self.client.post(self.url("/negotiations")), token);
        let response = request.json(&body).send().await?;
        check_status("/negotiations", response.status())?;
        Ok(())
    }

    pub async fn get_dictionaries(&self, token: &AccessToken) -> Result<Value, HhError> {
        self.get_json("/dictionaries", token, &[]).await
    }

    pub async fn get_areas(&self, token: &AccessToken) -> Result<Value, HhError> {
        self.get_json("/areas", token, &[]).await
    }

    pub async fn get_professional_roles(&self, token: &AccessToken) -> Result<Value, HhError> {
        self.get_json("/professional_roles", token, &[]).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.settings.api_base, path)
    }

    fn authorized(&self, request: RequestBuilder, token: &AccessToken) -> RequestBuilder {
        request.bearer_auth(token.secret())
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        token: &AccessToken,
        query: &[(&str, String)],
    ) -> Result<T, HhError> {
        let request = self.authorized(self.client.get(self.url(path)), token);
        let response = request.query(query).send().await.map_err(|e| {
            warn!("GET {path} failed: {e}");
            HhError::Http(e)
        })?;
        check_status(path, response.status())?;
        Ok(response.json::<T>().await?)
    }
}

fn check_status(path: &str, status: reqwest::StatusCode) -> Result<(), HhError> {
    if status.is_success() {
        return Ok(());
    }
    warn!("{path} returned {status}");
    Err(HhError::Upstream {
        status: status.as_u16(),
    })
}
