use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// Recruiting-platform (HeadHunter) OAuth app and REST settings.
#[derive(Debug, Clone)]
pub struct HhSettings {
    pub api_base: String,
    pub oauth_base: String,
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    /// Sent on every call as the client identification header.
    pub user_agent: String,
}

/// GigaChat client-credentials and completion settings.
#[derive(Debug, Clone)]
pub struct GigaChatSettings {
    pub oauth_url: String,
    pub api_base: String,
    pub client_id: String,
    pub client_secret: String,
    pub scope: String,
    pub model: String,
    /// Cached access tokens older than this are re-acquired before use.
    pub token_ttl: Duration,
}

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub hh: HhSettings,
    pub gigachat: GigaChatSettings,
    pub sync_interval: Duration,
    pub client_state_path: PathBuf,
    /// Where the browser lands after login, logout and failed callbacks.
    pub home_path: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            hh: HhSettings {
                api_base: env_or("HH_API_BASE", "https://api.hh.ru"),
                oauth_base: env_or("HH_OAUTH_BASE", "https://hh.ru"),
                client_id: require_env("HH_CLIENT_ID")?,
                client_secret: require_env("HH_CLIENT_SECRET")?,
                redirect_uri: require_env("HH_REDIRECT_URI")?,
                user_agent: env_or("HH_USER_AGENT", "otclick24/1.0 (https://otclick24.ru)"),
            },
            gigachat: GigaChatSettings {
                oauth_url: env_or(
                    "GIGACHAT_OAUTH_URL",
                    "https://ngw.devices.sberbank.ru:9443/api/v2/oauth",
                ),
                api_base: env_or(
                    "GIGACHAT_API_BASE",
                    "https://gigachat.devices.sberbank.ru/api/v1",
                ),
                client_id: require_env("GIGACHAT_CLIENT_ID")?,
                client_secret: require_env("GIGACHAT_CLIENT_SECRET")?,
                scope: env_or("GIGACHAT_SCOPE", "GIGACHAT_API_PERS"),
                model: env_or("GIGACHAT_MODEL", "GigaChat-2"),
                token_ttl: Duration::from_secs(parse_env("GIGACHAT_TOKEN_TTL_SECS", 1500)?),
            },
            // A zero period would make the resync timer panic
            sync_interval: Duration::from_secs(parse_env::<u64>("SYNC_INTERVAL_SECS", 300)?.max(1)),
            client_state_path: PathBuf::from(env_or("CLIENT_STATE_PATH", "client_state.json")),
            home_path: env_or("APP_HOME_PATH", "/"),
            port: parse_env("PORT", 8080)?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}
