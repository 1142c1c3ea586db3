use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::hh_client::HhError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    /// The provider redirected back with an `error` parameter.
    #[error("Authorization denied by provider: {0}")]
    Authorization(String),

    #[error("OAuth state is missing, unknown or expired")]
    StateMismatch,

    #[error("Token exchange failed: {0}")]
    TokenExchange(String),

    #[error("Upstream returned HTTP {status}")]
    UpstreamHttp { status: u16 },

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Session assembly failed: {0}")]
    SessionAssembly(String),

    #[error("Cover letter generation failed: {0}")]
    LetterGeneration(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<HhError> for AppError {
    fn from(err: HhError) -> Self {
        match err {
            HhError::Upstream { status } => AppError::UpstreamHttp { status },
            HhError::TokenExchange(msg) => AppError::TokenExchange(msg),
            other => AppError::UpstreamUnavailable(other.to_string()),
        }
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Authorization(msg) => (
                StatusCode::UNAUTHORIZED,
                "AUTHORIZATION_ERROR",
                format!("Authorization error: {msg}"),
            ),
            AppError::StateMismatch => (
                StatusCode::BAD_REQUEST,
                "STATE_MISMATCH",
                "The login attempt expired. Please log in again".to_string(),
            ),
            AppError::TokenExchange(msg) => {
                tracing::error!("Token exchange error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "TOKEN_EXCHANGE_ERROR",
                    "Could not obtain an access token".to_string(),
                )
            }
            AppError::UpstreamHttp { status } => {
                tracing::error!("Upstream HTTP error: {status}");
                (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_HTTP_ERROR",
                    format!("The recruiting platform returned HTTP {status}"),
                )
            }
            AppError::UpstreamUnavailable(msg) => {
                tracing::error!("Upstream unavailable: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_UNAVAILABLE",
                    "The recruiting platform could not be reached".to_string(),
                )
            }
            AppError::SessionAssembly(msg) => {
                tracing::error!("Session assembly error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "SESSION_ASSEMBLY_ERROR",
                    "Could not load your profile".to_string(),
                )
            }
            AppError::LetterGeneration(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "LETTER_GENERATION_ERROR",
                msg.clone(),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Authentication required".to_string(),
            ),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

/// Error raised on the login path. Rendered with a `return_to` link so the
/// error screen can offer a way back home.
#[derive(Debug)]
pub struct LoginFailure {
    pub error: AppError,
    pub home: String,
}

impl IntoResponse for LoginFailure {
    fn into_response(self) -> Response {
        let (status, code, message) = self.error.parts();

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            },
            "return_to": self.home
        }));

        (status, body).into_response()
    }
}
