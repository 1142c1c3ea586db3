//! Where dashboard data comes from.
//!
//! `Dashboard::load` only sees the `DashboardSource` trait, so the fan-out
//! and its all-or-nothing join can be exercised without a provider. The chart
//! is not a source of its own: it is bucketed from the application logs.

use async_trait::async_trait;

use crate::errors::AppError;
use crate::hh_client::{AccessToken, HhClient};
use crate::llm_client::LlmClient;
use crate::models::resume::{ApplicationLog, Resume};

#[async_trait]
pub trait DashboardSource: Send + Sync {
    async fn resumes(&self) -> Result<Vec<Resume>, AppError>;
    async fn application_logs(&self) -> Result<Vec<ApplicationLog>, AppError>;
    async fn llm_available(&self) -> Result<bool, AppError>;
}

/// Production source: the provider for resumes and negotiations, GigaChat for
/// availability.
pub struct ProviderSource {
    hh: HhClient,
    llm: LlmClient,
    token: AccessToken,
}

impl ProviderSource {
    pub fn new(hh: HhClient, llm: LlmClient, token: AccessToken) -> Self {
        Self { hh, llm, token }
    }
}

#[async_trait]
impl DashboardSource for ProviderSource {
    async fn resumes(&self) -> Result<Vec<Resume>, AppError> {
        Ok(self.hh.get_resumes(&self.token).await?)
    }

    async fn application_logs(&self) -> Result<Vec<ApplicationLog>, AppError> {
        Ok(self.hh.get_applications(&self.token).await?)
    }

    async fn llm_available(&self) -> Result<bool, AppError> {
        Ok(self.llm.check_availability().await)
    }
}
