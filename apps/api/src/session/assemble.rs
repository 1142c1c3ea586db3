use tracing::{info, warn};

use crate::errors::AppError;
use crate::hh_client::{AccessToken, HhClient};
use crate::models::user::User;

/// Fetches profile, resumes and applications concurrently and builds the
/// session user. Any failure aborts the whole assembly; no partial user is
/// ever returned.
pub async fn assemble_session(hh: &HhClient, token: &AccessToken) -> Result<User, AppError> {
    let (profile, resumes, applications) = tokio::try_join!(
        hh.get_profile(token),
        hh.get_resumes(token),
        hh.get_applications(token),
    )
    .map_err(|e| {
        warn!("Session assembly failed: {e}");
        AppError::SessionAssembly(e.to_string())
    })?;

    info!(
        "Session assembled for user {} ({} resumes, {} applications)",
        profile.id,
        resumes.len(),
        applications.len()
    );
    Ok(User::from_provider(profile, resumes, applications))
}
