use axum::Json;
use serde::Deserialize;

use crate::errors::AppError;
use crate::subscription::{simulate_upgrade, Plan, UpgradeOutcome, PLANS};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpgradeRequest {
    pub plan_id: String,
}

/// GET /api/v1/subscription/plans
pub async fn handle_list_plans() -> Json<&'static [Plan]> {
    Json(&PLANS)
}

/// POST /api/v1/subscription/upgrade
pub async fn handle_upgrade(
    Json(req): Json<UpgradeRequest>,
) -> Result<Json<UpgradeOutcome>, AppError> {
    Ok(Json(simulate_upgrade(&req.plan_id).await?))
}
