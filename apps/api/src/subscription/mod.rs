//! Subscription plans and the simulated upgrade flow. No billing happens.

use std::time::Duration;

use serde::Serialize;
use tracing::info;

use crate::errors::AppError;

/// Fixed delay standing in for payment processing.
pub const UPGRADE_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: &'static str,
    pub name: &'static str,
    /// Monthly price in roubles.
    pub price: u32,
    pub period: &'static str,
    pub description: &'static str,
    pub features: &'static [&'static str],
    pub popular: bool,
}

pub static PLANS: [Plan; 3] = [
    Plan {
        id: "basic",
        name: "Basic",
        price: 990,
        period: "month",
        description: "For those starting a job search",
        features: &[
            "Up to 50 applications per month",
            "Basic search filters",
            "AI cover letters",
            "Email support",
        ],
        popular: false,
    },
    Plan {
        id: "premium",
        name: "Premium",
        price: 1990,
        period: "month",
        description: "For an active job search",
        features: &[
            "Up to 200 applications per month",
            "Advanced filters",
            "AI cover letters",
            "Priority support",
            "Analytics and reports",
            "Automatic applications",
        ],
        popular: true,
    },
    Plan {
        id: "enterprise",
        name: "Enterprise",
        price: 4990,
        period: "month",
        description: "For HR agencies and recruiters",
        features: &[
            "Unlimited applications",
            "All filters and features",
            "Personal manager",
            "API access",
            "Custom integrations",
            "White label",
        ],
        popular: false,
    },
];

#[derive(Debug, Clone, Serialize)]
pub struct UpgradeOutcome {
    pub plan: &'static Plan,
    pub closed: bool,
}

pub fn find_plan(plan_id: &str) -> Option<&'static Plan> {
    PLANS.iter().find(|p| p.id == plan_id)
}

/// Pretends to process a payment. The user's subscription is not changed.
pub async fn simulate_upgrade(plan_id: &str) -> Result<UpgradeOutcome, AppError> {
    let plan = find_plan(plan_id)
        .ok_or_else(|| AppError::NotFound(format!("Plan '{plan_id}' not found")))?;
    tokio::time::sleep(UPGRADE_DELAY).await;
    info!("Simulated upgrade to {} plan", plan.id);
    Ok(UpgradeOutcome { plan, closed: true })
}

#[cfg(test)]
mod tests {
    use tokio::time::Instant;

    use super::*;

    #[test]
    fn test_exactly_one_popular_plan() {
        let popular: Vec<_> = PLANS.iter().filter(|p| p.popular).collect();
        assert_eq!(popular.len(), 1);
        assert_eq!(popular[0].id, "premium");
        assert_eq!(
            PLANS.iter().map(|p| p.price).collect::<Vec<_>>(),
            vec![990, 1990, 4990]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_upgrade_waits_then_closes() {
        let started = Instant::now();
        let outcome = simulate_upgrade("enterprise").await.unwrap();
        assert!(started.elapsed() >= UPGRADE_DELAY);
        assert!(outcome.closed);
        assert_eq!(outcome.plan.price, 4990);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_plan_fails_without_waiting() {
        let started = Instant::now();
        let result = simulate_upgrade("platinum").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert_eq!(started.elapsed(), Duration::ZERO);
    }
}
