//! First-run walkthrough.
//!
//! Five fixed steps. Finishing or skipping stores `"true"` under the user's
//! `onboardingCompleted` key; the wizard opens on its own only while that
//! value is anything else.

pub mod store;

use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::onboarding::store::ClientStateStore;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Step {
    pub title: &'static str,
    pub description: &'static str,
}

pub static STEPS: [Step; 5] = [
    Step {
        title: "Welcome to otclick",
        description: "The service applies to vacancies for you while you focus on interviews.",
    },
    Step {
        title: "Connect your resume",
        description: "Your resumes are loaded from your HeadHunter account automatically.",
    },
    Step {
        title: "Set up search filters",
        description: "Keywords, salary, experience and schedule decide which vacancies match.",
    },
    Step {
        title: "Configure AI cover letters",
        description: "Choose a tone and the assistant writes a letter for every application.",
    },
    Step {
        title: "You're all set",
        description: "Track applications, views and invitations on the dashboard.",
    },
];

const COMPLETED_VALUE: &str = "true";

pub fn completion_key(user_id: &str) -> String {
    format!("{user_id}:onboardingCompleted")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Transition {
    Moved,
    Completed,
    /// Nothing changed: already at the first step, or the wizard is closed.
    Blocked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Wizard {
    pub current: usize,
    pub open: bool,
}

impl Wizard {
    pub fn new(open: bool) -> Self {
        Self { current: 0, open }
    }

    pub fn step(&self) -> &'static Step {
        &STEPS[self.current]
    }

    pub fn next(&mut self) -> Transition {
        if !self.open {
            return Transition::Blocked;
        }
        if self.current + 1 < STEPS.len() {
            self.current += 1;
            Transition::Moved
        } else {
            self.open = false;
            Transition::Completed
        }
    }

    pub fn prev(&mut self) -> Transition {
        if !self.open || self.current == 0 {
            return Transition::Blocked;
        }
        self.current -= 1;
        Transition::Moved
    }

    pub fn skip(&mut self) -> Transition {
        if !self.open {
            return Transition::Blocked;
        }
        self.open = false;
        Transition::Completed
    }

    /// Opens again at the first step. The stored completion flag is untouched.
    pub fn reopen(&mut self) {
        self.current = 0;
        self.open = true;
    }
}

/// Whether the wizard should open by itself for this user.
pub async fn should_auto_open(
    store: &dyn ClientStateStore,
    user_id: &str,
) -> Result<bool, AppError> {
    let value = store.get(&completion_key(user_id)).await?;
    Ok(value.as_deref() != Some(COMPLETED_VALUE))
}

pub async fn mark_completed(store: &dyn ClientStateStore, user_id: &str) -> Result<(), AppError> {
    store.set(&completion_key(user_id), COMPLETED_VALUE).await?;
    info!("Onboarding completed for user {user_id}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::onboarding::store::MemoryStateStore;

    #[test]
    fn test_next_walks_all_steps_then_completes() {
        let mut wizard = Wizard::new(true);
        for expected in 1..STEPS.len() {
            assert_eq!(wizard.next(), Transition::Moved);
            assert_eq!(wizard.current, expected);
        }
        assert_eq!(wizard.next(), Transition::Completed);
        assert!(!wizard.open);
    }

    #[test]
    fn test_prev_at_first_step_is_no_op() {
        let mut wizard = Wizard::new(true);
        assert_eq!(wizard.prev(), Transition::Blocked);
        assert_eq!(wizard.current, 0);

        wizard.next();
        assert_eq!(wizard.prev(), Transition::Moved);
        assert_eq!(wizard.current, 0);
    }

    #[test]
    fn test_skip_completes_from_any_step() {
        let mut wizard = Wizard::new(true);
        wizard.next();
        wizard.next();
        assert_eq!(wizard.skip(), Transition::Completed);
        assert!(!wizard.open);
        assert_eq!(wizard.next(), Transition::Blocked);
    }

    #[test]
    fn test_reopen_starts_over() {
        let mut wizard = Wizard::new(true);
        wizard.next();
        wizard.skip();
        wizard.reopen();
        assert!(wizard.open);
        assert_eq!(wizard.current, 0);
        assert_eq!(wizard.step().title, "Welcome to otclick");
    }

    #[tokio::test]
    async fn test_auto_open_only_until_completed() {
        let store = MemoryStateStore::default();
        assert!(should_auto_open(&store, "42").await.unwrap());

        store
            .set(&completion_key("42"), "yes")
            .await
            .unwrap();
        assert!(should_auto_open(&store, "42").await.unwrap());

        mark_completed(&store, "42").await.unwrap();
        assert!(!should_auto_open(&store, "42").await.unwrap());
        assert!(should_auto_open(&store, "7").await.unwrap());
    }
}
