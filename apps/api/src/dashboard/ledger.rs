//! Applications sent through this service during the session.
//!
//! The provider's negotiation list does not include the message that was
//! sent, so the letter and the mode that produced it are kept here and
//! merged into the application logs on every load.
//!
//! The ledger also enforces the daily cap. An apply takes a `Reservation`
//! before any upstream call; the slot counts against the cap until it is
//! committed as a sent application or dropped.

use std::sync::atomic::{AtomicU32, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::debug;

use crate::models::resume::ApplicationLog;
use crate::models::user::CoverLetterMode;

#[derive(Debug, Clone)]
pub struct SentApplication {
    pub vacancy_id: String,
    pub resume_id: String,
    pub letter: String,
    pub mode: CoverLetterMode,
    pub sent_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct SentLedger {
    entries: Mutex<Vec<SentApplication>>,
    /// Incremented only while `entries` is locked.
    reserved: AtomicU32,
}

/// A slot under the daily cap. Dropping it without `commit` frees the slot.
#[derive(Debug)]
#[must_use]
pub struct Reservation<'a> {
    ledger: &'a SentLedger,
}

impl Reservation<'_> {
    /// Records the sent application and frees the slot in one step, so the
    /// cap never sees both or neither.
    pub async fn commit(self, sent: SentApplication) {
        let ledger = self.ledger;
        let mut entries = ledger.entries.lock().await;
        debug!(
            "Recorded application to {} with resume {}",
            sent.vacancy_id, sent.resume_id
        );
        entries.push(sent);
        drop(self);
    }
}

impl Drop for Reservation<'_> {
    fn drop(&mut self) {
        self.ledger.reserved.fetch_sub(1, Ordering::SeqCst);
    }
}

impl SentLedger {
    /// Claims a slot unless today's sends plus outstanding reservations have
    /// reached `limit`. A limit of 0 means no cap.
    pub async fn try_reserve(&self, limit: u32, now: DateTime<Utc>) -> Option<Reservation<'_>> {
        let entries = self.entries.lock().await;
        let taken = sent_on_day_of(&entries, now) + self.reserved.load(Ordering::SeqCst);
        if limit > 0 && taken >= limit {
            return None;
        }
        self.reserved.fetch_add(1, Ordering::SeqCst);
        Some(Reservation { ledger: self })
    }

    /// Fills in letter and mode for logs whose vacancy we applied to. The
    /// most recent send wins.
    pub async fn annotate(&self, logs: &mut [ApplicationLog]) {
        let entries = self.entries.lock().await;
        for log in logs.iter_mut() {
            if let Some(sent) = entries
                .iter()
                .rev()
                .find(|e| e.vacancy_id == log.vacancy.id)
            {
                log.cover_letter = sent.letter.clone();
                log.cover_letter_mode = sent.mode;
            }
        }
    }
}

/// Applications sent on the same UTC calendar day as `now`.
fn sent_on_day_of(entries: &[SentApplication], now: DateTime<Utc>) -> u32 {
    let today = now.date_naive();
    entries
        .iter()
        .filter(|e| e.sent_at.date_naive() == today)
        .count() as u32
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;
    use crate::models::resume::ApplicationStatus;
    use crate::models::vacancy::Vacancy;

    fn sent(vacancy_id: &str, letter: &str, at: DateTime<Utc>) -> SentApplication {
        SentApplication {
            vacancy_id: vacancy_id.to_string(),
            resume_id: "r1".to_string(),
            letter: letter.to_string(),
            mode: CoverLetterMode::Ai,
            sent_at: at,
        }
    }

    fn log_for(vacancy_id: &str) -> ApplicationLog {
        ApplicationLog {
            id: format!("n-{vacancy_id}"),
            vacancy: Vacancy {
                id: vacancy_id.to_string(),
                title: "Engineer".to_string(),
                company: "Acme".to_string(),
                salary: "Not specified".to_string(),
                url: String::new(),
                location: "Moscow".to_string(),
                published_at: None,
                requirement: None,
                responsibility: None,
            },
            resume: None,
            status: ApplicationStatus::Applied,
            applied_at: Utc::now(),
            cover_letter: String::new(),
            cover_letter_mode: CoverLetterMode::None,
        }
    }

    async fn record(ledger: &SentLedger, sent: SentApplication) {
        let slot = ledger.try_reserve(0, sent.sent_at).await.unwrap();
        slot.commit(sent).await;
    }

    #[tokio::test]
    async fn test_cap_counts_only_today() {
        let now = Utc.with_ymd_and_hms(2024, 9, 26, 12, 0, 0).unwrap();
        let ledger = SentLedger::default();
        record(&ledger, sent("v1", "a", now)).await;
        record(&ledger, sent("v2", "b", now - Duration::hours(3))).await;
        record(&ledger, sent("v3", "c", now - Duration::days(1))).await;

        assert!(ledger.try_reserve(2, now).await.is_none());
        assert!(ledger.try_reserve(3, now).await.is_some());
        assert!(ledger.try_reserve(0, now).await.is_some());
    }

    #[tokio::test]
    async fn test_outstanding_reservation_holds_the_last_slot() {
        let now = Utc::now();
        let ledger = SentLedger::default();

        let held = ledger.try_reserve(1, now).await.unwrap();
        assert!(ledger.try_reserve(1, now).await.is_none());

        held.commit(sent("v1", "a", now)).await;
        assert!(ledger.try_reserve(1, now).await.is_none());
        assert_eq!(ledger.reserved.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_dropped_reservation_frees_the_slot() {
        let now = Utc::now();
        let ledger = SentLedger::default();

        let held = ledger.try_reserve(1, now).await.unwrap();
        drop(held);
        assert!(ledger.try_reserve(1, now).await.is_some());
    }

    #[tokio::test]
    async fn test_annotate_uses_latest_send() {
        let now = Utc::now();
        let ledger = SentLedger::default();
        record(&ledger, sent("v1", "first", now)).await;
        record(&ledger, sent("v1", "second", now)).await;

        let mut logs = vec![log_for("v1"), log_for("v2")];
        ledger.annotate(&mut logs).await;

        assert_eq!(logs[0].cover_letter, "second");
        assert_eq!(logs[0].cover_letter_mode, CoverLetterMode::Ai);
        assert!(logs[1].cover_letter.is_empty());
        assert_eq!(logs[1].cover_letter_mode, CoverLetterMode::None);
    }
}
