//! Periodic background resync, tied to the lifetime of its owner.
//!
//! The tick itself is an extension point: today it only logs. What matters is
//! that the task is cancellable and provably stops when the owning session is
//! dropped or logged out.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::debug;
use uuid::Uuid;

pub struct SyncTask {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl SyncTask {
    /// Runs `tick` every `period`, first after one full period.
    pub fn spawn<F, Fut>(period: Duration, mut tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send,
    {
        let cancel = CancellationToken::new();
        let stopped = cancel.clone();
        let handle = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = stopped.cancelled() => break,
                    _ = interval.tick() => tick().await,
                }
            }
            debug!("Sync task stopped");
        });
        Self { cancel, handle }
    }

    pub fn stop(&self) {
        self.cancel.cancel();
    }

    #[cfg(test)]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Dropping also aborts a tick that is still running.
impl Drop for SyncTask {
    fn drop(&mut self) {
        self.cancel.cancel();
        self.handle.abort();
    }
}

/// Default tick for a session's resync task.
// TODO: pull fresh resumes and negotiations here once the provider's rate
// limits for background polling are known.
pub async fn resync_tick(session_id: Uuid) {
    debug!(%session_id, "Background resync tick (no-op)");
}
