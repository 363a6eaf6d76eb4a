//! Background timer that fires at each IST midnight

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::calendar;

/// Schedules a callback at every civil-day boundary.
///
/// The timer is cancelled when [`MidnightRollover::shutdown`] is called or the
/// handle is dropped.
pub struct MidnightRollover {
    token: CancellationToken,
    _guard: DropGuard,
    handle: JoinHandle<()>,
}

impl MidnightRollover {
    /// Start the timer against the system clock
    pub fn spawn<F>(on_rollover: F) -> Self
    where
        F: FnMut(DateTime<Utc>) + Send + 'static,
    {
        Self::spawn_with_clock(Utc::now, on_rollover)
    }

    /// Start the timer against a custom clock
    pub fn spawn_with_clock<C, F>(clock: C, mut on_rollover: F) -> Self
    where
        C: Fn() -> DateTime<Utc> + Send + 'static,
        F: FnMut(DateTime<Utc>) + Send + 'static,
    {
        let token = CancellationToken::new();
        let cancelled = token.clone();

        let handle = tokio::spawn(async move {
            loop {
                let wait = calendar::until_next_midnight(clock());
                tracing::debug!(?wait, "Waiting for next civil day");

                tokio::select! {
                    biased;
                    _ = cancelled.cancelled() => break,
                    _ = tokio::time::sleep(wait) => {
                        let now = clock();
                        tracing::info!(today = %calendar::civil_date_key(now), "Civil day rolled over");
                        on_rollover(now);
                    }
                }
            }
            tracing::debug!("Midnight rollover stopped");
        });

        Self { _guard: token.clone().drop_guard(), token, handle }
    }

    /// Cancel the timer and wait for the task to finish
    pub async fn shutdown(self) {
        self.token.cancel();
        if let Err(err) = self.handle.await {
            tracing::warn!(error = %err, "Midnight rollover task failed");
        }
    }
}
