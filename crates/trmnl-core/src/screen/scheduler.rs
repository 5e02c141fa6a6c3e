use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::settings::MIN_REFRESH_RATE_SECONDS;

/// Sent when an armed timer elapses.
///
/// The generation identifies which arming produced it, so a firing that
/// raced with a re-arm or cancel can be told apart from the live timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerFired {
    pub generation: u64,
}

struct PendingTimer {
    handle: JoinHandle<()>,
    duration: Duration,
    generation: u64,
}

/// Owns at most one pending one-shot refresh timer.
///
/// Arming always cancels the previous timer first. Must be used from within
/// a tokio runtime.
pub struct RefreshScheduler {
    tx: mpsc::UnboundedSender<TimerFired>,
    pending: Option<PendingTimer>,
    generation: u64,
}

impl RefreshScheduler {
    /// Create a scheduler and the receiver its timers fire into.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<TimerFired>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let scheduler = Self {
            tx,
            pending: None,
            generation: 0,
        };
        (scheduler, rx)
    }

    /// Cancel any pending timer and arm a new one for `max(5, seconds)`.
    ///
    /// Returns the duration actually armed.
    pub fn schedule_next(&mut self, seconds: u64) -> Duration {
        self.cancel();

        let duration = Duration::from_secs(seconds.max(MIN_REFRESH_RATE_SECONDS));
        self.generation = self.generation.wrapping_add(1);
        let generation = self.generation;
        let tx = self.tx.clone();

        let handle = tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            if tx.send(TimerFired { generation }).is_err() {
                debug!(
                    event = "core.scheduler.fire_dropped",
                    generation = generation,
                    "Timer fired after its receiver was dropped"
                );
            }
        });

        self.pending = Some(PendingTimer {
            handle,
            duration,
            generation,
        });

        info!(
            event = "core.scheduler.armed",
            seconds = duration.as_secs(),
            generation = generation
        );

        duration
    }

    /// Cancel the pending timer, if any. Idempotent.
    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.handle.abort();
            debug!(
                event = "core.scheduler.cancelled",
                generation = pending.generation
            );
        }
    }

    /// Whether a timer is armed and has not fired yet.
    pub fn is_armed(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|pending| !pending.handle.is_finished())
    }

    /// Duration of the most recent arming, unless it was cancelled.
    pub fn armed_duration(&self) -> Option<Duration> {
        self.pending.as_ref().map(|pending| pending.duration)
    }

    /// Whether `fired` came from the current timer rather than a replaced
    /// or cancelled one.
    pub fn is_current(&self, fired: TimerFired) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|pending| pending.generation == fired.generation)
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}
