//! Fixed-period automatic refresh.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::Action;

/// Dispatches an action immediately and then once per period until stopped.
///
/// There is no backoff: failures of the triggered fetch are reported through
/// the store and the schedule keeps running.
#[derive(Debug)]
pub struct Poller {
    period: Duration,
    handle: Option<JoinHandle<()>>,
}

impl Poller {
    /// Create a stopped poller.
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            handle: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Whether the timer is active.
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Start dispatching `action`, replacing any running timer.
    pub fn start(&mut self, action_tx: mpsc::UnboundedSender<Action>, action: Action) {
        self.stop();

        let period = self.period;
        tracing::info!(period_secs = period.as_secs(), ?action, "Auto-refresh started");

        self.handle = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                // The first tick completes immediately.
                interval.tick().await;
                if action_tx.send(action.clone()).is_err() {
                    break;
                }
            }
        }));
    }

    /// Clear the timer. Returns `true` if a timer was cleared.
    pub fn stop(&mut self) -> bool {
        match self.handle.take() {
            Some(handle) => {
                handle.abort();
                tracing::info!("Auto-refresh stopped");
                true
            }
            None => false,
        }
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.stop();
    }
}
