//! Periodic tick source for the focus timer
//!
//! A [`Ticker`] owns at most one spawned tokio task that calls a closure on a
//! fixed period. The closure returns `false` to end the loop on its own, e.g.
//! when a countdown hits zero. Dropping the ticker aborts the task, so a
//! removed timer never keeps ticking in the background.

use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::debug;

pub const TICK_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug, Default)]
pub struct Ticker {
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a tick loop is currently scheduled
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Start ticking every `period`, replacing any loop already running
    ///
    /// The first call happens one full period after start. Must be called
    /// from within a tokio runtime.
    pub fn start<F>(&mut self, period: Duration, mut on_tick: F)
    where
        F: FnMut() -> bool + Send + 'static,
    {
        self.stop();
        let handle = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if !on_tick() {
                    break;
                }
            }
            debug!("tick loop finished");
        });
        self.handle = Some(handle);
    }

    /// Cancel the tick loop; safe to call when nothing is running
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}
