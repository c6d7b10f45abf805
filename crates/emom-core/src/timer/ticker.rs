use std::time::Duration;

use tokio::time::{self, Instant, Interval, MissedTickBehavior};

/// Periodic tick source for the timer.
///
/// While stopped, [`IntervalTicker::tick`] never resolves, so a `select!`
/// loop can keep polling it without special-casing the paused state.
#[derive(Debug)]
pub struct IntervalTicker {
    period: Duration,
    interval: Option<Interval>,
}

impl IntervalTicker {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            interval: None,
        }
    }

    /// Standard one-second cadence.
    pub fn every_second() -> Self {
        Self::new(Duration::from_secs(1))
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_running(&self) -> bool {
        self.interval.is_some()
    }

    /// Subscribe. The first tick arrives one full period from now.
    /// Calling this while already running keeps the current phase.
    pub fn start(&mut self) {
        if self.interval.is_some() {
            return;
        }
        let mut interval = time::interval_at(Instant::now() + self.period, self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.interval = Some(interval);
    }

    /// Unsubscribe. Pending ticks are dropped.
    pub fn stop(&mut self) {
        self.interval = None;
    }

    /// Follow the timer: run while it wants ticks, stop otherwise.
    pub fn sync(&mut self, wants_ticks: bool) {
        if wants_ticks {
            self.start();
        } else {
            self.stop();
        }
    }

    pub async fn tick(&mut self) -> Instant {
        match self.interval.as_mut() {
            Some(interval) => interval.tick().await,
            None => std::future::pending().await,
        }
    }
}
