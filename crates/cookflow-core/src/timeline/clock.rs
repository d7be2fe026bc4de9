//! The recurring one-second callback that drives [`TimelineEngine::tick`].
//!
//! [`TimelineEngine::tick`]: super::TimelineEngine::tick

use std::time::Duration;

use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(1000);

/// At most one interval is ever armed; arming again replaces the old one.
#[derive(Debug)]
pub struct TickClock {
    period: Duration,
    interval: Option<Interval>,
}

impl TickClock {
    pub fn new(period: Duration) -> Self {
        Self {
            period: if period.is_zero() {
                DEFAULT_TICK_INTERVAL
            } else {
                period
            },
            interval: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_armed(&self) -> bool {
        self.interval.is_some()
    }

    /// Schedule ticks starting one period from now, cancelling any prior
    /// schedule.
    pub fn arm(&mut self) {
        let mut interval = interval_at(Instant::now() + self.period, self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.interval = Some(interval);
    }

    pub fn disarm(&mut self) {
        self.interval = None;
    }

    /// Wait for the next tick. Pends forever while disarmed, so it can sit
    /// in a `select!` next to other inputs.
    pub async fn next_tick(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_INTERVAL)
    }
}
