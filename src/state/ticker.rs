//! Recurring tick source for a running countdown

use std::time::Duration;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

/// Default refresh period
pub const TICK_PERIOD: Duration = Duration::from_millis(1_000);

/// An armed repeating tick. Dropping it cancels the ticks.
#[derive(Debug)]
pub struct Ticker {
    id: u64,
    interval: Interval,
}

impl Ticker {
    /// Arm a ticker whose first tick fires one `period` from now
    pub fn arm(id: u64, period: Duration) -> Self {
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { id, interval }
    }

    /// Identifies which arming this ticker belongs to
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Wait for the next tick
    pub async fn tick(&mut self) {
        self.interval.tick().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn first_tick_waits_one_period() {
        let start = Instant::now();
        let mut ticker = Ticker::arm(7, TICK_PERIOD);
        assert_eq!(ticker.id(), 7);

        ticker.tick().await;
        assert_eq!(start.elapsed(), TICK_PERIOD);

        ticker.tick().await;
        assert_eq!(start.elapsed(), TICK_PERIOD * 2);
    }
}
