//! The countdown refresh state machine

use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::{
    display_state::{DisplayState, Phase},
    ticker::{Ticker, TICK_PERIOD},
};
use crate::countdown::{compute, progress_percent, Breakdown, Countdown};

/// Drives one countdown: validates targets, owns the tick source and
/// turns ticks into display states.
///
/// At most one ticker exists at a time. Every transition out of
/// `Running` drops it.
#[derive(Debug)]
pub struct RefreshMachine {
    phase: Phase,
    target: Option<DateTime<Utc>>,
    /// Remaining time at validation, the fixed denominator for progress
    total_ms: i64,
    countdown: Countdown,
    progress: f64,
    show_error: bool,
    show_celebration: bool,
    ticker: Option<Ticker>,
    tick_period: Duration,
    armed_count: u64,
}

impl RefreshMachine {
    /// Create an idle machine ticking every `tick_period` once running
    pub fn new(tick_period: Duration) -> Self {
        Self {
            phase: Phase::Idle,
            target: None,
            total_ms: 0,
            countdown: Countdown {
                breakdown: Breakdown::ZERO,
                remaining_ms: 0,
            },
            progress: 0.0,
            show_error: false,
            show_celebration: false,
            ticker: None,
            tick_period,
            armed_count: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn total_ms(&self) -> i64 {
        self.total_ms
    }

    /// Whether a tick source is armed
    pub fn is_ticking(&self) -> bool {
        self.ticker.is_some()
    }

    /// Id of the armed tick source, if any
    pub fn ticker_id(&self) -> Option<u64> {
        self.ticker.as_ref().map(Ticker::id)
    }

    /// Current display state
    pub fn snapshot(&self) -> DisplayState {
        DisplayState {
            phase: self.phase,
            target: self.target,
            breakdown: self.countdown.breakdown,
            remaining_ms: self.countdown.remaining_ms,
            progress: self.progress,
            show_error: self.show_error,
            show_celebration: self.show_celebration,
        }
    }

    /// Switch to a new target chosen at `now`.
    ///
    /// Cancels any armed tick source first. A target at or before `now`
    /// leaves the machine `Invalid` with nothing armed.
    pub fn set_target(&mut self, target: DateTime<Utc>, now: DateTime<Utc>) -> DisplayState {
        self.cancel_ticker();
        self.show_celebration = false;
        self.phase = Phase::Validating;
        self.target = Some(target);
        self.progress = 0.0;

        let countdown = compute(target, now);
        if countdown.is_expired() {
            info!("Target {} is not in the future", target);
            self.phase = Phase::Invalid;
            self.total_ms = 0;
            self.countdown = Countdown {
                breakdown: Breakdown::ZERO,
                remaining_ms: countdown.remaining_ms,
            };
            self.show_error = true;
            return self.snapshot();
        }

        self.phase = Phase::Running;
        self.total_ms = countdown.remaining_ms;
        self.countdown = countdown;
        self.show_error = false;

        self.armed_count += 1;
        self.ticker = Some(Ticker::arm(self.armed_count, self.tick_period));
        info!(
            "Counting down to {} ({} ms, ticker #{})",
            target, self.total_ms, self.armed_count
        );

        self.snapshot()
    }

    /// Refresh against `now`. Ignored unless running.
    pub fn tick(&mut self, now: DateTime<Utc>) -> DisplayState {
        let target = match (self.phase, self.target) {
            (Phase::Running, Some(target)) => target,
            _ => {
                debug!("Tick ignored in phase {:?}", self.phase);
                return self.snapshot();
            }
        };

        let countdown = compute(target, now);
        if countdown.is_expired() {
            self.cancel_ticker();
            self.phase = Phase::Completed;
            self.countdown = Countdown {
                breakdown: Breakdown::ZERO,
                remaining_ms: countdown.remaining_ms,
            };
            self.progress = 100.0;
            self.show_celebration = true;
            info!("Countdown to {} complete", target);
            return self.snapshot();
        }

        self.countdown = countdown;
        // Never move backwards, even if the wall clock does
        let progress = progress_percent(self.total_ms, countdown.remaining_ms);
        self.progress = self.progress.max(progress);
        debug!(
            "Tick: {} ms remaining, {:.2}% done",
            countdown.remaining_ms, self.progress
        );

        self.snapshot()
    }

    /// Wait for the armed ticker. Never resolves when nothing is armed.
    pub async fn next_tick(&mut self) {
        match self.ticker.as_mut() {
            Some(ticker) => ticker.tick().await,
            None => std::future::pending().await,
        }
    }

    fn cancel_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            debug!("Cancelled ticker #{}", ticker.id());
        }
    }
}

impl Default for RefreshMachine {
    fn default() -> Self {
        Self::new(TICK_PERIOD)
    }
}
