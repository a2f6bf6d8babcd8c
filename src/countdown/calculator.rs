//! Pure countdown arithmetic: remaining time, breakdown and progress

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const MILLIS_PER_SECOND: i64 = 1_000;
const SECONDS_PER_DAY: u64 = 86_400;
const SECONDS_PER_HOUR: u64 = 3_600;
const SECONDS_PER_MINUTE: u64 = 60;

/// Units shown on the counters, largest first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Day,
    Hour,
    Minute,
    Second,
}

impl Unit {
    pub const ALL: [Unit; 4] = [Unit::Day, Unit::Hour, Unit::Minute, Unit::Second];

    /// Label for `value` of this unit: singular only when the value is exactly 1
    pub fn label(self, value: u64) -> &'static str {
        match (self, value == 1) {
            (Unit::Day, true) => "day",
            (Unit::Day, false) => "days",
            (Unit::Hour, true) => "hour",
            (Unit::Hour, false) => "hours",
            (Unit::Minute, true) => "minute",
            (Unit::Minute, false) => "minutes",
            (Unit::Second, true) => "second",
            (Unit::Second, false) => "seconds",
        }
    }
}

/// Days, hours, minutes and seconds of a remaining duration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakdown {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl Breakdown {
    pub const ZERO: Breakdown = Breakdown {
        days: 0,
        hours: 0,
        minutes: 0,
        seconds: 0,
    };

    /// Split the whole seconds of `remaining_ms` into days, hours, minutes and seconds.
    /// Zero or negative durations give an all-zero breakdown.
    pub fn from_millis(remaining_ms: i64) -> Self {
        if remaining_ms <= 0 {
            return Self::ZERO;
        }

        let mut remaining = (remaining_ms / MILLIS_PER_SECOND) as u64;

        let days = remaining / SECONDS_PER_DAY;
        remaining -= days * SECONDS_PER_DAY;

        let hours = remaining / SECONDS_PER_HOUR;
        remaining -= hours * SECONDS_PER_HOUR;

        let minutes = remaining / SECONDS_PER_MINUTE;
        remaining -= minutes * SECONDS_PER_MINUTE;

        Self {
            days,
            hours,
            minutes,
            seconds: remaining,
        }
    }

    /// Total whole seconds represented by this breakdown
    pub fn total_seconds(&self) -> u64 {
        self.days * SECONDS_PER_DAY
            + self.hours * SECONDS_PER_HOUR
            + self.minutes * SECONDS_PER_MINUTE
            + self.seconds
    }

    pub fn value(&self, unit: Unit) -> u64 {
        match unit {
            Unit::Day => self.days,
            Unit::Hour => self.hours,
            Unit::Minute => self.minutes,
            Unit::Second => self.seconds,
        }
    }

    /// Value and label pairs in display order
    pub fn labeled(&self) -> [(u64, &'static str); 4] {
        Unit::ALL.map(|unit| {
            let value = self.value(unit);
            (value, unit.label(value))
        })
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

/// Result of comparing a target instant against the current instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    pub breakdown: Breakdown,
    /// Target minus now, negative once the target has passed
    pub remaining_ms: i64,
}

impl Countdown {
    /// Whether the target has been reached
    pub fn is_expired(&self) -> bool {
        self.remaining_ms <= 0
    }
}

/// Compute the remaining time between `now` and `target`
pub fn compute(target: DateTime<Utc>, now: DateTime<Utc>) -> Countdown {
    let remaining_ms = (target - now).num_milliseconds();
    Countdown {
        breakdown: Breakdown::from_millis(remaining_ms),
        remaining_ms,
    }
}

/// Percentage of `total_ms` already elapsed when `remaining_ms` is left, in `[0, 100]`
pub fn progress_percent(total_ms: i64, remaining_ms: i64) -> f64 {
    if total_ms <= 0 {
        return 100.0;
    }
    let elapsed = (total_ms - remaining_ms) as f64;
    (elapsed / total_ms as f64 * 100.0).clamp(0.0, 100.0)
}
