//! Countdown module
//!
//! Pure time arithmetic, the input fields that pick a target, and clocks.

pub mod calculator;
pub mod clock;
pub mod target;

// Re-export main types
pub use calculator::{compute, progress_percent, Breakdown, Countdown, Unit};
pub use clock::{Clock, ManualClock, MonotonicClock, SystemClock};
pub use target::{parse_date, parse_time, TargetInput, Zone};
