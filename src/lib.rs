//! Countdown Clock - count down to a date and time in the terminal
//!
//! This library provides the countdown arithmetic, the refresh state machine
//! that ticks once per second until the target is reached, and renderers for
//! the resulting counters and progress bar.

pub mod config;
pub mod countdown;
pub mod error;
pub mod render;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use countdown::{compute, Breakdown, Countdown};
pub use error::CountdownError;
pub use state::{AppState, DisplayState, Phase, RefreshMachine};
pub use utils::signals::shutdown_signal;
