//! State management module
//!
//! This module contains the refresh state machine, its tick source and the
//! session state shared between tasks.

pub mod app_state;
pub mod display_state;
pub mod refresh_machine;
pub mod ticker;

// Re-export main types
pub use app_state::{AppState, TargetChange};
pub use display_state::{DisplayState, Phase};
pub use refresh_machine::RefreshMachine;
pub use ticker::{Ticker, TICK_PERIOD};
