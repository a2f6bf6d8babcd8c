//! Display state handed to the renderers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::countdown::Breakdown;

/// Phase of the refresh state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// No target chosen yet
    Idle,
    /// A new target is being checked against now
    Validating,
    /// Counting down, one refresh per tick
    Running,
    /// The target was reached during a run
    Completed,
    /// The target was not in the future when chosen
    Invalid,
}

impl Phase {
    /// Whether the phase only changes on a new target edit
    pub fn is_settled(&self) -> bool {
        matches!(self, Phase::Completed | Phase::Invalid)
    }
}

/// Everything a renderer needs to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayState {
    pub phase: Phase,
    /// The instant being counted down to
    pub target: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub breakdown: Breakdown,
    pub remaining_ms: i64,
    /// Elapsed share of the run in percent, 0 to 100
    pub progress: f64,
    /// Show the "pick a future date" notice
    pub show_error: bool,
    /// Play the celebration
    pub show_celebration: bool,
}

impl DisplayState {
    /// The state shown before any target is chosen
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            target: None,
            breakdown: Breakdown::ZERO,
            remaining_ms: 0,
            progress: 0.0,
            show_error: false,
            show_celebration: false,
        }
    }
}

impl Default for DisplayState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_breakdown_inline() {
        let state = DisplayState {
            breakdown: Breakdown { days: 2, hours: 3, minutes: 4, seconds: 5 },
            phase: Phase::Running,
            ..DisplayState::new()
        };
        let json = serde_json::to_value(&state).unwrap();

        assert_eq!(json["phase"], "running");
        assert_eq!(json["days"], 2);
        assert_eq!(json["seconds"], 5);
        assert_eq!(json["show_error"], false);
        assert!(json["target"].is_null());
    }
}
