//! Configuration and CLI argument handling

use std::sync::Arc;

use clap::{Parser, ValueEnum};
use crossterm::tty::IsTty;

use crate::{
    countdown::{Clock, MonotonicClock, SystemClock, Zone},
    error::Result,
    render::OutputFormat,
    state::{AppState, TargetChange},
};

/// Where "now" comes from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ClockSource {
    /// The system wall clock, sampled on every tick
    #[default]
    System,
    /// Wall clock at start-up, advanced monotonically
    Monotonic,
}

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "countdown-clock")]
#[command(about = "Count down to a date and time in the terminal")]
#[command(version)]
pub struct Config {
    /// Target date (YYYY-MM-DD); defaults to today
    #[arg(short, long)]
    pub date: Option<String>,

    /// Target time of day (HH:MM or HH:MM:SS); defaults to now
    #[arg(short, long)]
    pub time: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Progress bar width in cells
    #[arg(long, default_value = "40")]
    pub bar_width: usize,

    /// Read the date and time in UTC instead of local time
    #[arg(long)]
    pub utc: bool,

    /// Clock used to measure the remaining time
    #[arg(long, value_enum, default_value_t = ClockSource::System)]
    pub clock: ClockSource,

    /// Exit once the countdown completes
    #[arg(long)]
    pub exit_on_complete: bool,

    /// Don't read commands from stdin
    #[arg(long)]
    pub no_input: bool,

    /// Draw each update below the previous one instead of in place.
    /// In-place drawing is only used when nothing else writes to the terminal.
    #[arg(long)]
    pub no_redraw: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    pub fn zone(&self) -> Zone {
        if self.utc { Zone::Utc } else { Zone::Local }
    }

    pub fn clock(&self) -> Arc<dyn Clock> {
        match self.clock {
            ClockSource::System => Arc::new(SystemClock),
            ClockSource::Monotonic => Arc::new(MonotonicClock::new()),
        }
    }

    /// Whether the text renderer may redraw its frame in place
    pub fn redraw(&self) -> bool {
        redraw_allowed(
            self,
            std::io::stdout().is_tty(),
            std::io::stdin().is_tty(),
            std::io::stderr().is_tty(),
        )
    }

    /// Apply `--date` and `--time` as edits of the fields.
    /// Both together count as one edit.
    pub fn apply_startup_edits(&self, state: &AppState) -> Result<Option<TargetChange>> {
        let change = match (&self.date, &self.time) {
            (Some(date), Some(time)) => Some(state.set_date_time(date, time)?),
            (Some(date), None) => Some(state.set_date(date)?),
            (None, Some(time)) => Some(state.set_time(time)?),
            (None, None) => None,
        };
        Ok(change)
    }
}

/// Redrawing moves the cursor up over the previous frame, so it needs stdout
/// on a terminal that nothing else writes to: no echoed commands typed on
/// stdin and no log lines on stderr.
pub fn redraw_allowed(config: &Config, stdout_tty: bool, stdin_tty: bool, stderr_tty: bool) -> bool {
    let echoes_input = !config.no_input && stdin_tty;
    !config.no_redraw && stdout_tty && !echoes_input && !stderr_tty
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::countdown::TargetInput;
    use chrono::{TimeZone, Utc};

    fn config(args: &[&str]) -> Config {
        Config::try_parse_from(std::iter::once("countdown-clock").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults() {
        let config = config(&[]);
        assert_eq!(config.format, OutputFormat::Text);
        assert_eq!(config.bar_width, 40);
        assert_eq!(config.zone(), Zone::Local);
        assert_eq!(config.clock, ClockSource::System);
        assert_eq!(config.log_level(), "info");
        assert!(config.date.is_none() && config.time.is_none());
    }

    #[test]
    fn redraw_needs_a_quiet_terminal() {
        let interactive = config(&[]);
        // Piped output
        assert!(!redraw_allowed(&interactive, false, false, false));
        // Typed commands echo between frames
        assert!(!redraw_allowed(&interactive, true, true, false));
        // Logs share the terminal
        assert!(!redraw_allowed(&interactive, true, false, true));
        assert!(redraw_allowed(&interactive, true, false, false));

        let no_input = config(&["--no-input"]);
        assert!(redraw_allowed(&no_input, true, true, false));

        let disabled = config(&["--no-redraw", "--no-input"]);
        assert!(!redraw_allowed(&disabled, true, true, false));
    }

    #[test]
    fn parses_flags() {
        let config = config(&[
            "-d", "2030-01-01", "-t", "09:30", "--format", "json", "--utc", "--clock", "monotonic", "-v",
        ]);
        assert_eq!(config.date.as_deref(), Some("2030-01-01"));
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.zone(), Zone::Utc);
        assert_eq!(config.clock, ClockSource::Monotonic);
        assert_eq!(config.log_level(), "debug");
    }

    #[test]
    fn startup_edits_combine_into_one_change() {
        let config = config(&["--date", "2030-01-01", "--time", "09:30", "--utc"]);
        let now = Utc.timestamp_opt(1_800_000_000, 0).unwrap();
        let state = AppState::new(TargetInput::showing(now, Zone::Utc), Zone::Utc);
        let mut rx = state.subscribe_targets();

        let change = config.apply_startup_edits(&state).unwrap().unwrap();
        assert_eq!(change.target.to_rfc3339(), "2030-01-01T09:30:00+00:00");
        assert_eq!(rx.try_recv().unwrap(), change);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn date_only_keeps_shown_time() {
        let config = config(&["--date", "2030-01-01", "--utc"]);
        let now = Utc.timestamp_opt(1_800_000_000, 0).unwrap();
        let state = AppState::new(TargetInput::showing(now, Zone::Utc), Zone::Utc);

        let change = config.apply_startup_edits(&state).unwrap().unwrap();
        assert_eq!(change.input.combined(), "2030-01-01T08:00:00");
    }
}
