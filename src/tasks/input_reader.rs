//! Line commands that edit the date and time fields

use std::{str::FromStr, sync::Arc};

use chrono::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info, warn};

use crate::{
    countdown::Clock,
    error::{CountdownError, Result},
    state::{AppState, TargetChange},
};

/// One line of input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `date YYYY-MM-DD`
    Date(String),
    /// `time HH:MM[:SS]`
    Time(String),
    /// `at YYYY-MM-DD HH:MM[:SS]`
    At(String, String),
    /// `in 90s`, `in 5m`, `in 2h`, `in 1d`
    In(Duration),
    /// `show`
    Show,
    /// `quit`
    Quit,
}

impl FromStr for Command {
    type Err = CountdownError;

    fn from_str(line: &str) -> Result<Self> {
        let mut words = line.split_whitespace();
        let name = words.next().unwrap_or_default().to_lowercase();
        let args: Vec<&str> = words.collect();

        match (name.as_str(), args.as_slice()) {
            ("date", [date]) => Ok(Command::Date(date.to_string())),
            ("time", [time]) => Ok(Command::Time(time.to_string())),
            ("at", [date, time]) => Ok(Command::At(date.to_string(), time.to_string())),
            ("at", [date_time]) => match date_time.split_once('T') {
                Some((date, time)) => Ok(Command::At(date.to_string(), time.to_string())),
                None => Err(CountdownError::UnknownCommand(line.to_string())),
            },
            ("in", [offset]) => parse_offset(offset).map(Command::In),
            ("show", []) => Ok(Command::Show),
            ("quit" | "exit" | "q", []) => Ok(Command::Quit),
            _ => Err(CountdownError::UnknownCommand(line.to_string())),
        }
    }
}

/// Parse `<number><s|m|h|d>` into a duration
pub fn parse_offset(raw: &str) -> Result<Duration> {
    let unknown = || CountdownError::UnknownCommand(format!("in {}", raw));
    let split = raw.len().checked_sub(1).ok_or_else(unknown)?;
    if !raw.is_char_boundary(split) {
        return Err(unknown());
    }
    let (amount, unit) = raw.split_at(split);
    let amount: i64 = amount.parse().map_err(|_| unknown())?;

    let offset = match unit {
        "s" => Duration::try_seconds(amount),
        "m" => Duration::try_minutes(amount),
        "h" => Duration::try_hours(amount),
        "d" => Duration::try_days(amount),
        _ => return Err(unknown()),
    };
    offset.ok_or_else(|| CountdownError::OffsetOutOfRange(raw.to_string()))
}

/// What applying a command did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Edited(TargetChange),
    Redrawn,
    Quit,
}

/// Apply one command to the session
pub fn apply_command(state: &AppState, command: Command, clock: &dyn Clock) -> Result<CommandOutcome> {
    match command {
        Command::Date(date) => state.set_date(&date).map(CommandOutcome::Edited),
        Command::Time(time) => state.set_time(&time).map(CommandOutcome::Edited),
        Command::At(date, time) => state.set_date_time(&date, &time).map(CommandOutcome::Edited),
        Command::In(offset) => state.set_offset(clock.now(), offset).map(CommandOutcome::Edited),
        Command::Show => {
            state.republish();
            Ok(CommandOutcome::Redrawn)
        }
        Command::Quit => Ok(CommandOutcome::Quit),
    }
}

/// How the input stream ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    /// A `quit` command was read
    Quit,
    /// The stream ended or could not be read
    EndOfInput,
}

/// Background task reading commands line by line until `quit` or end of input.
///
/// Bad lines are logged and skipped; they never change the fields.
pub async fn input_reader_task<R>(state: Arc<AppState>, reader: R, clock: Arc<dyn Clock>) -> InputOutcome
where
    R: AsyncBufRead + Unpin,
{
    info!("Reading commands from input");
    let mut lines = reader.lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => {
                debug!("Input closed");
                return InputOutcome::EndOfInput;
            }
            Err(e) => {
                warn!("Failed to read input: {}", e);
                return InputOutcome::EndOfInput;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        let outcome = line
            .parse::<Command>()
            .and_then(|command| apply_command(&state, command, clock.as_ref()));

        match outcome {
            Ok(CommandOutcome::Quit) => {
                info!("Quit requested");
                return InputOutcome::Quit;
            }
            Ok(outcome) => debug!("Applied '{}': {:?}", line.trim(), outcome),
            Err(e) => warn!("Ignored '{}': {}", line.trim(), e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::countdown::{ManualClock, TargetInput, Zone};
    use chrono::{TimeZone, Utc};

    #[test]
    fn parses_commands() {
        assert_eq!("date 2030-01-01".parse::<Command>().unwrap(), Command::Date("2030-01-01".into()));
        assert_eq!("TIME 12:00".parse::<Command>().unwrap(), Command::Time("12:00".into()));
        assert_eq!(
            "at 2030-01-01 12:00:30".parse::<Command>().unwrap(),
            Command::At("2030-01-01".into(), "12:00:30".into())
        );
        assert_eq!(
            "at 2030-01-01T12:00:30".parse::<Command>().unwrap(),
            Command::At("2030-01-01".into(), "12:00:30".into())
        );
        assert_eq!("in 90s".parse::<Command>().unwrap(), Command::In(Duration::seconds(90)));
        assert_eq!("show".parse::<Command>().unwrap(), Command::Show);
        assert_eq!("q".parse::<Command>().unwrap(), Command::Quit);
    }

    #[test]
    fn rejects_unknown_commands() {
        assert!(matches!("launch".parse::<Command>(), Err(CountdownError::UnknownCommand(_))));
        assert!(matches!("date".parse::<Command>(), Err(CountdownError::UnknownCommand(_))));
        assert!(matches!("in 5w".parse::<Command>(), Err(CountdownError::UnknownCommand(_))));
        assert!(matches!("in".parse::<Command>(), Err(CountdownError::UnknownCommand(_))));
    }

    #[test]
    fn offsets_by_unit() {
        assert_eq!(parse_offset("2h").unwrap(), Duration::hours(2));
        assert_eq!(parse_offset("1d").unwrap(), Duration::days(1));
        assert!(parse_offset("m").is_err());
        assert!(parse_offset("").is_err());
        assert!(parse_offset("5é").is_err());
    }

    #[test]
    fn huge_offsets_are_rejected() {
        assert!(matches!(
            "in 999999999999999999d".parse::<Command>(),
            Err(CountdownError::OffsetOutOfRange(_))
        ));
        assert!(matches!(parse_offset("9223372036854775807s"), Err(CountdownError::OffsetOutOfRange(_))));
    }

    #[test]
    fn offset_past_the_calendar_leaves_fields_alone() {
        let now = Utc.timestamp_opt(1_800_000_000, 0).unwrap();
        let state = AppState::new(TargetInput::showing(now, Zone::Utc), Zone::Utc);
        let mut rx = state.subscribe_targets();
        let clock = ManualClock::new(now);
        let before = state.get_input().unwrap();

        let outcome = "in 100000000d"
            .parse::<Command>()
            .and_then(|command| apply_command(&state, command, &clock));

        assert!(matches!(outcome, Err(CountdownError::OffsetOutOfRange(_))));
        assert_eq!(state.get_input().unwrap(), before);
        assert!(rx.try_recv().is_err());
    }
}
