//! Date and time fields that together pick the countdown target

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike, Utc};

use crate::error::{CountdownError, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S";
const SHORT_TIME_FORMAT: &str = "%H:%M";

/// Time zone the date and time fields are read in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Zone {
    #[default]
    Local,
    Utc,
}

impl Zone {
    /// Resolve a wall-clock date-time in this zone to an instant.
    ///
    /// A repeated local time (DST fall-back) resolves to its earlier instant.
    /// A skipped local time (DST spring-forward) is rejected.
    pub fn resolve(&self, naive: NaiveDateTime) -> Result<DateTime<Utc>> {
        let resolved = match self {
            Zone::Local => Local
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc)),
            Zone::Utc => Some(Utc.from_utc_datetime(&naive)),
        };
        resolved.ok_or_else(|| CountdownError::NonexistentLocalTime(naive.to_string()))
    }

    /// Wall-clock date-time of `instant` in this zone
    pub fn naive_of(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        match self {
            Zone::Local => instant.with_timezone(&Local).naive_local(),
            Zone::Utc => instant.naive_utc(),
        }
    }
}

/// Parse an ISO `YYYY-MM-DD` date
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| CountdownError::InvalidDate(raw.to_string()))
}

/// Parse a `HH:MM:SS` or `HH:MM` time of day
pub fn parse_time(raw: &str) -> Result<NaiveTime> {
    let raw_trimmed = raw.trim();
    NaiveTime::parse_from_str(raw_trimmed, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(raw_trimmed, SHORT_TIME_FORMAT))
        .map_err(|_| CountdownError::InvalidTime(raw.to_string()))
}

/// The two independently edited input fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetInput {
    date: NaiveDate,
    time: NaiveTime,
}

impl TargetInput {
    pub fn new(date: NaiveDate, time: NaiveTime) -> Self {
        Self { date, time }
    }

    /// Fields showing `instant` in `zone`, to whole seconds
    pub fn showing(instant: DateTime<Utc>, zone: Zone) -> Self {
        let naive = zone.naive_of(instant);
        let time = naive.time().with_nanosecond(0).unwrap_or(naive.time());
        Self::new(naive.date(), time)
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn time(&self) -> NaiveTime {
        self.time
    }

    /// Replace the date field. The field is left unchanged on a parse error.
    pub fn set_date(&mut self, raw: &str) -> Result<()> {
        self.date = parse_date(raw)?;
        Ok(())
    }

    /// Replace the time field. The field is left unchanged on a parse error.
    pub fn set_time(&mut self, raw: &str) -> Result<()> {
        self.time = parse_time(raw)?;
        Ok(())
    }

    /// Replace both fields at once; neither changes unless both parse
    pub fn set_date_time(&mut self, raw_date: &str, raw_time: &str) -> Result<()> {
        let date = parse_date(raw_date)?;
        let time = parse_time(raw_time)?;
        self.date = date;
        self.time = time;
        Ok(())
    }

    pub fn date_string(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }

    pub fn time_string(&self) -> String {
        self.time.format(TIME_FORMAT).to_string()
    }

    /// Both fields joined as `YYYY-MM-DDTHH:MM:SS`
    pub fn combined(&self) -> String {
        format!("{}T{}", self.date_string(), self.time_string())
    }

    pub fn naive(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }

    /// The instant these fields name in `zone`
    pub fn resolve(&self, zone: Zone) -> Result<DateTime<Utc>> {
        zone.resolve(self.naive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_seconds_optional_times() {
        assert_eq!(parse_time("23:59:58").unwrap(), NaiveTime::from_hms_opt(23, 59, 58).unwrap());
        assert_eq!(parse_time("07:05").unwrap(), NaiveTime::from_hms_opt(7, 5, 0).unwrap());
        assert!(matches!(parse_time("25:00"), Err(CountdownError::InvalidTime(_))));
        assert!(matches!(parse_time("noon"), Err(CountdownError::InvalidTime(_))));
    }

    #[test]
    fn rejects_malformed_dates() {
        assert!(parse_date("2026-02-28").is_ok());
        assert!(matches!(parse_date("2026-02-30"), Err(CountdownError::InvalidDate(_))));
        assert!(matches!(parse_date("31/12/2026"), Err(CountdownError::InvalidDate(_))));
    }

    #[test]
    fn failed_edit_keeps_previous_fields() {
        let mut input = TargetInput::new(
            NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
            NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
        );
        let before = input;

        assert!(input.set_date("not a date").is_err());
        assert!(input.set_date_time("2027-01-01", "99:00").is_err());
        assert_eq!(input, before);

        input.set_time("08:30:15").unwrap();
        assert_eq!(input.combined(), "2026-12-31T08:30:15");
    }

    #[test]
    fn resolves_in_utc() {
        let mut input = TargetInput::new(
            NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
            NaiveTime::from_hms_opt(0, 0, 0).unwrap(),
        );
        input.set_date("2030-06-15").unwrap();
        let target = input.resolve(Zone::Utc).unwrap();
        assert_eq!(target.to_rfc3339(), "2030-06-15T00:00:00+00:00");
    }

    #[test]
    fn showing_drops_subseconds() {
        let instant = Utc.timestamp_opt(1_700_000_000, 750_000_000).unwrap();
        let input = TargetInput::showing(instant, Zone::Utc);
        assert_eq!(input.combined(), "2023-11-14T22:13:20");
    }
}
