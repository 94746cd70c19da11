//! Birthdate domain value.
//!
//! # Responsibility
//! - Hold the single calendar date age is computed from.
//! - Normalize date-time inputs down to their calendar day.
//! - Resolve "local midnight" for a concrete time zone.
//!
//! # Invariants
//! - Time-of-day is never stored; every conversion drops it.
//! - Serialized form is ISO `YYYY-MM-DD`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

const DEFAULT_YEAR: i32 = 2000;
const DISPLAY_FORMAT: &str = "%B %-d, %Y";

/// Calendar date of birth with implicit local midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Birthdate(NaiveDate);

/// Input could not be read as a `YYYY-MM-DD` calendar date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BirthdateParseError {
    input: String,
}

impl Display for BirthdateParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid birthdate `{}`; expected a calendar date as YYYY-MM-DD",
            self.input
        )
    }
}

impl Error for BirthdateParseError {}

impl Birthdate {
    /// Fallback used for computations while no birthdate is stored.
    pub const DEFAULT: Self = match NaiveDate::from_ymd_opt(DEFAULT_YEAR, 1, 1) {
        Some(date) => Self(date),
        None => panic!("default birthdate must be a valid date"),
    };

    /// Builds a birthdate from calendar components.
    ///
    /// Returns `None` for impossible dates such as February 30.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Parses an ISO `YYYY-MM-DD` date, ignoring surrounding whitespace.
    pub fn parse(input: &str) -> Result<Self, BirthdateParseError> {
        NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
            .map(Self)
            .map_err(|_| BirthdateParseError {
                input: input.trim().to_string(),
            })
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Midnight of this date as a wall-clock value.
    pub fn midnight(&self) -> NaiveDateTime {
        self.0.and_time(NaiveTime::MIN)
    }

    /// Resolves midnight of this date in `tz`.
    ///
    /// Ambiguous midnights resolve to the earlier instant. A midnight skipped
    /// by a DST transition falls back to the same wall clock read as UTC.
    pub fn midnight_in<Tz: TimeZone>(&self, tz: &Tz) -> DateTime<Tz> {
        let naive = self.midnight();
        tz.from_local_datetime(&naive)
            .earliest()
            .unwrap_or_else(|| tz.from_utc_datetime(&naive))
    }

    /// Returns true when this date lies strictly after `today`.
    pub fn is_after(&self, today: NaiveDate) -> bool {
        self.0 > today
    }

    /// Long display form, e.g. `January 1, 2000`.
    pub fn display_long(&self) -> String {
        self.0.format(DISPLAY_FORMAT).to_string()
    }
}

impl Default for Birthdate {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl Display for Birthdate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl From<NaiveDate> for Birthdate {
    fn from(value: NaiveDate) -> Self {
        Self(value)
    }
}

impl From<NaiveDateTime> for Birthdate {
    fn from(value: NaiveDateTime) -> Self {
        Self(value.date())
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Birthdate {
    /// Keeps the calendar day as seen in the value's own time zone.
    fn from(value: DateTime<Tz>) -> Self {
        Self(value.date_naive())
    }
}

#[cfg(test)]
mod tests {
    use super::Birthdate;
    use chrono::{FixedOffset, NaiveDate, TimeZone, Timelike, Utc};

    #[test]
    fn default_is_first_of_january_2000() {
        let default = Birthdate::default();
        assert_eq!(default, Birthdate::from_ymd(2000, 1, 1).unwrap());
        assert_eq!(default.to_string(), "2000-01-01");
    }

    #[test]
    fn parse_accepts_iso_dates_and_rejects_garbage() {
        assert_eq!(
            Birthdate::parse(" 1990-07-15 ").unwrap(),
            Birthdate::from_ymd(1990, 7, 15).unwrap()
        );

        let err = Birthdate::parse("1990-02-30").unwrap_err();
        assert!(err.to_string().contains("1990-02-30"));
        assert!(Birthdate::parse("15/07/1990").is_err());
    }

    #[test]
    fn datetime_conversion_drops_time_of_day() {
        let evening = NaiveDate::from_ymd_opt(1985, 3, 9)
            .unwrap()
            .and_hms_opt(23, 59, 58)
            .unwrap();
        assert_eq!(
            Birthdate::from(evening),
            Birthdate::from_ymd(1985, 3, 9).unwrap()
        );
    }

    #[test]
    fn zoned_conversion_uses_the_zones_calendar_day() {
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        let instant = Utc.with_ymd_and_hms(2020, 5, 31, 20, 0, 0).unwrap();

        assert_eq!(
            Birthdate::from(instant.with_timezone(&tokyo)),
            Birthdate::from_ymd(2020, 6, 1).unwrap()
        );
        assert_eq!(
            Birthdate::from(instant),
            Birthdate::from_ymd(2020, 5, 31).unwrap()
        );
    }

    #[test]
    fn midnight_in_zone_is_local_midnight() {
        let offset = FixedOffset::west_opt(5 * 3600).unwrap();
        let midnight = Birthdate::from_ymd(2000, 1, 1).unwrap().midnight_in(&offset);

        assert_eq!(midnight.hour(), 0);
        assert_eq!(
            midnight.with_timezone(&Utc),
            Utc.with_ymd_and_hms(2000, 1, 1, 5, 0, 0).unwrap()
        );
    }

    #[test]
    fn display_long_spells_out_the_month() {
        let date = Birthdate::from_ymd(1999, 12, 5).unwrap();
        assert_eq!(date.display_long(), "December 5, 1999");
    }

    #[test]
    fn is_after_compares_calendar_days() {
        let date = Birthdate::from_ymd(2024, 2, 29).unwrap();
        let same_day = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert!(!date.is_after(same_day));
        assert!(date.is_after(same_day.pred_opt().unwrap()));
    }
}
