//! Calendar-aware age breakdown.
//!
//! # Invariants
//! - Components are computed largest-first; each smaller unit is the
//!   remainder after the larger ones are added to the start.
//! - Month addition clamps to the last day of the target month.
//! - A reversed interval yields the negated forward breakdown.

use chrono::{Datelike, Months, NaiveDateTime};
use serde::Serialize;
use std::fmt::{Display, Formatter};

const SECONDS_PER_MINUTE: i64 = 60;
const SECONDS_PER_HOUR: i64 = 60 * SECONDS_PER_MINUTE;
const SECONDS_PER_DAY: i64 = 24 * SECONDS_PER_HOUR;

/// Elapsed time split into calendar units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AgeBreakdown {
    pub years: i64,
    pub months: i64,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl AgeBreakdown {
    /// Computes the calendar difference from `start` to `end` in wall-clock time.
    pub fn between(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        if end < start {
            return Self::between(end, start).negated();
        }

        let years = whole_months_until(start, end, 12) / 12;
        let after_years = add_months(start, years * 12);
        let months = whole_months_until(after_years, end, 1);
        let anchor = add_months(after_years, months);

        let rest = (end - anchor).num_seconds();
        let days = rest / SECONDS_PER_DAY;
        let rest = rest % SECONDS_PER_DAY;

        Self {
            years,
            months,
            days,
            hours: rest / SECONDS_PER_HOUR,
            minutes: rest % SECONDS_PER_HOUR / SECONDS_PER_MINUTE,
            seconds: rest % SECONDS_PER_MINUTE,
        }
    }

    fn negated(self) -> Self {
        Self {
            years: -self.years,
            months: -self.months,
            days: -self.days,
            hours: -self.hours,
            minutes: -self.minutes,
            seconds: -self.seconds,
        }
    }
}

impl Display for AgeBreakdown {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}y {}m {}d {}h {}m {}s",
            self.years, self.months, self.days, self.hours, self.minutes, self.seconds
        )
    }
}

/// Largest multiple of `step` months that can be added to `start` without
/// passing `end`. Requires `start <= end`.
fn whole_months_until(start: NaiveDateTime, end: NaiveDateTime, step: i64) -> i64 {
    let span = i64::from(end.year() - start.year()) * 12 + i64::from(end.month())
        - i64::from(start.month());
    let mut count = span - span % step;
    while count > 0 && add_months(start, count) > end {
        count -= step;
    }
    count.max(0)
}

fn add_months(start: NaiveDateTime, months: i64) -> NaiveDateTime {
    u32::try_from(months)
        .ok()
        .and_then(|months| start.checked_add_months(Months::new(months)))
        .unwrap_or(NaiveDateTime::MAX)
}

#[cfg(test)]
mod tests {
    use super::AgeBreakdown;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(year: i32, month: u32, day: u32, h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn one_year_one_month_one_day() {
        let breakdown = AgeBreakdown::between(at(2000, 1, 1, 0, 0, 0), at(2001, 2, 2, 0, 0, 0));
        assert_eq!(breakdown.to_string(), "1y 1m 1d 0h 0m 0s");
    }

    #[test]
    fn time_of_day_lands_in_hours_minutes_seconds() {
        let breakdown =
            AgeBreakdown::between(at(1990, 6, 15, 0, 0, 0), at(2024, 6, 14, 13, 7, 42));
        assert_eq!(
            breakdown,
            AgeBreakdown {
                years: 33,
                months: 11,
                days: 30,
                hours: 13,
                minutes: 7,
                seconds: 42,
            }
        );
    }

    #[test]
    fn thirteen_months_carry_into_a_year() {
        let breakdown = AgeBreakdown::between(at(2010, 3, 1, 0, 0, 0), at(2011, 4, 1, 0, 0, 0));
        assert_eq!(breakdown.to_string(), "1y 1m 0d 0h 0m 0s");
    }

    #[test]
    fn month_end_start_clamps_when_adding_months() {
        // Jan 31 + 1 month clamps to Feb 29 in a leap year.
        let breakdown = AgeBreakdown::between(at(2024, 1, 31, 0, 0, 0), at(2024, 3, 1, 0, 0, 0));
        assert_eq!(breakdown.to_string(), "0y 1m 1d 0h 0m 0s");
    }

    #[test]
    fn leap_day_birthdays_count_years_on_february_28() {
        let breakdown = AgeBreakdown::between(at(2000, 2, 29, 0, 0, 0), at(2001, 2, 28, 0, 0, 0));
        assert_eq!(breakdown.years, 1);
        assert_eq!(breakdown.months, 0);
        assert_eq!(breakdown.days, 0);
    }

    #[test]
    fn reversed_interval_is_negated() {
        let breakdown = AgeBreakdown::between(at(2001, 2, 2, 0, 0, 0), at(2000, 1, 1, 0, 0, 0));
        assert_eq!(breakdown.to_string(), "-1y -1m -1d 0h 0m 0s");
    }

    #[test]
    fn identical_instants_are_all_zero() {
        let instant = at(2020, 8, 8, 8, 8, 8);
        assert_eq!(
            AgeBreakdown::between(instant, instant),
            AgeBreakdown::default()
        );
    }
}
