//! Age calculator: birthdate to display strings.
//!
//! # Responsibility
//! - Cache the store's birthdate and refresh it on change notifications.
//! - Compute continuous age in mean Gregorian years.
//! - Render the age, breakdown and birthday strings.
//!
//! # Invariants
//! - The cache is updated synchronously inside the store's `set`.
//! - Dropping the calculator unregisters its subscription.
//! - Formatting never touches storage and never fails.

use crate::model::age::AgeBreakdown;
use crate::model::birthdate::Birthdate;
use crate::notify::Subscription;
use crate::repo::settings_repo::SettingsRepository;
use crate::service::birthday_store::{BirthdayChanged, BirthdayStore};
use chrono::{DateTime, Local, TimeZone, Utc};
use log::debug;
use std::cell::Cell;
use std::rc::Rc;

/// Mean Gregorian year length in days.
pub const DAYS_PER_YEAR: f64 = 365.2425;
pub const SECONDS_PER_YEAR: f64 = DAYS_PER_YEAR * 24.0 * 60.0 * 60.0;

const UNSET_AGE: &str = "00.000000";
const UNSET_BREAKDOWN: &str = "0y 0m 0d 0h 0m 0s";
const UNSET_BIRTHDAY: &str = "Birthday not set";

/// Renders a stored birthdate relative to a caller-supplied "now".
///
/// `Tz` decides where "local midnight" falls and in which zone calendar
/// units are counted.
pub struct AgeCalculator<Tz: TimeZone = Local> {
    birthdate: Rc<Cell<Option<Birthdate>>>,
    tz: Tz,
    _subscription: Subscription,
}

impl AgeCalculator<Local> {
    /// Builds a calculator for the system's local time zone.
    pub fn new<R: SettingsRepository>(store: &BirthdayStore<R>) -> Self {
        Self::with_timezone(store, Local)
    }
}

impl<Tz: TimeZone> AgeCalculator<Tz> {
    pub fn with_timezone<R: SettingsRepository>(store: &BirthdayStore<R>, tz: Tz) -> Self {
        let birthdate = Rc::new(Cell::new(store.get()));

        let cache = Rc::clone(&birthdate);
        let subscription = store.subscribe(move |event: &BirthdayChanged| {
            cache.set(Some(event.birthdate));
            debug!("event=birthday_refresh module=calculator status=ok");
        });

        Self {
            birthdate,
            tz,
            _subscription: subscription,
        }
    }

    pub fn birthdate(&self) -> Option<Birthdate> {
        self.birthdate.get()
    }

    pub fn has_been_set(&self) -> bool {
        self.birthdate().is_some()
    }

    /// Years elapsed since birthdate midnight; negative before it.
    ///
    /// Uses the default birthdate when none is stored.
    pub fn compute_age_in_years(&self, now: DateTime<Utc>) -> f64 {
        let born = self.birthdate_or_default().midnight_in(&self.tz);
        let elapsed = now.signed_duration_since(born);
        elapsed.num_milliseconds() as f64 / 1000.0 / SECONDS_PER_YEAR
    }

    /// Age with six decimals, or `00.000000` while unset.
    pub fn format_age(&self, now: DateTime<Utc>) -> String {
        if !self.has_been_set() {
            return UNSET_AGE.to_string();
        }
        format!("{:.6}", self.compute_age_in_years(now))
    }

    /// Calendar breakdown between birthdate midnight and `now`, if set.
    pub fn breakdown(&self, now: DateTime<Utc>) -> Option<AgeBreakdown> {
        let birthdate = self.birthdate()?;
        let local_now = now.with_timezone(&self.tz).naive_local();
        Some(AgeBreakdown::between(birthdate.midnight(), local_now))
    }

    /// `{y}y {m}m {d}d {h}h {mi}m {s}s`, or all zeros while unset.
    pub fn format_breakdown(&self, now: DateTime<Utc>) -> String {
        self.breakdown(now)
            .map_or_else(|| UNSET_BREAKDOWN.to_string(), |value| value.to_string())
    }

    /// `Born: January 1, 2000 at 00:00`, or `Birthday not set`.
    pub fn format_birthday(&self) -> String {
        match self.birthdate() {
            Some(birthdate) => format!("Born: {} at 00:00", birthdate.display_long()),
            None => UNSET_BIRTHDAY.to_string(),
        }
    }

    fn birthdate_or_default(&self) -> Birthdate {
        self.birthdate().unwrap_or_default()
    }
}
