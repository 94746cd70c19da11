//! Core logic for the age counter.
//!
//! Holds the persisted birthdate and turns it into the strings the menu-bar
//! presentation polls. Nothing in this crate draws, schedules or blocks.

pub mod db;
pub mod logging;
pub mod model;
pub mod notify;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LogLevel};
pub use model::age::AgeBreakdown;
pub use model::birthdate::{Birthdate, BirthdateParseError};
pub use notify::{ChangeChannel, Subscription};
pub use repo::settings_repo::{RepoError, RepoResult, SettingsRepository, SqliteSettingsRepository};
pub use service::age_calculator::{AgeCalculator, DAYS_PER_YEAR, SECONDS_PER_YEAR};
pub use service::birthday_store::{BirthdayChanged, BirthdayStore};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
