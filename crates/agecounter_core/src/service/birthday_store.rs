//! Birthday store: the single source of truth for the birthdate.
//!
//! # Responsibility
//! - Persist the birthdate and the launch preferences through a
//!   `SettingsRepository`.
//! - Notify subscribers synchronously after every successful save.
//! - Expose the durable first-launch latch.
//!
//! # Invariants
//! - Stored birthdates never carry a time of day.
//! - A notification is published only after the write succeeded.
//! - Read failures degrade to "unset" and are logged, never raised.
//! - Log events carry metadata only; the birthdate itself is never logged.

use crate::model::birthdate::Birthdate;
use crate::notify::{ChangeChannel, Subscription};
use crate::repo::settings_repo::{RepoError, RepoResult, SettingsRepository};
use log::{debug, info, warn};
use serde_json::Value;

pub const BIRTHDAY_KEY: &str = "userBirthday";
pub const HAS_LAUNCHED_BEFORE_KEY: &str = "hasLaunchedBefore";
pub const LAUNCH_AT_LOGIN_KEY: &str = "launchAtLogin";

/// Event published after a birthdate has been durably saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BirthdayChanged {
    /// The value now held in storage.
    pub birthdate: Birthdate,
}

/// Owner of the persisted birthdate and its change channel.
pub struct BirthdayStore<R: SettingsRepository> {
    repo: R,
    changes: ChangeChannel<BirthdayChanged>,
}

impl<R: SettingsRepository> BirthdayStore<R> {
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            changes: ChangeChannel::new(),
        }
    }

    /// Returns the stored birthdate, or `None` when never set or unreadable.
    pub fn get(&self) -> Option<Birthdate> {
        match self.read_birthdate() {
            Ok(value) => value,
            Err(err) => {
                warn!("event=birthday_read module=store status=degraded error={err}");
                None
            }
        }
    }

    /// Saves the calendar day of `date` and notifies subscribers.
    ///
    /// Any time-of-day carried by the input is dropped. Returns the value
    /// that was stored.
    ///
    /// # Errors
    /// - Returns the repository error when the write fails; subscribers are
    ///   not notified in that case.
    pub fn set(&self, date: impl Into<Birthdate>) -> RepoResult<Birthdate> {
        let birthdate = date.into();
        self.repo
            .set_setting(BIRTHDAY_KEY, &serde_json::to_value(birthdate)?)?;

        let delivered = self.changes.publish(&BirthdayChanged { birthdate });
        info!("event=birthday_set module=store status=ok subscribers={delivered}");
        Ok(birthdate)
    }

    /// Returns the stored birthdate or January 1, 2000.
    pub fn get_or_default(&self) -> Birthdate {
        self.get().unwrap_or_default()
    }

    pub fn has_been_set(&self) -> bool {
        self.get().is_some()
    }

    /// Returns true on the first call ever made against this storage.
    ///
    /// The latch is durable: later calls, including from new processes on
    /// the same database, return false.
    pub fn is_first_launch(&self) -> bool {
        match self.read_flag(HAS_LAUNCHED_BEFORE_KEY) {
            Ok(true) => false,
            Ok(false) => {
                if let Err(err) = self
                    .repo
                    .set_setting(HAS_LAUNCHED_BEFORE_KEY, &Value::Bool(true))
                {
                    warn!("event=first_launch module=store status=latch_not_saved error={err}");
                }
                info!("event=first_launch module=store status=ok");
                true
            }
            Err(err) => {
                warn!("event=first_launch module=store status=degraded error={err}");
                false
            }
        }
    }

    /// Whether the birthday picker should be offered at startup.
    ///
    /// Consumes the first-launch latch.
    pub fn should_prompt_for_birthday(&self) -> bool {
        self.is_first_launch() || !self.has_been_set()
    }

    /// Stored launch-at-login preference; false when unset or unreadable.
    pub fn launch_at_login(&self) -> bool {
        self.read_flag(LAUNCH_AT_LOGIN_KEY).unwrap_or_else(|err| {
            warn!("event=launch_at_login_read module=store status=degraded error={err}");
            false
        })
    }

    pub fn set_launch_at_login(&self, enabled: bool) -> RepoResult<()> {
        self.repo
            .set_setting(LAUNCH_AT_LOGIN_KEY, &Value::Bool(enabled))?;
        info!("event=launch_at_login_set module=store status=ok enabled={enabled}");
        Ok(())
    }

    /// Registers `callback` for every successful `set`.
    pub fn subscribe(&self, callback: impl Fn(&BirthdayChanged) + 'static) -> Subscription {
        let subscription = self.changes.subscribe(callback);
        debug!(
            "event=birthday_subscribe module=store status=ok subscribers={}",
            self.changes.subscriber_count()
        );
        subscription
    }

    pub fn subscriber_count(&self) -> usize {
        self.changes.subscriber_count()
    }

    fn read_birthdate(&self) -> RepoResult<Option<Birthdate>> {
        self.repo
            .get_setting(BIRTHDAY_KEY)?
            .map(|value| {
                serde_json::from_value(value).map_err(|err| {
                    RepoError::InvalidData(format!("`{BIRTHDAY_KEY}` is not a date: {err}"))
                })
            })
            .transpose()
    }

    fn read_flag(&self, key: &str) -> RepoResult<bool> {
        match self.repo.get_setting(key)? {
            None => Ok(false),
            Some(Value::Bool(flag)) => Ok(flag),
            Some(other) => Err(RepoError::InvalidData(format!(
                "`{key}` should be a boolean, found {other}"
            ))),
        }
    }
}
