//! Settings repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Read and upsert JSON-encoded values by string key.
//!
//! # Invariants
//! - One row per key; writes replace the previous value.
//! - Keys are stored verbatim, values as compact JSON text.

use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Error for settings persistence and decoding.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    Serialization(serde_json::Error),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Serialization(err) => write!(f, "failed to encode setting: {err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted setting: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialization(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

/// Durable key-value storage for settings.
pub trait SettingsRepository {
    fn get_setting(&self, key: &str) -> RepoResult<Option<Value>>;
    fn set_setting(&self, key: &str, value: &Value) -> RepoResult<()>;
}

impl<R: SettingsRepository + ?Sized> SettingsRepository for &R {
    fn get_setting(&self, key: &str) -> RepoResult<Option<Value>> {
        (**self).get_setting(key)
    }

    fn set_setting(&self, key: &str, value: &Value) -> RepoResult<()> {
        (**self).set_setting(key, value)
    }
}

/// SQLite-backed settings repository.
pub struct SqliteSettingsRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSettingsRepository<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl SettingsRepository for SqliteSettingsRepository<'_> {
    fn get_setting(&self, key: &str) -> RepoResult<Option<Value>> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?1;",
                [key],
                |row| row.get(0),
            )
            .optional()?;

        match raw {
            Some(text) => serde_json::from_str(&text).map(Some).map_err(|err| {
                RepoError::InvalidData(format!("settings.value for key `{key}`: {err}"))
            }),
            None => Ok(None),
        }
    }

    fn set_setting(&self, key: &str, value: &Value) -> RepoResult<()> {
        let text = serde_json::to_string(value)?;
        self.conn.execute(
            "INSERT INTO settings (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, text],
        )?;
        Ok(())
    }
}
