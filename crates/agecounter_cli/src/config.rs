//! Runtime configuration for the command-line front end.
//!
//! Flags win over environment variables (handled by clap); anything still
//! missing falls back to per-user platform directories.

use agecounter_core::{default_log_level, LogLevel};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

const DB_FILE_NAME: &str = "agecounter.sqlite3";
const LOG_DIR_NAME: &str = "logs";

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: LogLevel,
}

impl AppConfig {
    /// Fills unset values from platform defaults and absolutizes paths.
    ///
    /// # Errors
    /// - No path was given and the platform has no per-user data directory.
    /// - The current directory is needed to absolutize a path and is unknown.
    pub fn resolve(
        db_path: Option<PathBuf>,
        log_dir: Option<PathBuf>,
        log_level: Option<LogLevel>,
    ) -> Result<Self> {
        let data_dir = || -> Result<PathBuf> {
            project_dirs()
                .map(|dirs| dirs.data_local_dir().to_path_buf())
                .context("cannot determine a per-user data directory; pass --db and --log-dir")
        };

        let db_path = match db_path {
            Some(path) => path,
            None => data_dir()?.join(DB_FILE_NAME),
        };
        let log_dir = match log_dir {
            Some(path) => path,
            None => data_dir()?.join(LOG_DIR_NAME),
        };

        Ok(Self {
            db_path: absolutize(&db_path)?,
            log_dir: absolutize(&log_dir)?,
            log_level: log_level.unwrap_or_else(default_log_level),
        })
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "agecounter", "AgeCounter")
}

fn absolutize(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("failed to read current directory")?;
    Ok(cwd.join(path))
}

#[cfg(test)]
mod tests {
    use super::AppConfig;
    use agecounter_core::LogLevel;
    use std::path::PathBuf;

    #[test]
    fn explicit_values_are_kept() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("age.db");
        let logs = dir.path().join("logs");

        let config =
            AppConfig::resolve(Some(db.clone()), Some(logs.clone()), Some(LogLevel::Warn))
                .unwrap();

        assert_eq!(config.db_path, db);
        assert_eq!(config.log_dir, logs);
        assert_eq!(config.log_level, LogLevel::Warn);
    }

    #[test]
    fn relative_paths_become_absolute() {
        let config = AppConfig::resolve(
            Some(PathBuf::from("age.db")),
            Some(PathBuf::from("logs")),
            None,
        )
        .unwrap();

        assert!(config.db_path.is_absolute());
        assert!(config.db_path.ends_with("age.db"));
        assert!(config.log_dir.is_absolute());
    }
}
