//! Configuration management for the daybook application.
//!
//! This module handles loading and validating configuration settings from
//! environment variables, with sensible defaults.
//!
//! # Environment Variables
//!
//! - `DAYBOOK_DIR`: Data directory (defaults to ~/.local/share/daybook)
//! - `DAYBOOK_DB`: Database file (defaults to `<DAYBOOK_DIR>/daybook.db`)
//! - `DAYBOOK_SECRETS_DIR`: Directory holding the PIN digest (defaults to ~/.config/daybook)
//! - `DAYBOOK_DUMP`: Debug dump artifact (defaults to `<DAYBOOK_DIR>/database_query.txt`,
//!   `off` disables it)
//! - `HOME`: Used for expanding the default paths

use crate::constants::{
    DEFAULT_DATA_SUBDIR, DEFAULT_DB_FILENAME, DEFAULT_DUMP_FILENAME, DEFAULT_SECRETS_SUBDIR,
    DUMP_DISABLED_VALUES, ENV_VAR_DAYBOOK_DB, ENV_VAR_DAYBOOK_DIR, ENV_VAR_DAYBOOK_DUMP,
    ENV_VAR_DAYBOOK_SECRETS_DIR, ENV_VAR_HOME, REDACTED_PLACEHOLDER,
};
use crate::errors::{AppError, AppResult};
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for the daybook application.
///
/// # Examples
///
/// Creating a configuration manually:
/// ```
/// use daybook::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     data_dir: PathBuf::from("/srv/daybook"),
///     db_path: PathBuf::from("/srv/daybook/daybook.db"),
///     secrets_dir: PathBuf::from("/etc/daybook"),
///     dump_path: None,
/// };
/// assert!(config.validate().is_ok());
/// ```
pub struct Config {
    /// Directory holding the database and, by default, the debug dump.
    pub data_dir: PathBuf,

    /// SQLite database file.
    pub db_path: PathBuf,

    /// Directory holding the PIN digest file.
    pub secrets_dir: PathBuf,

    /// Where the debug dump is written after each mutation, or `None` when
    /// the dump is disabled.
    pub dump_path: Option<PathBuf>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("data_dir", &REDACTED_PLACEHOLDER)
            .field("db_path", &REDACTED_PLACEHOLDER)
            .field("secrets_dir", &REDACTED_PLACEHOLDER)
            .field("dump_enabled", &self.dump_path.is_some())
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: PathBuf::from(""),
            db_path: PathBuf::from(""),
            secrets_dir: PathBuf::from(""),
            dump_path: None,
        }
    }
}

fn expand(raw: &str) -> AppResult<PathBuf> {
    let expanded = shellexpand::full(raw)
        .map_err(|e| AppError::Config(format!("Failed to expand path '{}': {}", raw, e)))?;
    Ok(PathBuf::from(expanded.into_owned()))
}

fn home_subdir(subdir: &str) -> String {
    let home = env::var(ENV_VAR_HOME).unwrap_or_default();
    format!("{}/{}", home, subdir)
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

impl Config {
    /// Loads configuration from environment variables with sensible defaults.
    ///
    /// Paths are expanded with `shellexpand`, so `~` and `$VAR` references
    /// work in every variable.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a path cannot be expanded or the data
    /// directory resolves to an empty path.
    pub fn load() -> AppResult<Self> {
        let data_dir_raw = non_empty_var(ENV_VAR_DAYBOOK_DIR)
            .unwrap_or_else(|| home_subdir(DEFAULT_DATA_SUBDIR));
        let data_dir = expand(&data_dir_raw)?;
        if data_dir.as_os_str().is_empty() {
            return Err(AppError::Config("Data directory path is empty".to_string()));
        }

        let db_path = match non_empty_var(ENV_VAR_DAYBOOK_DB) {
            Some(raw) => expand(&raw)?,
            None => data_dir.join(DEFAULT_DB_FILENAME),
        };

        let secrets_dir_raw = non_empty_var(ENV_VAR_DAYBOOK_SECRETS_DIR)
            .unwrap_or_else(|| home_subdir(DEFAULT_SECRETS_SUBDIR));
        let secrets_dir = expand(&secrets_dir_raw)?;

        let dump_path = match non_empty_var(ENV_VAR_DAYBOOK_DUMP) {
            Some(raw) if Self::is_dump_disabled(&raw) => None,
            Some(raw) => Some(expand(&raw)?),
            None => Some(data_dir.join(DEFAULT_DUMP_FILENAME)),
        };

        Ok(Config {
            data_dir,
            db_path,
            secrets_dir,
            dump_path,
        })
    }

    fn is_dump_disabled(value: &str) -> bool {
        let value = value.trim();
        DUMP_DISABLED_VALUES
            .iter()
            .any(|disabled| value.eq_ignore_ascii_case(disabled))
    }

    /// Validates that the configuration is usable.
    ///
    /// Every path must be non-empty and absolute.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` naming the first offending setting.
    pub fn validate(&self) -> AppResult<()> {
        check_path("Data directory", &self.data_dir)?;
        check_path("Database path", &self.db_path)?;
        check_path("Secrets directory", &self.secrets_dir)?;
        if let Some(dump_path) = &self.dump_path {
            check_path("Dump path", dump_path)?;
        }
        Ok(())
    }

    /// Creates the data directory and the database's parent directory.
    pub fn ensure_data_dir(&self) -> AppResult<()> {
        create_private_dir(&self.data_dir)?;
        if let Some(parent) = self.db_path.parent() {
            create_private_dir(parent)?;
        }
        Ok(())
    }
}

fn check_path(what: &str, path: &Path) -> AppResult<()> {
    if path.as_os_str().is_empty() {
        return Err(AppError::Config(format!("{} path is empty", what)));
    }
    if !path.is_absolute() {
        return Err(AppError::Config(format!(
            "{} must be an absolute path",
            what
        )));
    }
    Ok(())
}

fn create_private_dir(dir: &Path) -> AppResult<()> {
    if dir.exists() {
        return Ok(());
    }
    fs::create_dir_all(dir)?;
    #[cfg(unix)]
    {
        use crate::constants::DEFAULT_DIR_PERMISSIONS;
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(dir, fs::Permissions::from_mode(DEFAULT_DIR_PERMISSIONS))?;
    }
    Ok(())
}
