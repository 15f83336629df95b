//! Runtime configuration resolved from the environment.
//!
//! # Responsibility
//! - Resolve database path and logging settings for CLI and FFI callers.
//!
//! # Invariants
//! - Blank variables are treated as unset.
//! - Resolution itself never fails; the log level is validated only when a
//!   caller asks for it, after applying any override.
//! - Log levels are validated with the same rules as `init_logging`.

use crate::logging::{default_log_level, normalize_level};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "QUICKNOTE_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "QUICKNOTE_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "QUICKNOTE_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "quicknote.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// `source` names where the value came from (env variable or flag).
    InvalidLogLevel { source: String, message: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLogLevel { source, message } => write!(f, "{source}: {message}"),
        }
    }
}

impl Error for ConfigError {}

/// Resolved settings shared by the boundary crates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotesConfig {
    /// SQLite file holding the key-value slots.
    pub db_path: PathBuf,
    /// Raw `QUICKNOTE_LOG_LEVEL` value, unvalidated.
    pub log_level: Option<String>,
    /// Rolling log directory; logging stays disabled when `None`.
    pub log_dir: Option<PathBuf>,
}

impl NotesConfig {
    /// Resolves configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolves configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            db_path: non_blank(DB_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(default_db_path),
            log_level: non_blank(LOG_LEVEL_ENV),
            log_dir: non_blank(LOG_DIR_ENV).map(PathBuf::from),
        }
    }

    /// Returns the normalized log level to start logging with.
    ///
    /// `override_level` (e.g. a CLI flag named by `override_source`) wins over
    /// the environment; the build default applies when neither is set.
    ///
    /// # Errors
    /// - `ConfigError::InvalidLogLevel` when the winning value is unsupported.
    pub fn effective_log_level(
        &self,
        override_level: Option<&str>,
        override_source: &str,
    ) -> Result<&'static str, ConfigError> {
        let (raw, source) = match (override_level, self.log_level.as_deref()) {
            (Some(level), _) => (level, override_source),
            (None, Some(level)) => (level, LOG_LEVEL_ENV),
            (None, None) => return Ok(default_log_level()),
        };
        normalize_level(raw).map_err(|err| ConfigError::InvalidLogLevel {
            source: source.to_string(),
            message: err.to_string(),
        })
    }
}

/// Returns `<temp>/quicknote.sqlite3`.
pub fn default_db_path() -> PathBuf {
    std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::{default_db_path, ConfigError, NotesConfig, DB_PATH_ENV, LOG_DIR_ENV, LOG_LEVEL_ENV};
    use crate::logging::default_log_level;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn resolve(vars: &[(&str, &str)]) -> NotesConfig {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        NotesConfig::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = resolve(&[]);
        assert_eq!(config.db_path, default_db_path());
        assert_eq!(config.log_dir, None);
        assert_eq!(
            config.effective_log_level(None, "--log-level").unwrap(),
            default_log_level()
        );
    }

    #[test]
    fn variables_override_defaults_and_blank_counts_as_unset() {
        let config = resolve(&[
            (DB_PATH_ENV, " /data/notes.db "),
            (LOG_LEVEL_ENV, "WARNING"),
            (LOG_DIR_ENV, "   "),
        ]);
        assert_eq!(config.db_path, PathBuf::from("/data/notes.db"));
        assert_eq!(config.effective_log_level(None, "--log-level").unwrap(), "warn");
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn bad_env_level_does_not_block_db_path_resolution() {
        let config = resolve(&[(DB_PATH_ENV, "/data/notes.db"), (LOG_LEVEL_ENV, "verbose")]);
        assert_eq!(config.db_path, PathBuf::from("/data/notes.db"));

        let err: ConfigError = config.effective_log_level(None, "--log-level").unwrap_err();
        assert!(err.to_string().contains(LOG_LEVEL_ENV));
    }

    #[test]
    fn override_level_wins_over_bad_env_level() {
        let config = resolve(&[(LOG_LEVEL_ENV, "verbose")]);
        assert_eq!(
            config.effective_log_level(Some("info"), "--log-level").unwrap(),
            "info"
        );

        let err = config
            .effective_log_level(Some("loud"), "--log-level")
            .unwrap_err();
        assert!(err.to_string().contains("--log-level"));
    }
}
