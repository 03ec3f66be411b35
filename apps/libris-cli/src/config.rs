//! # Console Configuration
//!
//! Where the database lives and how chatty the logs are.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command-line flags (highest priority)                              │
//! │     --db ./library.db   --verbose                                      │
//! │                                                                         │
//! │  2. Environment Variables                                              │
//! │     LIBRIS_DB_PATH=/srv/libris/libris.db                               │
//! │     LIBRIS_CONNECT_TIMEOUT_SECS=10                                     │
//! │     LIBRIS_LOG=debug                                                   │
//! │                                                                         │
//! │  3. TOML Config File                                                   │
//! │     --config <file>, or                                                │
//! │     ~/.config/libris/libris.toml (Linux)                               │
//! │     ~/Library/Application Support/org.libris.libris/libris.toml (macOS)│
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                   │
//! │     <data dir>/libris.db, 30s timeout, "warn" logs                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # libris.toml
//! [database]
//! path = "/srv/libris/libris.db"   # or ":memory:"
//! connect_timeout_secs = 30
//!
//! [logging]
//! filter = "warn,libris_db=info"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use libris_db::DbConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Environment variable overriding the database path.
pub const ENV_DB_PATH: &str = "LIBRIS_DB_PATH";

/// Environment variable overriding the connect timeout (seconds).
pub const ENV_CONNECT_TIMEOUT: &str = "LIBRIS_CONNECT_TIMEOUT_SECS";

/// Environment variable overriding the log filter.
pub const ENV_LOG: &str = "LIBRIS_LOG";

/// Filter used by `--verbose`.
pub const VERBOSE_FILTER: &str = "warn,libris_cli=debug,libris_db=debug";

// =============================================================================
// Errors
// =============================================================================

/// Configuration errors. All of them are fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested config file doesn't exist.
    #[error("Config file not found: {0}")]
    Missing(PathBuf),

    /// The config file couldn't be read.
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file isn't valid TOML for this schema.
    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// An environment override couldn't be parsed.
    #[error("Invalid value for {var}: '{value}'")]
    InvalidEnv { var: &'static str, value: String },

    /// A setting is out of range.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

// =============================================================================
// Sections
// =============================================================================

/// Database settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// Database file, or `:memory:` for a throwaway database.
    #[serde(default = "default_db_path")]
    pub path: PathBuf,

    /// How long to wait for the connection (seconds).
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

fn default_db_path() -> PathBuf {
    ProjectDirs::from("org", "libris", "libris")
        .map(|dirs| dirs.data_dir().join("libris.db"))
        .unwrap_or_else(|| PathBuf::from("libris.db"))
}

fn default_connect_timeout() -> u64 {
    30
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: default_db_path(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// `tracing` filter directive. `RUST_LOG` wins over this when set.
    #[serde(default = "default_filter")]
    pub filter: String,
}

fn default_filter() -> String {
    "warn".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            filter: default_filter(),
        }
    }
}

// =============================================================================
// App Configuration
// =============================================================================

/// Complete console configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

impl AppConfig {
    /// Loads defaults, then the config file, then environment overrides.
    ///
    /// ## Config File Lookup
    /// - `explicit` given: it must exist
    /// - otherwise the platform default path is used if present
    ///
    /// `lookup` reads environment variables; pass `|k| std::env::var(k).ok()`.
    pub fn load<F>(explicit: Option<&Path>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match explicit {
            Some(path) if !path.exists() => return Err(ConfigError::Missing(path.to_path_buf())),
            Some(path) => Self::from_file(path)?,
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };

        config.apply_env_overrides(lookup)?;
        Ok(config)
    }

    /// Parses one TOML file. Missing sections take their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&contents)?)
    }

    /// Applies `LIBRIS_*` environment overrides.
    fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_DB_PATH) {
            self.database.path = PathBuf::from(path);
        }

        if let Some(raw) = lookup(ENV_CONNECT_TIMEOUT) {
            self.database.connect_timeout_secs =
                raw.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                    var: ENV_CONNECT_TIMEOUT,
                    value: raw.clone(),
                })?;
        }

        if let Some(filter) = lookup(ENV_LOG) {
            self.logging.filter = filter;
        }

        Ok(())
    }

    /// Applies command-line flags on top of everything else.
    pub fn apply_flags(&mut self, db: Option<PathBuf>, verbose: bool) {
        if let Some(path) = db {
            self.database.path = path;
        }
        if verbose {
            self.logging.filter = VERBOSE_FILTER.to_string();
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("database path must not be empty".into()));
        }

        if self.database.connect_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "connect_timeout_secs must be greater than 0".into(),
            ));
        }

        EnvFilter::try_new(&self.logging.filter).map_err(|e| {
            ConfigError::Invalid(format!("log filter '{}': {e}", self.logging.filter))
        })?;

        Ok(())
    }

    /// Builds the session configuration.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database.path)
            .connect_timeout(Duration::from_secs(self.database.connect_timeout_secs))
    }

    /// Returns true if the database path is the platform default.
    pub fn uses_default_db_path(&self) -> bool {
        self.database.path == default_db_path()
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("org", "libris", "libris").map(|dirs| dirs.config_dir().join("libris.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn write_config(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("libris.toml");
        std::fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.database.connect_timeout_secs, 30);
        assert_eq!(config.logging.filter, "warn");
        assert!(config.database.path.ends_with("libris.db"));
        assert!(config.uses_default_db_path());
        config.validate().unwrap();
    }

    #[test]
    fn test_file_overrides_defaults() {
        let (_dir, path) = write_config(
            r#"
            [database]
            path = ":memory:"
            "#,
        );

        let config = AppConfig::load(Some(path.as_path()), env(&[])).unwrap();
        assert_eq!(config.database.path, PathBuf::from(":memory:"));
        assert_eq!(config.database.connect_timeout_secs, 30);
        assert_eq!(config.logging, LoggingSettings::default());
        assert!(config.db_config().is_in_memory());
    }

    #[test]
    fn test_env_overrides_file() {
        let (_dir, path) = write_config(
            r#"
            [database]
            path = "from-file.db"
            connect_timeout_secs = 5
            "#,
        );

        let config = AppConfig::load(
            Some(path.as_path()),
            env(&[
                (ENV_DB_PATH, "from-env.db"),
                (ENV_CONNECT_TIMEOUT, "12"),
                (ENV_LOG, "info"),
            ]),
        )
        .unwrap();
        assert_eq!(config.database.path, PathBuf::from("from-env.db"));
        assert_eq!(config.database.connect_timeout_secs, 12);
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn test_flags_override_env() {
        let (_dir, path) = write_config("");
        let mut config =
            AppConfig::load(Some(path.as_path()), env(&[(ENV_DB_PATH, "from-env.db")])).unwrap();
        assert_eq!(config.database.path, PathBuf::from("from-env.db"));
        config.apply_flags(Some(PathBuf::from("from-flag.db")), true);

        assert_eq!(config.database.path, PathBuf::from("from-flag.db"));
        assert_eq!(config.logging.filter, VERBOSE_FILTER);
        config.validate().unwrap();
    }

    #[test]
    fn test_missing_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::load(Some(dir.path().join("nope.toml").as_path()), env(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(_)));
    }

    #[test]
    fn test_malformed_file() {
        let (_dir, path) = write_config("[database\npath = 1");
        let err = AppConfig::load(Some(path.as_path()), env(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_bad_env_timeout() {
        let (_dir, path) = write_config("");
        let err = AppConfig::load(Some(path.as_path()), env(&[(ENV_CONNECT_TIMEOUT, "soon")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidEnv {
                var: ENV_CONNECT_TIMEOUT,
                ..
            }
        ));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = AppConfig::default();
        config.database.connect_timeout_secs = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }
}
