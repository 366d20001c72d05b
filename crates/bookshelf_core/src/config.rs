//! Catalog configuration file.
//!
//! The file is TOML; every key is optional:
//!
//! ```toml
//! database_path = "/var/lib/bookshelf/catalog.sqlite3"
//! log_level = "info"
//! log_dir = "/var/log/bookshelf"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

const DEFAULT_DB_FILE_NAME: &str = "bookshelf.sqlite3";
const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config `{path}`: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Runtime settings for opening the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogConfig {
    /// SQLite database file.
    pub database_path: PathBuf,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Absolute directory for rolling log files; stderr when unset.
    pub log_dir: Option<PathBuf>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            database_path: default_data_dir().join(DEFAULT_DB_FILE_NAME),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_dir: None,
        }
    }
}

impl CatalogConfig {
    /// Parses a config document; missing keys take default values.
    pub fn from_toml_str(contents: &str, origin: &Path) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Reads and parses the config file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents, path)
    }

    /// Loads `explicit` when given, else the default config file if it
    /// exists, else built-in defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let path = default_config_path();
        if path.is_file() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }
}

/// `<config_dir>/bookshelf/config.toml`.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("bookshelf")
        .join("config.toml")
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("bookshelf"))
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::{CatalogConfig, ConfigError};
    use std::io::Write;
    use std::path::{Path, PathBuf};

    #[test]
    fn empty_document_yields_defaults() {
        let config = CatalogConfig::from_toml_str("", Path::new("inline")).unwrap();
        assert_eq!(config, CatalogConfig::default());
        assert!(config.database_path.ends_with("bookshelf.sqlite3"));
    }

    #[test]
    fn explicit_keys_override_defaults() {
        let config = CatalogConfig::from_toml_str(
            "database_path = \"/tmp/catalog.db\"\nlog_level = \"warn\"\nlog_dir = \"/tmp/logs\"\n",
            Path::new("inline"),
        )
        .unwrap();
        assert_eq!(config.database_path, PathBuf::from("/tmp/catalog.db"));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, Some(PathBuf::from("/tmp/logs")));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err =
            CatalogConfig::from_toml_str("colour = \"blue\"", Path::new("inline")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn load_reads_file_and_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "log_level = \"error\"").unwrap();

        let config = CatalogConfig::load(&path).unwrap();
        assert_eq!(config.log_level, "error");

        let missing = CatalogConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(missing, ConfigError::Io { .. }));
    }

    #[test]
    fn resolve_prefers_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "database_path = \"/tmp/explicit.db\"").unwrap();

        let config = CatalogConfig::resolve(Some(&path)).unwrap();
        assert_eq!(config.database_path, PathBuf::from("/tmp/explicit.db"));
    }
}
