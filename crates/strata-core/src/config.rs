//! Configuration types and parsing for strata.yml

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Project configuration from strata.yml
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Path to the DuckDB database file, or `:memory:`
    #[serde(default = "default_database")]
    pub database: String,

    /// Directory holding `<version>_<name>.(up|down).sql` scripts
    #[serde(default = "default_migrations_dir")]
    pub migrations_dir: String,

    /// Append-only ledger of every migration attempt
    #[serde(default = "default_history_table")]
    pub history_table: String,

    /// Single-row pointer holding the current version and dirty flag
    #[serde(default = "default_version_table")]
    pub version_table: String,

    /// How migration scripts are split into statements
    #[serde(default)]
    pub splitter: SplitterKind,

    /// Refuse `up` when an applied migration's file no longer matches its
    /// recorded checksum
    #[serde(default)]
    pub strict_checksums: bool,
}

/// Statement splitter selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SplitterKind {
    /// Split on bare `;` (default)
    #[default]
    Naive,
    /// Parse with sqlparser and execute each parsed statement
    Parsed,
}

const DEFAULT_DB_PATH: &str = "strata.duckdb";

fn default_database() -> String {
    DEFAULT_DB_PATH.to_string()
}

fn default_migrations_dir() -> String {
    "migrations".to_string()
}

fn default_history_table() -> String {
    "strata_migrations".to_string()
}

fn default_version_table() -> String {
    "strata_schema_version".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            migrations_dir: default_migrations_dir(),
            history_table: default_history_table(),
            version_table: default_version_table(),
            splitter: SplitterKind::default(),
            strict_checksums: false,
        }
    }
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::FileFormatError {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config =
            serde_yaml::from_str(&content).map_err(|e| CoreError::ConfigParseError {
                message: format!("{}: {e}", path.display()),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory
    /// Looks for strata.yml or strata.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        let yml_path = dir.join("strata.yml");
        let yaml_path = dir.join("strata.yaml");

        if yml_path.exists() {
            Self::load(&yml_path)
        } else if yaml_path.exists() {
            Self::load(&yaml_path)
        } else {
            Err(CoreError::ConfigNotFound {
                path: yml_path.display().to_string(),
            })
        }
    }

    /// Load from a project directory, falling back to defaults when the
    /// directory has no config file.
    pub fn load_or_default(dir: &Path) -> CoreResult<Self> {
        match Self::load_from_dir(dir) {
            Err(CoreError::ConfigNotFound { .. }) => Ok(Self::default()),
            other => other,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> CoreResult<()> {
        if self.migrations_dir.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "migrations_dir cannot be empty".to_string(),
            });
        }
        if self.database.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "database cannot be empty".to_string(),
            });
        }
        for (key, table) in [
            ("history_table", &self.history_table),
            ("version_table", &self.version_table),
        ] {
            if table.trim().is_empty() {
                return Err(CoreError::ConfigInvalid {
                    message: format!("{key} cannot be empty"),
                });
            }
        }
        if self.history_table == self.version_table {
            return Err(CoreError::ConfigInvalid {
                message: format!(
                    "history_table and version_table must differ (both are '{}')",
                    self.history_table
                ),
            });
        }
        Ok(())
    }

    /// Absolute path of the migrations directory relative to `root`
    pub fn migrations_path(&self, root: &Path) -> PathBuf {
        root.join(&self.migrations_dir)
    }

    /// Database path relative to `root`; `:memory:` is passed through
    pub fn database_path(&self, root: &Path) -> String {
        if self.database == ":memory:" || Path::new(&self.database).is_absolute() {
            self.database.clone()
        } else {
            root.join(&self.database).display().to_string()
        }
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
