//! Error types for strata-core

use thiserror::Error;

/// Core error type for Strata
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Failed to parse configuration file
    #[error("[E002] Failed to parse config: {message}")]
    ConfigParseError { message: String },

    /// E003: Invalid configuration value
    #[error("[E003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E004: Migration source directory not found
    #[error("[E004] Migration source not found: {path}")]
    SourceNotFound { path: String },

    /// E005: A migration script could not be read
    #[error("[E005] Failed to read migration file '{path}': {source}")]
    FileFormatError {
        path: String,
        source: std::io::Error,
    },

    /// E006: Two files claim the same version and direction
    #[error("[E006] Duplicate {direction} migration for version {version}: '{first}' and '{second}'")]
    DuplicateMigration {
        version: String,
        direction: String,
        first: String,
        second: String,
    },

    /// E007: Version string is not a 14-digit timestamp
    #[error("[E007] Invalid migration version '{version}': expected 14 digits (YYYYMMDDHHMMSS)")]
    InvalidVersion { version: String },

    /// E008: SQL-aware splitter could not parse a script
    #[error("[E008] SQL parse error: {message}")]
    SqlParse { message: String },

    /// E009: Invalid migration name for scaffolding
    #[error("[E009] Invalid migration name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    /// E010: IO error
    #[error("[E010] IO error: {0}")]
    Io(#[from] std::io::Error),

    /// E011: YAML parse error
    #[error("[E011] YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
