//! Error types for the migration engine.

use strata_core::{CoreError, Direction};
use thiserror::Error;

/// Migration engine errors.
#[derive(Error, Debug)]
pub enum MigrateError {
    /// Failed to open or create the target database (M001).
    #[error("[M001] Database connection failed: {0}")]
    ConnectionError(String),

    /// The requested direction has no script (M002).
    #[error("[M002] Migration {version} has no {direction} script")]
    ScriptMissing { version: String, direction: Direction },

    /// A statement failed; `index` is 1-based within the script (M003).
    #[error("[M003] Migration {version} failed at statement {index}: {message}")]
    StatementExecution {
        version: String,
        index: usize,
        message: String,
    },

    /// Up requested for a version that is already applied (M004).
    #[error("[M004] Migration {version} is already applied")]
    AlreadyApplied { version: String },

    /// Down requested for a version that is not applied (M005).
    #[error("[M005] Migration {version} is not applied")]
    NotApplied { version: String },

    /// COMMIT of a migration transaction failed (M006).
    #[error("[M006] Failed to commit migration {version}: {message}")]
    Commit { version: String, message: String },

    /// BEGIN/ROLLBACK or bookkeeping transaction failure (M007).
    #[error("[M007] Transaction failed: {0}")]
    TransactionError(String),

    /// Reading or writing the ledger/pointer tables failed (M008).
    #[error("[M008] State store query failed: {0}")]
    QueryError(String),

    /// The schema pointer is dirty and `force` was not given (M009).
    #[error("[M009] Schema is dirty at version {version}: a previous migration did not complete. Inspect the database, then rerun with --force")]
    Dirty { version: String },

    /// An applied migration's file no longer matches its recorded checksum (M010).
    #[error("[M010] Migration {version} changed after it was applied (recorded {recorded}, found {current})")]
    ChecksumDrift {
        version: String,
        recorded: String,
        current: String,
    },

    /// The version is not present in the migration source (M011).
    #[error("[M011] Migration {version} not found in {location}")]
    MigrationNotFound { version: String, location: String },

    /// Scanning or splitting failed.
    #[error(transparent)]
    Source(#[from] CoreError),

    /// DuckDB driver error with preserved source chain (M012).
    #[error("[M012] DuckDB error")]
    DuckDb(#[source] duckdb::Error),
}

/// Result type alias for [`MigrateError`].
pub type MigrateResult<T> = Result<T, MigrateError>;

impl From<duckdb::Error> for MigrateError {
    fn from(err: duckdb::Error) -> Self {
        MigrateError::DuckDb(err)
    }
}
