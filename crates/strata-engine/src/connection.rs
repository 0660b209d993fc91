//! DuckDB connection wrapper and transaction helpers.

use crate::error::{MigrateError, MigrateResult};
use duckdb::Connection;
use std::path::Path;

/// Owns the DuckDB [`Connection`] of the database being migrated.
///
/// Single-threaded: migrations run sequentially on the caller's thread.
pub struct MigrationDb {
    conn: Connection,
}

impl MigrationDb {
    /// Open (or create) the database at `path`.
    pub fn open(path: &Path) -> MigrateResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| MigrateError::ConnectionError(format!("{e}: {}", path.display())))?;
        Ok(Self { conn })
    }

    /// Create an in-memory database.
    pub fn open_memory() -> MigrateResult<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| MigrateError::ConnectionError(e.to_string()))?;
        Ok(Self { conn })
    }

    /// Open from a path string (handles the `:memory:` special case).
    pub fn new(path: &str) -> MigrateResult<Self> {
        if path == ":memory:" {
            Self::open_memory()
        } else {
            Self::open(Path::new(path))
        }
    }

    /// Borrow the underlying DuckDB connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Execute `body` within a `BEGIN` / `COMMIT` transaction, rolling back on
    /// error.
    pub fn transaction<F, T>(&self, body: F) -> MigrateResult<T>
    where
        F: FnOnce(&Connection) -> MigrateResult<T>,
    {
        with_transaction(&self.conn, body)
    }
}

pub(crate) fn begin(conn: &Connection) -> MigrateResult<()> {
    conn.execute_batch("BEGIN TRANSACTION")
        .map_err(|e| MigrateError::TransactionError(format!("BEGIN failed: {e}")))
}

pub(crate) fn commit(conn: &Connection) -> Result<(), duckdb::Error> {
    conn.execute_batch("COMMIT")
}

/// Roll back, logging instead of failing: callers are already on an error path.
pub(crate) fn rollback(conn: &Connection) {
    if let Err(e) = conn.execute_batch("ROLLBACK") {
        log::warn!("ROLLBACK failed: {e}");
    }
}

pub(crate) fn with_transaction<F, T>(conn: &Connection, body: F) -> MigrateResult<T>
where
    F: FnOnce(&Connection) -> MigrateResult<T>,
{
    begin(conn)?;

    let result = body(conn);

    match &result {
        Ok(_) => {
            if let Err(commit_err) = commit(conn) {
                rollback(conn);
                return Err(MigrateError::TransactionError(format!(
                    "COMMIT failed: {commit_err}"
                )));
            }
        }
        Err(_) => rollback(conn),
    }
    result
}
