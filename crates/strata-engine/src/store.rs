//! Version and state bookkeeping inside the migrated database.
//!
//! Two tables:
//! - the ledger (`history_table`): one row per migration attempt, append-only
//! - the pointer (`version_table`): the current version and its dirty flag,
//!   kept to a single row
//!
//! Nothing is cached in memory; every read goes to the database.

use crate::connection::with_transaction;
use crate::error::{MigrateError, MigrateResult};
use duckdb::{params, Connection, ToSql};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use strata_core::sql_utils::{quote_qualified, split_qualified_name};
use strata_core::{Config, Migration};

/// Outcome of one ledger row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerStatus {
    Success,
    Failed,
    RolledBack,
}

impl LedgerStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            LedgerStatus::Success => "success",
            LedgerStatus::Failed => "failed",
            LedgerStatus::RolledBack => "rolled_back",
        }
    }
}

impl fmt::Display for LedgerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LedgerStatus {
    type Err = MigrateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(LedgerStatus::Success),
            "failed" => Ok(LedgerStatus::Failed),
            "rolled_back" => Ok(LedgerStatus::RolledBack),
            other => Err(MigrateError::QueryError(format!(
                "unknown ledger status '{other}'"
            ))),
        }
    }
}

/// The schema pointer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaVersion {
    pub version: String,
    pub dirty: bool,
    pub updated_at: String,
}

/// One ledger row to append.
#[derive(Debug, Clone)]
pub struct MigrationRecord<'a> {
    pub version: &'a str,
    pub name: &'a str,
    pub up_script: &'a str,
    pub down_script: Option<&'a str>,
    pub checksum: &'a str,
    pub execution_time_ms: i64,
    pub status: LedgerStatus,
    pub error_message: Option<&'a str>,
}

impl<'a> MigrationRecord<'a> {
    /// Ledger row for an attempt at `migration`
    pub fn for_migration(
        migration: &'a Migration,
        status: LedgerStatus,
        execution_time_ms: i64,
        error_message: Option<&'a str>,
    ) -> Self {
        Self {
            version: &migration.version,
            name: &migration.name,
            up_script: &migration.up,
            down_script: migration.down.as_deref(),
            checksum: &migration.checksum,
            execution_time_ms,
            status,
            error_message,
        }
    }
}

/// A ledger row as read back (script copies omitted).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub version: String,
    pub name: String,
    pub applied_at: String,
    pub execution_time_ms: i64,
    pub checksum: String,
    pub status: LedgerStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// Reads and writes the ledger and pointer tables.
pub struct StateStore<'a> {
    conn: &'a Connection,
    history_table: String,
    version_table: String,
}

impl<'a> StateStore<'a> {
    /// Store over `conn` using the given (possibly schema-qualified) table names.
    pub fn new(conn: &'a Connection, history_table: &str, version_table: &str) -> Self {
        Self {
            conn,
            history_table: history_table.to_string(),
            version_table: version_table.to_string(),
        }
    }

    /// Store using the table names from `config`.
    pub fn from_config(conn: &'a Connection, config: &Config) -> Self {
        Self::new(conn, &config.history_table, &config.version_table)
    }

    fn history(&self) -> String {
        quote_qualified(&self.history_table)
    }

    fn pointer(&self) -> String {
        quote_qualified(&self.version_table)
    }

    /// Create the ledger and pointer tables if absent. Safe to call repeatedly.
    pub fn initialize(&self) -> MigrateResult<()> {
        let mut ddl = String::new();
        for table in [&self.history_table, &self.version_table] {
            if let (Some(schema), _) = split_qualified_name(table) {
                ddl.push_str(&format!(
                    "CREATE SCHEMA IF NOT EXISTS {};\n",
                    quote_qualified(schema)
                ));
            }
        }
        ddl.push_str(&format!(
            "CREATE TABLE IF NOT EXISTS {history} (
                 id                BIGINT PRIMARY KEY,
                 version           VARCHAR NOT NULL,
                 name              VARCHAR NOT NULL,
                 applied_at        TIMESTAMP NOT NULL DEFAULT now(),
                 execution_time_ms BIGINT NOT NULL,
                 checksum          VARCHAR NOT NULL,
                 up_script         VARCHAR NOT NULL,
                 down_script       VARCHAR,
                 status            VARCHAR NOT NULL,
                 error_message     VARCHAR
             );
             CREATE TABLE IF NOT EXISTS {pointer} (
                 version    VARCHAR NOT NULL,
                 dirty      BOOLEAN NOT NULL,
                 updated_at TIMESTAMP NOT NULL DEFAULT now()
             );",
            history = self.history(),
            pointer = self.pointer(),
        ));

        self.conn.execute_batch(&ddl).map_err(|e| {
            MigrateError::QueryError(format!("failed to create migration tables: {e}"))
        })
    }

    /// The current pointer, or `None` if no migration has ever run (or the
    /// last one was rolled back).
    pub fn current_version(&self) -> MigrateResult<Option<SchemaVersion>> {
        let sql = format!(
            "SELECT version, dirty, CAST(updated_at AS VARCHAR)
             FROM {}
             ORDER BY updated_at DESC
             LIMIT 1",
            self.pointer()
        );
        let pointer = self.conn.query_row(&sql, [], |row| {
            Ok(SchemaVersion {
                version: row.get(0)?,
                dirty: row.get(1)?,
                updated_at: row.get(2)?,
            })
        });
        match pointer {
            Ok(pointer) => Ok(Some(pointer)),
            Err(duckdb::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(MigrateError::QueryError(format!(
                "failed to read schema version: {e}"
            ))),
        }
    }

    /// Replace the pointer with `version` / `dirty`.
    pub fn set_version(&self, version: &str, dirty: bool) -> MigrateResult<()> {
        let delete = format!("DELETE FROM {}", self.pointer());
        let insert = format!(
            "INSERT INTO {} (version, dirty) VALUES (?, ?)",
            self.pointer()
        );
        with_transaction(self.conn, |conn| {
            conn.execute(&delete, [])
                .and_then(|_| conn.execute(&insert, params![version, dirty]))
                .map_err(|e| {
                    MigrateError::QueryError(format!(
                        "failed to set schema version {version}: {e}"
                    ))
                })?;
            Ok(())
        })
    }

    /// Remove the pointer entirely.
    pub fn clear_version(&self) -> MigrateResult<()> {
        self.conn
            .execute(&format!("DELETE FROM {}", self.pointer()), [])
            .map_err(|e| MigrateError::QueryError(format!("failed to clear schema version: {e}")))?;
        Ok(())
    }

    /// Append one ledger row.
    pub fn record_migration(&self, record: &MigrationRecord<'_>) -> MigrateResult<()> {
        let next_id: i64 = self
            .conn
            .query_row(
                &format!("SELECT COALESCE(MAX(id), 0) + 1 FROM {}", self.history()),
                [],
                |row| row.get(0),
            )
            .map_err(|e| MigrateError::QueryError(format!("failed to allocate ledger id: {e}")))?;

        self.conn
            .execute(
                &format!(
                    "INSERT INTO {} (id, version, name, execution_time_ms, checksum,
                                     up_script, down_script, status, error_message)
                     VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
                    self.history()
                ),
                params![
                    next_id,
                    record.version,
                    record.name,
                    record.execution_time_ms,
                    record.checksum,
                    record.up_script,
                    record.down_script,
                    record.status.as_str(),
                    record.error_message,
                ],
            )
            .map_err(|e| {
                MigrateError::QueryError(format!(
                    "failed to record migration {}: {e}",
                    record.version
                ))
            })?;
        Ok(())
    }

    /// Versions currently applied, ascending.
    ///
    /// A version is applied when its most recent `success` / `rolled_back`
    /// row is a `success`. Failed attempts never change that answer.
    pub fn applied_versions(&self) -> MigrateResult<Vec<String>> {
        let sql = format!(
            "SELECT version FROM (
                 SELECT version, status,
                        ROW_NUMBER() OVER (PARTITION BY version ORDER BY id DESC) AS rn
                 FROM {}
                 WHERE status IN ('success', 'rolled_back')
             ) latest
             WHERE rn = 1 AND status = 'success'
             ORDER BY version",
            self.history()
        );
        let mut stmt = self
            .conn
            .prepare(&sql)
            .map_err(|e| MigrateError::QueryError(format!("prepare applied versions: {e}")))?;
        let versions = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(|e| MigrateError::QueryError(format!("query applied versions: {e}")))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| MigrateError::QueryError(format!("read applied versions: {e}")))?;
        Ok(versions)
    }

    pub fn is_applied(&self, version: &str) -> MigrateResult<bool> {
        Ok(self.applied_versions()?.iter().any(|v| v == version))
    }

    /// Ledger rows, newest first.
    pub fn history_entries(&self, limit: Option<usize>) -> MigrateResult<Vec<HistoryEntry>> {
        let mut sql = format!(
            "SELECT id, version, name, CAST(applied_at AS VARCHAR), execution_time_ms,
                    checksum, status, error_message
             FROM {}
             ORDER BY id DESC",
            self.history()
        );
        if let Some(limit) = limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }
        self.query_history(&sql, &[])
    }

    /// The most recent `success` row for `version`, if any.
    pub fn last_success(&self, version: &str) -> MigrateResult<Option<HistoryEntry>> {
        let sql = format!(
            "SELECT id, version, name, CAST(applied_at AS VARCHAR), execution_time_ms,
                    checksum, status, error_message
             FROM {}
             WHERE version = ? AND status = 'success'
             ORDER BY id DESC
             LIMIT 1",
            self.history()
        );
        Ok(self.query_history(&sql, &[&version])?.into_iter().next())
    }

    fn query_history(&self, sql: &str, params: &[&dyn ToSql]) -> MigrateResult<Vec<HistoryEntry>> {
        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|e| MigrateError::QueryError(format!("prepare history: {e}")))?;
        let raw = stmt
            .query_map(params, |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, i64>(4)?,
                    row.get::<_, String>(5)?,
                    row.get::<_, String>(6)?,
                    row.get::<_, Option<String>>(7)?,
                ))
            })
            .map_err(|e| MigrateError::QueryError(format!("query history: {e}")))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| MigrateError::QueryError(format!("read history: {e}")))?;

        raw.into_iter()
            .map(
                |(id, version, name, applied_at, execution_time_ms, checksum, status, error_message)| {
                    Ok(HistoryEntry {
                        id,
                        version,
                        name,
                        applied_at,
                        execution_time_ms,
                        checksum,
                        status: status.parse()?,
                        error_message,
                    })
                },
            )
            .collect()
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
