//! Apply one migration script inside a single transaction.
//!
//! Sequence for an attempt:
//! 1. mark the pointer dirty (committed on its own, before any migration SQL)
//! 2. `BEGIN`, run every statement, `COMMIT`
//! 3. append the ledger row and move the pointer back to clean
//!
//! Any failure in step 2 rolls the transaction back, appends a `failed` ledger
//! row, and leaves the pointer dirty for an operator to inspect.

use crate::connection::{begin, commit, rollback};
use crate::error::{MigrateError, MigrateResult};
use crate::store::{LedgerStatus, MigrationRecord, StateStore};
use duckdb::Connection;
use std::time::Instant;
use strata_core::{Direction, Migration, StatementSplitter};

/// Result of a successful execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOutcome {
    pub version: String,
    pub direction: Direction,
    pub statements: usize,
    pub execution_time_ms: i64,
}

/// Runs migration scripts against `conn`, bookkeeping through `store`.
pub struct Executor<'a> {
    conn: &'a Connection,
    store: &'a StateStore<'a>,
    splitter: &'a dyn StatementSplitter,
}

impl<'a> Executor<'a> {
    pub fn new(
        conn: &'a Connection,
        store: &'a StateStore<'a>,
        splitter: &'a dyn StatementSplitter,
    ) -> Self {
        Self {
            conn,
            store,
            splitter,
        }
    }

    /// Apply `migration` in `direction`.
    pub fn execute(
        &self,
        migration: &Migration,
        direction: Direction,
    ) -> MigrateResult<ExecutionOutcome> {
        let script = migration
            .script(direction)
            .ok_or_else(|| MigrateError::ScriptMissing {
                version: migration.version.clone(),
                direction,
            })?;

        self.check_state(migration, direction)?;

        // A script the splitter rejects never starts an attempt.
        let statements = self.splitter.split(script)?;

        self.store.set_version(&migration.version, true)?;
        let started = Instant::now();

        if let Err(e) = begin(self.conn) {
            self.record_failure(migration, started, &e.to_string());
            return Err(e);
        }

        for (i, statement) in statements.iter().enumerate() {
            log::debug!(
                "{} {} statement {}/{}: {}",
                migration.version,
                direction,
                i + 1,
                statements.len(),
                statement
            );
            if let Err(e) = self.conn.execute_batch(statement) {
                rollback(self.conn);
                let message = e.to_string();
                self.record_failure(migration, started, &message);
                return Err(MigrateError::StatementExecution {
                    version: migration.version.clone(),
                    index: i + 1,
                    message,
                });
            }
        }

        if let Err(e) = commit(self.conn) {
            rollback(self.conn);
            let message = e.to_string();
            self.record_failure(migration, started, &message);
            return Err(MigrateError::Commit {
                version: migration.version.clone(),
                message,
            });
        }

        let execution_time_ms = elapsed_ms(started);
        let status = match direction {
            Direction::Up => LedgerStatus::Success,
            Direction::Down => LedgerStatus::RolledBack,
        };
        self.store.record_migration(&MigrationRecord::for_migration(
            migration,
            status,
            execution_time_ms,
            None,
        ))?;

        match direction {
            Direction::Up => self.store.set_version(&migration.version, false)?,
            Direction::Down => match self.store.applied_versions()?.last() {
                Some(previous) => self.store.set_version(previous, false)?,
                None => self.store.clear_version()?,
            },
        }

        Ok(ExecutionOutcome {
            version: migration.version.clone(),
            direction,
            statements: statements.len(),
            execution_time_ms,
        })
    }

    /// Up only for unapplied versions; down only for applied ones or the
    /// version the dirty pointer is stuck on.
    fn check_state(&self, migration: &Migration, direction: Direction) -> MigrateResult<()> {
        let applied = self.store.is_applied(&migration.version)?;
        match direction {
            Direction::Up if applied => Err(MigrateError::AlreadyApplied {
                version: migration.version.clone(),
            }),
            Direction::Down if !applied => {
                let stuck_here = self
                    .store
                    .current_version()?
                    .is_some_and(|p| p.dirty && p.version == migration.version);
                if stuck_here {
                    Ok(())
                } else {
                    Err(MigrateError::NotApplied {
                        version: migration.version.clone(),
                    })
                }
            }
            _ => Ok(()),
        }
    }

    /// Append the `failed` ledger row. The original error is what the caller
    /// needs to see, so a bookkeeping failure here is only logged.
    fn record_failure(&self, migration: &Migration, started: Instant, message: &str) {
        let record = MigrationRecord::for_migration(
            migration,
            LedgerStatus::Failed,
            elapsed_ms(started),
            Some(message),
        );
        if let Err(e) = self.store.record_migration(&record) {
            log::error!(
                "Failed to record failure of migration {}: {e}",
                migration.version
            );
        }
    }
}

fn elapsed_ms(started: Instant) -> i64 {
    i64::try_from(started.elapsed().as_millis()).unwrap_or(i64::MAX)
}

#[cfg(test)]
#[path = "executor_test.rs"]
mod tests;
