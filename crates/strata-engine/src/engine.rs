//! Orchestration: `up`, `down` and `status` over a source and a database.

use crate::error::{MigrateError, MigrateResult};
use crate::executor::Executor;
use crate::store::{SchemaVersion, StateStore};
use duckdb::Connection;
use serde::Serialize;
use strata_core::splitter::splitter_for;
use strata_core::{Config, Direction, Migration, MigrationSource, Scanner, StatementSplitter};

/// Behaviour switches for [`Engine`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineOptions {
    /// Proceed even though the schema pointer is dirty
    pub force: bool,
    /// Refuse `up` when an applied migration's checksum changed
    pub strict_checksums: bool,
}

/// An applied migration whose script no longer matches the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChecksumDrift {
    pub version: String,
    pub recorded: String,
    pub current: String,
}

/// Consolidated view of the schema state.
#[derive(Debug, Clone, Serialize)]
pub struct Status {
    /// Current version, empty when nothing is applied
    pub current_version: String,
    pub dirty: bool,
    pub applied: Vec<String>,
    pub pending: Vec<Migration>,
    /// Number of migrations in the source
    pub total: usize,
    pub drifted: Vec<ChecksumDrift>,
}

/// Versions applied by one `up` call, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpReport {
    pub applied: Vec<String>,
}

/// Applies migrations from `source` to the database behind `conn`.
///
/// Only one engine may run `up`/`down` against a database at a time; callers
/// are responsible for serializing invocations across processes.
pub struct Engine<'a> {
    source: &'a dyn MigrationSource,
    store: StateStore<'a>,
    conn: &'a Connection,
    splitter: Box<dyn StatementSplitter>,
    options: EngineOptions,
}

impl<'a> Engine<'a> {
    /// Bind an engine to `conn` and `source`, creating the bookkeeping tables
    /// if needed.
    pub fn new(
        conn: &'a Connection,
        source: &'a dyn MigrationSource,
        config: &Config,
    ) -> MigrateResult<Self> {
        let store = StateStore::from_config(conn, config);
        store.initialize()?;
        Ok(Self {
            source,
            store,
            conn,
            splitter: splitter_for(config.splitter),
            options: EngineOptions {
                force: false,
                strict_checksums: config.strict_checksums,
            },
        })
    }

    /// Acknowledge a dirty schema pointer and proceed anyway.
    pub fn force(mut self, force: bool) -> Self {
        self.options.force = force;
        self
    }

    pub fn with_options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_splitter(mut self, splitter: Box<dyn StatementSplitter>) -> Self {
        self.splitter = splitter;
        self
    }

    pub fn store(&self) -> &StateStore<'a> {
        &self.store
    }

    fn scanner(&self) -> Scanner<'_> {
        Scanner::new(self.source)
    }

    fn executor(&self) -> Executor<'_> {
        Executor::new(self.conn, &self.store, self.splitter.as_ref())
    }

    /// Apply every pending migration in version order.
    pub fn up(&self) -> MigrateResult<UpReport> {
        self.up_to(None)
    }

    /// Apply pending migrations up to and including `target`.
    ///
    /// Stops at the first failure; migrations applied before it stay applied.
    pub fn up_to(&self, target: Option<&str>) -> MigrateResult<UpReport> {
        let dirty = self.store.current_version()?.filter(|p| p.dirty);
        if let Some(pointer) = &dirty {
            self.check_dirty(pointer)?;
        }
        let migrations = self.scanner().scan()?;
        let applied = self.store.applied_versions()?;

        if let Some(target) = target {
            if !migrations.iter().any(|m| m.version == target) {
                return Err(MigrateError::MigrationNotFound {
                    version: target.to_string(),
                    location: self.source.describe(),
                });
            }
        }

        if self.options.strict_checksums {
            if let Some(drift) = self.drifted(&migrations, &applied)?.into_iter().next() {
                return Err(MigrateError::ChecksumDrift {
                    version: drift.version,
                    recorded: drift.recorded,
                    current: drift.current,
                });
            }
        }

        let pending: Vec<&Migration> = migrations
            .iter()
            .filter(|m| !applied.contains(&m.version))
            .filter(|m| target.map_or(true, |t| m.version.as_str() <= t))
            .collect();

        if let Some(pointer) = dirty {
            if applied.contains(&pointer.version) {
                // The ledger confirms this version; only the clean write was lost.
                self.store.set_version(&pointer.version, false)?;
            } else if !pending.iter().any(|m| m.version == pointer.version) {
                self.reset_pointer(&applied)?;
            }
        }

        if pending.is_empty() {
            log::info!("No pending migrations");
            return Ok(UpReport::default());
        }

        let executor = self.executor();
        let mut report = UpReport::default();
        for migration in pending {
            log::info!("Applying {} {}", migration.version, migration.name);
            let outcome = executor.execute(migration, Direction::Up)?;
            log::info!(
                "Applied {} ({} statement(s), {} ms)",
                outcome.version,
                outcome.statements,
                outcome.execution_time_ms
            );
            report.applied.push(outcome.version);
        }
        Ok(report)
    }

    /// Roll back the current version, one step only.
    ///
    /// Returns the rolled-back version, or `None` when nothing is applied.
    pub fn down(&self) -> MigrateResult<Option<String>> {
        let Some(pointer) = self.store.current_version()? else {
            log::info!("No applied migrations to roll back");
            return Ok(None);
        };
        if pointer.dirty {
            self.check_dirty(&pointer)?;
        }

        let migration = self.scanner().find(&pointer.version)?.ok_or_else(|| {
            MigrateError::MigrationNotFound {
                version: pointer.version.clone(),
                location: self.source.describe(),
            }
        })?;
        if migration.down.is_none() {
            return Err(MigrateError::ScriptMissing {
                version: migration.version,
                direction: Direction::Down,
            });
        }

        log::info!("Rolling back {} {}", migration.version, migration.name);
        let outcome = self.executor().execute(&migration, Direction::Down)?;
        log::info!(
            "Rolled back {} ({} statement(s), {} ms)",
            outcome.version,
            outcome.statements,
            outcome.execution_time_ms
        );
        Ok(Some(outcome.version))
    }

    /// Current version, dirty flag, applied and pending migrations. Read-only.
    pub fn status(&self) -> MigrateResult<Status> {
        let pointer = self.store.current_version()?;
        let migrations = self.scanner().scan()?;
        let applied = self.store.applied_versions()?;
        let drifted = self.drifted(&migrations, &applied)?;
        let total = migrations.len();
        let pending = migrations
            .into_iter()
            .filter(|m| !applied.contains(&m.version))
            .collect();

        let (current_version, dirty) = match pointer {
            Some(p) => (p.version, p.dirty),
            None => (String::new(), false),
        };
        Ok(Status {
            current_version,
            dirty,
            applied,
            pending,
            total,
            drifted,
        })
    }

    fn check_dirty(&self, pointer: &SchemaVersion) -> MigrateResult<()> {
        if !self.options.force {
            return Err(MigrateError::Dirty {
                version: pointer.version.clone(),
            });
        }
        log::warn!(
            "Proceeding past dirty schema version {} (forced)",
            pointer.version
        );
        Ok(())
    }

    fn reset_pointer(&self, applied: &[String]) -> MigrateResult<()> {
        match applied.last() {
            Some(version) => self.store.set_version(version, false),
            None => self.store.clear_version(),
        }
    }

    fn drifted(
        &self,
        migrations: &[Migration],
        applied: &[String],
    ) -> MigrateResult<Vec<ChecksumDrift>> {
        let mut drifted = Vec::new();
        for migration in migrations.iter().filter(|m| applied.contains(&m.version)) {
            let Some(entry) = self.store.last_success(&migration.version)? else {
                continue;
            };
            if entry.checksum != migration.checksum {
                log::warn!(
                    "Migration {} changed since it was applied",
                    migration.version
                );
                drifted.push(ChecksumDrift {
                    version: migration.version.clone(),
                    recorded: entry.checksum,
                    current: migration.checksum.clone(),
                });
            }
        }
        Ok(drifted)
    }
}

#[cfg(test)]
#[path = "engine_test.rs"]
mod tests;
