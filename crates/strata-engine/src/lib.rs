//! strata-engine - Schema migrations against DuckDB
//!
//! [`Engine`] applies pending migrations in version order, rolls back the most
//! recent one, and reports status. Bookkeeping lives in two tables inside the
//! migrated database: an append-only ledger of every attempt and a single-row
//! pointer holding the current version and its dirty flag.
//!
//! The engine assumes a single writer. Callers must serialize `up`/`down`
//! runs against a given database; nothing here takes a cross-process lock.

pub mod connection;
pub mod engine;
pub mod error;
pub mod executor;
pub mod store;

pub use connection::MigrationDb;
pub use engine::{ChecksumDrift, Engine, EngineOptions, Status, UpReport};
pub use error::{MigrateError, MigrateResult};
pub use executor::{ExecutionOutcome, Executor};
pub use store::{HistoryEntry, LedgerStatus, MigrationRecord, SchemaVersion, StateStore};
