//! Tests for the ledger and pointer tables.

use super::*;
use crate::MigrationDb;

// ── Helpers ────────────────────────────────────────────────────────────

fn count(db: &MigrationDb, sql: &str) -> i64 {
    db.conn()
        .query_row(sql, [], |row| row.get::<_, i64>(0))
        .unwrap()
}

fn store(db: &MigrationDb) -> StateStore<'_> {
    let store = StateStore::new(db.conn(), "strata_migrations", "strata_schema_version");
    store.initialize().unwrap();
    store
}

fn record<'a>(version: &'a str, status: LedgerStatus) -> MigrationRecord<'a> {
    MigrationRecord {
        version,
        name: "test",
        up_script: "SELECT 1",
        down_script: None,
        checksum: "abc123",
        execution_time_ms: 3,
        status,
        error_message: None,
    }
}

// ── Initialization ─────────────────────────────────────────────────────

#[test]
fn initialize_is_idempotent() {
    let db = MigrationDb::open_memory().unwrap();
    let store = store(&db);
    store.record_migration(&record("20250101000000", LedgerStatus::Success)).unwrap();
    store.initialize().unwrap();
    assert_eq!(count(&db, "SELECT COUNT(*) FROM strata_migrations"), 1);
}

#[test]
fn initialize_creates_schema_for_qualified_tables() {
    let db = MigrationDb::open_memory().unwrap();
    let store = StateStore::new(db.conn(), "meta.ledger", "meta.pointer");
    store.initialize().unwrap();
    store.set_version("20250101000000", false).unwrap();
    assert_eq!(count(&db, "SELECT COUNT(*) FROM meta.pointer"), 1);
    assert_eq!(count(&db, "SELECT COUNT(*) FROM meta.ledger"), 0);
}

// ── Pointer ────────────────────────────────────────────────────────────

#[test]
fn current_version_none_when_fresh() {
    let db = MigrationDb::open_memory().unwrap();
    assert_eq!(store(&db).current_version().unwrap(), None);
}

#[test]
fn set_version_keeps_single_row() {
    let db = MigrationDb::open_memory().unwrap();
    let store = store(&db);
    store.set_version("20250101000000", true).unwrap();
    store.set_version("20250101000000", false).unwrap();
    store.set_version("20250102000000", true).unwrap();

    assert_eq!(count(&db, "SELECT COUNT(*) FROM strata_schema_version"), 1);
    let current = store.current_version().unwrap().unwrap();
    assert_eq!(current.version, "20250102000000");
    assert!(current.dirty);
    assert!(!current.updated_at.is_empty());
}

#[test]
fn clear_version_removes_pointer() {
    let db = MigrationDb::open_memory().unwrap();
    let store = store(&db);
    store.set_version("20250101000000", false).unwrap();
    store.clear_version().unwrap();
    assert_eq!(store.current_version().unwrap(), None);
}

// ── Ledger ─────────────────────────────────────────────────────────────

#[test]
fn applied_versions_only_counts_success() {
    let db = MigrationDb::open_memory().unwrap();
    let store = store(&db);
    store.record_migration(&record("20250102000000", LedgerStatus::Success)).unwrap();
    store.record_migration(&record("20250101000000", LedgerStatus::Success)).unwrap();
    store.record_migration(&record("20250103000000", LedgerStatus::Failed)).unwrap();

    assert_eq!(
        store.applied_versions().unwrap(),
        vec!["20250101000000", "20250102000000"]
    );
    assert!(store.is_applied("20250101000000").unwrap());
    assert!(!store.is_applied("20250103000000").unwrap());
}

#[test]
fn rolled_back_row_unapplies_version() {
    let db = MigrationDb::open_memory().unwrap();
    let store = store(&db);
    store.record_migration(&record("20250101000000", LedgerStatus::Success)).unwrap();
    store.record_migration(&record("20250101000000", LedgerStatus::RolledBack)).unwrap();
    assert!(!store.is_applied("20250101000000").unwrap());

    store.record_migration(&record("20250101000000", LedgerStatus::Success)).unwrap();
    assert!(store.is_applied("20250101000000").unwrap());
}

#[test]
fn failed_down_keeps_version_applied() {
    let db = MigrationDb::open_memory().unwrap();
    let store = store(&db);
    store.record_migration(&record("20250101000000", LedgerStatus::Success)).unwrap();
    store.record_migration(&record("20250101000000", LedgerStatus::Failed)).unwrap();
    assert!(store.is_applied("20250101000000").unwrap());
}

#[test]
fn history_is_newest_first_with_error_message() {
    let db = MigrationDb::open_memory().unwrap();
    let store = store(&db);
    store.record_migration(&record("20250101000000", LedgerStatus::Success)).unwrap();
    let mut failed = record("20250102000000", LedgerStatus::Failed);
    failed.error_message = Some("Binder Error: column missing");
    store.record_migration(&failed).unwrap();

    let history = store.history_entries(None).unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].version, "20250102000000");
    assert_eq!(history[0].status, LedgerStatus::Failed);
    assert_eq!(
        history[0].error_message.as_deref(),
        Some("Binder Error: column missing")
    );
    assert!(history[0].id > history[1].id);

    assert_eq!(store.history_entries(Some(1)).unwrap().len(), 1);
}

#[test]
fn last_success_returns_latest_checksum() {
    let db = MigrationDb::open_memory().unwrap();
    let store = store(&db);
    assert!(store.last_success("20250101000000").unwrap().is_none());

    store.record_migration(&record("20250101000000", LedgerStatus::Success)).unwrap();
    let mut second = record("20250101000000", LedgerStatus::Success);
    second.checksum = "def456";
    store.record_migration(&second).unwrap();

    let entry = store.last_success("20250101000000").unwrap().unwrap();
    assert_eq!(entry.checksum, "def456");
}

#[test]
fn ledger_stores_script_copies() {
    let db = MigrationDb::open_memory().unwrap();
    let store = store(&db);
    let mut rec = record("20250101000000", LedgerStatus::Success);
    rec.down_script = Some("DROP TABLE t");
    store.record_migration(&rec).unwrap();

    let (up, down): (String, Option<String>) = db
        .conn()
        .query_row(
            "SELECT up_script, down_script FROM strata_migrations",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert_eq!(up, "SELECT 1");
    assert_eq!(down.as_deref(), Some("DROP TABLE t"));
}

#[test]
fn ledger_status_round_trips_through_str() {
    for status in [
        LedgerStatus::Success,
        LedgerStatus::Failed,
        LedgerStatus::RolledBack,
    ] {
        assert_eq!(status.as_str().parse::<LedgerStatus>().unwrap(), status);
    }
    assert!("pending".parse::<LedgerStatus>().is_err());
}
