use super::*;
use crate::cli::UpArgs;
use crate::commands::up;
use std::fs;
use std::path::Path;
use strata_engine::MigrationDb;
use tempfile::{tempdir, TempDir};

fn project() -> TempDir {
    let temp = tempdir().unwrap();
    let migrations = temp.path().join("migrations");
    fs::create_dir_all(&migrations).unwrap();
    fs::write(
        migrations.join("20250101000000_create_a.up.sql"),
        "CREATE TABLE a (id INTEGER);",
    )
    .unwrap();
    fs::write(
        migrations.join("20250101000000_create_a.down.sql"),
        "DROP TABLE a;",
    )
    .unwrap();
    fs::write(
        migrations.join("20250102000000_create_b.up.sql"),
        "CREATE TABLE b (id INTEGER);",
    )
    .unwrap();
    fs::write(
        migrations.join("20250102000000_create_b.down.sql"),
        "DROP TABLE b;",
    )
    .unwrap();
    temp
}

fn global_for(dir: &Path) -> GlobalArgs {
    GlobalArgs {
        verbose: false,
        project_dir: dir.display().to_string(),
        config: None,
        database: None,
    }
}

fn current_version(dir: &Path) -> Option<String> {
    let db = MigrationDb::open(&dir.join("strata.duckdb")).unwrap();
    let mut stmt = db
        .conn()
        .prepare("SELECT version FROM strata_schema_version")
        .unwrap();
    let versions: Vec<String> = stmt
        .query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    versions.into_iter().next()
}

#[test]
fn test_down_rolls_back_one_step() {
    let temp = project();
    let global = global_for(temp.path());
    up::execute(
        &UpArgs {
            force: false,
            to: None,
        },
        &global,
    )
    .unwrap();

    execute(&DownArgs { force: false }, &global).unwrap();
    assert_eq!(current_version(temp.path()).as_deref(), Some("20250101000000"));

    execute(&DownArgs { force: false }, &global).unwrap();
    assert_eq!(current_version(temp.path()), None);
}

#[test]
fn test_down_with_nothing_applied_succeeds() {
    let temp = project();
    execute(&DownArgs { force: false }, &global_for(temp.path())).unwrap();
    assert_eq!(current_version(temp.path()), None);
}

#[test]
fn test_down_without_script_fails() {
    let temp = project();
    fs::remove_file(temp.path().join("migrations/20250102000000_create_b.down.sql")).unwrap();
    let global = global_for(temp.path());
    up::execute(
        &UpArgs {
            force: false,
            to: None,
        },
        &global,
    )
    .unwrap();

    let err = execute(&DownArgs { force: false }, &global).unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("Rollback failed"));
    assert!(message.contains("[M002]"));
    assert_eq!(current_version(temp.path()).as_deref(), Some("20250102000000"));
}
