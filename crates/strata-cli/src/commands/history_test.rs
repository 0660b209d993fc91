use super::*;
use crate::cli::UpArgs;
use crate::commands::up;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_history_lists_attempts() {
    let temp = tempdir().unwrap();
    let migrations = temp.path().join("migrations");
    fs::create_dir_all(&migrations).unwrap();
    fs::write(
        migrations.join("20250101000000_create_a.up.sql"),
        "CREATE TABLE a (id INTEGER);",
    )
    .unwrap();

    let global = GlobalArgs {
        verbose: false,
        project_dir: temp.path().display().to_string(),
        config: None,
        database: None,
    };
    up::execute(
        &UpArgs {
            force: false,
            to: None,
        },
        &global,
    )
    .unwrap();

    execute(
        &HistoryArgs {
            limit: None,
            json: false,
        },
        &global,
    )
    .unwrap();
    execute(
        &HistoryArgs {
            limit: Some(1),
            json: true,
        },
        &global,
    )
    .unwrap();
}

#[test]
fn test_history_on_fresh_database() {
    let temp = tempdir().unwrap();
    fs::create_dir_all(temp.path().join("migrations")).unwrap();
    let global = GlobalArgs {
        verbose: false,
        project_dir: temp.path().display().to_string(),
        config: None,
        database: Some(":memory:".to_string()),
    };

    execute(
        &HistoryArgs {
            limit: None,
            json: false,
        },
        &global,
    )
    .unwrap();
}
