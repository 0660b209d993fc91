use super::*;
use tempfile::TempDir;

fn write_config(content: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("strata.yml"), content).unwrap();
    dir
}

#[test]
fn test_defaults_when_fields_omitted() {
    let config: Config = serde_yaml::from_str("{}").unwrap();
    assert_eq!(config.database, "strata.duckdb");
    assert_eq!(config.migrations_dir, "migrations");
    assert_eq!(config.history_table, "strata_migrations");
    assert_eq!(config.version_table, "strata_schema_version");
    assert_eq!(config.splitter, SplitterKind::Naive);
    assert!(!config.strict_checksums);
}

#[test]
fn test_load_from_dir_full_config() {
    let dir = write_config(
        r#"
database: ":memory:"
migrations_dir: db/migrations
history_table: ledger
version_table: pointer
splitter: parsed
strict_checksums: true
"#,
    );
    let config = Config::load_from_dir(dir.path()).unwrap();
    assert_eq!(config.database, ":memory:");
    assert_eq!(config.migrations_dir, "db/migrations");
    assert_eq!(config.history_table, "ledger");
    assert_eq!(config.version_table, "pointer");
    assert_eq!(config.splitter, SplitterKind::Parsed);
    assert!(config.strict_checksums);
}

#[test]
fn test_load_from_dir_accepts_yaml_extension() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("strata.yaml"), "migrations_dir: sql\n").unwrap();
    let config = Config::load_from_dir(dir.path()).unwrap();
    assert_eq!(config.migrations_dir, "sql");
}

#[test]
fn test_missing_config_is_not_found() {
    let dir = TempDir::new().unwrap();
    let err = Config::load_from_dir(dir.path()).unwrap_err();
    assert!(matches!(err, CoreError::ConfigNotFound { .. }));
}

#[test]
fn test_load_or_default_without_file() {
    let dir = TempDir::new().unwrap();
    let config = Config::load_or_default(dir.path()).unwrap();
    assert_eq!(config.migrations_dir, "migrations");
}

#[test]
fn test_unknown_field_rejected() {
    let dir = write_config("migrations_directory: x\n");
    let err = Config::load_from_dir(dir.path()).unwrap_err();
    assert!(matches!(err, CoreError::ConfigParseError { .. }));
}

#[test]
fn test_same_table_names_rejected() {
    let dir = write_config("history_table: t\nversion_table: t\n");
    let err = Config::load_from_dir(dir.path()).unwrap_err();
    assert!(matches!(err, CoreError::ConfigInvalid { .. }));
}

#[test]
fn test_empty_table_name_rejected() {
    let dir = write_config("history_table: \"\"\n");
    let err = Config::load_from_dir(dir.path()).unwrap_err();
    assert!(err.to_string().contains("history_table cannot be empty"));
}

#[test]
fn test_database_path_resolution() {
    let root = Path::new("/srv/app");
    let mut config = Config::default();
    assert_eq!(config.database_path(root), "/srv/app/strata.duckdb");

    config.database = ":memory:".to_string();
    assert_eq!(config.database_path(root), ":memory:");

    config.database = "/var/db/app.duckdb".to_string();
    assert_eq!(config.database_path(root), "/var/db/app.duckdb");
}
