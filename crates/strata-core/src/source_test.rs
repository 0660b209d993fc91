use super::*;
use tempfile::TempDir;

#[derive(Embed)]
#[folder = "tests/fixtures/migrations/"]
struct FixtureMigrations;

#[test]
fn test_dir_source_lists_nested_entries() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.sql"), "SELECT 1").unwrap();
    fs::create_dir_all(dir.path().join("nested")).unwrap();
    fs::write(dir.path().join("nested/b.sql"), "SELECT 2").unwrap();

    let source = DirSource::new(dir.path());
    let mut entries = source.entries().unwrap();
    entries.sort();
    assert_eq!(entries, vec!["a.sql", "nested/b.sql"]);
    assert_eq!(source.read("nested/b.sql").unwrap(), "SELECT 2");
}

#[test]
fn test_dir_source_missing_root() {
    let dir = TempDir::new().unwrap();
    let source = DirSource::new(dir.path().join("missing"));
    assert!(matches!(
        source.entries().unwrap_err(),
        CoreError::SourceNotFound { .. }
    ));
}

#[test]
fn test_dir_source_unreadable_file() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("bad.sql"), [0xff, 0xfe, 0x00]).unwrap();
    let source = DirSource::new(dir.path());
    let err = source.read("bad.sql").unwrap_err();
    assert!(matches!(err, CoreError::FileFormatError { .. }));
}

#[test]
fn test_bundle_source_reads_inserted_files() {
    let source = BundleSource::new("inline")
        .with_file("20250101000000_init.up.sql", "CREATE TABLE t (id INT);");
    assert_eq!(source.len(), 1);
    assert_eq!(
        source.read("20250101000000_init.up.sql").unwrap(),
        "CREATE TABLE t (id INT);"
    );
    assert!(source.read("nope.sql").is_err());
    assert_eq!(source.describe(), "bundle 'inline'");
}

#[test]
fn test_bundle_source_from_embed() {
    let source = BundleSource::from_embed::<FixtureMigrations>("fixtures");
    let entries = source.entries().unwrap();
    assert!(entries.contains(&"20250101000000_init_schema.up.sql".to_string()));
    assert!(entries.contains(&"20250101000000_init_schema.down.sql".to_string()));
    assert!(source
        .read("20250101000000_init_schema.up.sql")
        .unwrap()
        .contains("CREATE TABLE"));
}
