//! Create new, empty migration script pairs on disk.

use crate::error::{CoreError, CoreResult};
use crate::migration::new_version;
use std::fs;
use std::path::{Path, PathBuf};

/// Files written by [`create_migration`].
#[derive(Debug, Clone)]
pub struct ScaffoldedMigration {
    pub version: String,
    pub up_path: PathBuf,
    pub down_path: Option<PathBuf>,
}

/// Normalize a user-supplied name into a filename description.
///
/// Lowercases, turns whitespace and dashes into underscores, and rejects
/// anything the scanner's filename pattern would not accept.
pub fn normalize_name(name: &str) -> CoreResult<String> {
    let normalized: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_whitespace() || c == '-' { '_' } else { c })
        .collect();

    if normalized.is_empty() {
        return Err(CoreError::InvalidName {
            name: name.to_string(),
            reason: "name cannot be empty".to_string(),
        });
    }
    if normalized.contains('.') || normalized.contains('/') || normalized.contains('\\') {
        return Err(CoreError::InvalidName {
            name: name.to_string(),
            reason: "name cannot contain '.', '/' or '\\'".to_string(),
        });
    }
    Ok(normalized)
}

/// Write `<version>_<name>.up.sql` (and `.down.sql` unless `with_down` is
/// false) into `dir`, creating the directory if needed.
pub fn create_migration(dir: &Path, name: &str, with_down: bool) -> CoreResult<ScaffoldedMigration> {
    create_migration_with_version(dir, &new_version(), name, with_down)
}

/// Same as [`create_migration`] with an explicit version.
pub fn create_migration_with_version(
    dir: &Path,
    version: &str,
    name: &str,
    with_down: bool,
) -> CoreResult<ScaffoldedMigration> {
    crate::migration::validate_version(version)?;
    let description = normalize_name(name)?;
    fs::create_dir_all(dir)?;

    let up_path = dir.join(format!("{version}_{description}.up.sql"));
    write_new(&up_path, &format!("-- {description} (up)\n"))?;

    let down_path = if with_down {
        let path = dir.join(format!("{version}_{description}.down.sql"));
        write_new(&path, &format!("-- {description} (down)\n"))?;
        Some(path)
    } else {
        None
    };

    log::info!("Created migration {version}_{description}");
    Ok(ScaffoldedMigration {
        version: version.to_string(),
        up_path,
        down_path,
    })
}

fn write_new(path: &Path, content: &str) -> CoreResult<()> {
    if path.exists() {
        return Err(CoreError::InvalidName {
            name: path.display().to_string(),
            reason: "file already exists".to_string(),
        });
    }
    fs::write(path, content)?;
    Ok(())
}
