//! Migration model: a versioned up/down script pair.

use crate::checksum::migration_checksum;
use crate::error::{CoreError, CoreResult};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Width of a migration version (`YYYYMMDDHHMMSS`)
pub const VERSION_WIDTH: usize = 14;

/// Direction in which a migration script is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Forward schema change
    Up,
    /// Reverse of a previously applied change
    Down,
}

impl Direction {
    /// File suffix / log label for this direction
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One logical schema change discovered by the scanner.
///
/// Immutable once built; only `version`, `name` and `checksum` end up in the
/// ledger, alongside copies of the script text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Migration {
    /// 14-digit timestamp version
    pub version: String,
    /// Human-readable name derived from the file description
    pub name: String,
    /// Forward script
    #[serde(skip_serializing)]
    pub up: String,
    /// Reverse script, absent when the step cannot be rolled back
    #[serde(skip_serializing)]
    pub down: Option<String>,
    /// SHA-256 over `up + down`
    pub checksum: String,
}

impl Migration {
    /// Build a migration and compute its checksum.
    pub fn new(
        version: impl Into<String>,
        name: impl Into<String>,
        up: impl Into<String>,
        down: Option<String>,
    ) -> Self {
        let up = up.into();
        let checksum = migration_checksum(Some(&up), down.as_deref());
        Self {
            version: version.into(),
            name: name.into(),
            up,
            down,
            checksum,
        }
    }

    /// Script body for `direction`, if present
    pub fn script(&self, direction: Direction) -> Option<&str> {
        match direction {
            Direction::Up => Some(self.up.as_str()),
            Direction::Down => self.down.as_deref(),
        }
    }

    /// First 8 characters of the checksum, for display
    pub fn short_checksum(&self) -> &str {
        short_checksum(&self.checksum)
    }
}

/// Truncate a checksum to its 8-character display prefix.
pub fn short_checksum(checksum: &str) -> &str {
    checksum.get(..8).unwrap_or(checksum)
}

/// Convert a file description (`add_user_index`) to a display name (`add user index`).
pub fn display_name(description: &str) -> String {
    description.replace('_', " ")
}

/// Check that `version` is exactly 14 ASCII digits.
pub fn validate_version(version: &str) -> CoreResult<()> {
    if version.len() == VERSION_WIDTH && version.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(CoreError::InvalidVersion {
            version: version.to_string(),
        })
    }
}

/// Version string for a migration created at `at`.
pub fn version_at(at: DateTime<Utc>) -> String {
    at.format("%Y%m%d%H%M%S").to_string()
}

/// Version string for a migration created now.
pub fn new_version() -> String {
    version_at(Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_script_by_direction() {
        let m = Migration::new("20250101000000", "init", "CREATE TABLE t (id INT)", None);
        assert_eq!(m.script(Direction::Up), Some("CREATE TABLE t (id INT)"));
        assert_eq!(m.script(Direction::Down), None);
    }

    #[test]
    fn test_short_checksum_is_eight_chars() {
        let m = Migration::new("20250101000000", "init", "SELECT 1", Some("SELECT 2".into()));
        assert_eq!(m.short_checksum().len(), 8);
        assert!(m.checksum.starts_with(m.short_checksum()));
        assert_eq!(short_checksum("abc"), "abc");
    }

    #[test]
    fn test_validate_version() {
        assert!(validate_version("20250101000000").is_ok());
        assert!(validate_version("2025010100000").is_err());
        assert!(validate_version("2025010100000x").is_err());
    }

    #[test]
    fn test_version_at_formats_fixed_width() {
        let at = Utc.with_ymd_and_hms(2025, 3, 7, 9, 5, 1).unwrap();
        assert_eq!(version_at(at), "20250307090501");
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("init_schema"), "init schema");
    }
}
