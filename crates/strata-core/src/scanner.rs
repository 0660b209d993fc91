//! Reconstruct versioned up/down pairs from a migration source.

use crate::error::{CoreError, CoreResult};
use crate::migration::{display_name, Direction, Migration};
use crate::source::MigrationSource;
use regex::Regex;
use std::collections::{BTreeMap, HashSet};
use std::sync::OnceLock;

/// `<14-digit version>_<description>.<up|down>.sql`, matched against the base name.
fn filename_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^([0-9]{14})_([^.]+)\.(up|down)\.sql$").expect("valid regex literal")
    })
}

/// A migration file name split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFileName {
    pub version: String,
    pub description: String,
    pub direction: Direction,
}

/// Parse a base file name; `None` when it does not follow the naming contract.
pub fn parse_file_name(file_name: &str) -> Option<ParsedFileName> {
    let caps = filename_pattern().captures(file_name)?;
    let direction = match &caps[3] {
        "up" => Direction::Up,
        _ => Direction::Down,
    };
    Some(ParsedFileName {
        version: caps[1].to_string(),
        description: caps[2].to_string(),
        direction,
    })
}

#[derive(Default)]
struct PendingPair {
    up: Option<(String, String, String)>,
    down: Option<(String, String, String)>,
}

/// Scans a [`MigrationSource`] for migration pairs.
///
/// Every call reads the source fresh; nothing is cached between scans.
pub struct Scanner<'a> {
    source: &'a dyn MigrationSource,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a dyn MigrationSource) -> Self {
        Self { source }
    }

    /// All migrations in the source, ascending by version.
    pub fn scan(&self) -> CoreResult<Vec<Migration>> {
        let mut pairs: BTreeMap<String, PendingPair> = BTreeMap::new();

        for entry in self.source.entries()? {
            let file_name = entry.rsplit('/').next().unwrap_or(&entry);
            let Some(parsed) = parse_file_name(file_name) else {
                log::debug!("Skipping non-migration file {entry}");
                continue;
            };

            let content = self.source.read(&entry)?;
            let pair = pairs.entry(parsed.version.clone()).or_default();
            let slot = match parsed.direction {
                Direction::Up => &mut pair.up,
                Direction::Down => &mut pair.down,
            };
            if let Some((existing, _, _)) = slot {
                return Err(CoreError::DuplicateMigration {
                    version: parsed.version,
                    direction: parsed.direction.to_string(),
                    first: existing.clone(),
                    second: entry,
                });
            }
            *slot = Some((entry, parsed.description, content));
        }

        let mut migrations = Vec::with_capacity(pairs.len());
        for (version, pair) in pairs {
            let Some((_, description, up)) = pair.up else {
                if let Some((entry, _, _)) = pair.down {
                    log::warn!(
                        "Ignoring {entry} in {}: version {version} has no up script",
                        self.source.describe()
                    );
                }
                continue;
            };
            let down = pair.down.map(|(_, _, content)| content);
            migrations.push(Migration::new(version, display_name(&description), up, down));
        }

        log::debug!(
            "Scanned {} migration(s) from {}",
            migrations.len(),
            self.source.describe()
        );
        Ok(migrations)
    }

    /// Migrations whose version is not in `applied`, ascending by version.
    pub fn scan_pending(&self, applied: &[String]) -> CoreResult<Vec<Migration>> {
        let applied: HashSet<&str> = applied.iter().map(String::as_str).collect();
        Ok(self
            .scan()?
            .into_iter()
            .filter(|m| !applied.contains(m.version.as_str()))
            .collect())
    }

    /// Find a single migration by version.
    pub fn find(&self, version: &str) -> CoreResult<Option<Migration>> {
        Ok(self.scan()?.into_iter().find(|m| m.version == version))
    }
}

#[cfg(test)]
#[path = "scanner_test.rs"]
mod tests;
