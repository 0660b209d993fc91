//! Up command implementation

use anyhow::{Context, Result};

use crate::cli::{GlobalArgs, UpArgs};
use crate::commands::common::{build_engine, load_project, migration_source, open_database};

/// Execute the up command.
pub(crate) fn execute(args: &UpArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let db = open_database(&project)?;
    let source = migration_source(&project);
    let engine = build_engine(&db, &source, &project)?.force(args.force);

    let report = engine
        .up_to(args.to.as_deref())
        .context("Migration failed")?;

    if report.applied.is_empty() {
        println!("No pending migrations.");
        return Ok(());
    }

    println!("Applied {} migration(s):", report.applied.len());
    for version in &report.applied {
        println!("  {version}");
    }
    Ok(())
}

#[cfg(test)]
#[path = "up_test.rs"]
mod tests;
