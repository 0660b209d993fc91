//! Down command implementation

use anyhow::{Context, Result};

use crate::cli::{DownArgs, GlobalArgs};
use crate::commands::common::{build_engine, load_project, migration_source, open_database};

/// Execute the down command.
pub(crate) fn execute(args: &DownArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let db = open_database(&project)?;
    let source = migration_source(&project);
    let engine = build_engine(&db, &source, &project)?.force(args.force);

    match engine.down().context("Rollback failed")? {
        Some(version) => println!("Rolled back {version}."),
        None => println!("No applied migrations to roll back."),
    }
    Ok(())
}

#[cfg(test)]
#[path = "down_test.rs"]
mod tests;
