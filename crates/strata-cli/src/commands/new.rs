//! New command implementation

use anyhow::{Context, Result};
use strata_core::scaffold::create_migration;

use crate::cli::{GlobalArgs, NewArgs};
use crate::commands::common::load_project;

/// Execute the new command.
pub(crate) fn execute(args: &NewArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let dir = project.migrations_path();

    let created = create_migration(&dir, &args.name, !args.no_down)
        .with_context(|| format!("Failed to create migration in {}", dir.display()))?;

    println!("Created {}", created.up_path.display());
    if let Some(down_path) = &created.down_path {
        println!("Created {}", down_path.display());
    }
    Ok(())
}

#[cfg(test)]
#[path = "new_test.rs"]
mod tests;
