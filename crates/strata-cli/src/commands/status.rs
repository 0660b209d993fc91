//! Status command implementation

use anyhow::{Context, Result};
use strata_engine::Status;

use crate::cli::{GlobalArgs, StatusArgs};
use crate::commands::common::{
    build_engine, format_table, load_project, migration_source, open_database,
};

/// Execute the status command.
pub(crate) fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let db = open_database(&project)?;
    let source = migration_source(&project);
    let engine = build_engine(&db, &source, &project)?;

    let status = engine.status().context("Failed to read migration status")?;

    if args.json {
        let json =
            serde_json::to_string_pretty(&status).context("Failed to serialize status")?;
        println!("{json}");
    } else {
        for line in render_status(&status) {
            println!("{line}");
        }
    }
    Ok(())
}

/// Human-readable status report.
pub(crate) fn render_status(status: &Status) -> Vec<String> {
    let mut lines = Vec::new();

    if status.dirty {
        lines.push(format!(
            "WARNING: schema is dirty at version {}. A migration failed or was interrupted; \
             repair the database, then re-run with --force.",
            status.current_version
        ));
        lines.push(String::new());
    }

    let current = if status.current_version.is_empty() {
        "none"
    } else {
        status.current_version.as_str()
    };
    lines.push(format!("Current version: {current}"));
    lines.push(format!("Dirty:           {}", if status.dirty { "yes" } else { "no" }));
    lines.push(format!(
        "Applied: {}  Pending: {}  Total: {}",
        status.applied.len(),
        status.pending.len(),
        status.total
    ));

    if !status.pending.is_empty() {
        lines.push(String::new());
        let rows: Vec<Vec<String>> = status
            .pending
            .iter()
            .map(|m| {
                vec![
                    m.version.clone(),
                    m.name.clone(),
                    m.short_checksum().to_string(),
                ]
            })
            .collect();
        lines.extend(format_table(&["VERSION", "NAME", "CHECKSUM"], &rows));
    }

    for drift in &status.drifted {
        lines.push(String::new());
        lines.push(format!(
            "WARNING: migration {} changed since it was applied (recorded {}, now {})",
            drift.version,
            strata_core::migration::short_checksum(&drift.recorded),
            strata_core::migration::short_checksum(&drift.current),
        ));
    }

    lines
}

#[cfg(test)]
#[path = "status_test.rs"]
mod tests;
