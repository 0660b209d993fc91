//! History command implementation

use anyhow::{Context, Result};

use crate::cli::{GlobalArgs, HistoryArgs};
use crate::commands::common::{build_engine, load_project, migration_source, open_database, print_table};

/// Execute the history command.
pub(crate) fn execute(args: &HistoryArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let db = open_database(&project)?;
    let source = migration_source(&project);
    let engine = build_engine(&db, &source, &project)?;

    let entries = engine
        .store()
        .history_entries(args.limit)
        .context("Failed to read migration history")?;

    if args.json {
        let json =
            serde_json::to_string_pretty(&entries).context("Failed to serialize history")?;
        println!("{json}");
        return Ok(());
    }

    if entries.is_empty() {
        println!("No migrations recorded.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = entries
        .iter()
        .map(|e| {
            vec![
                e.version.clone(),
                e.name.clone(),
                e.status.to_string(),
                e.applied_at.clone(),
                format!("{}ms", e.execution_time_ms),
                e.error_message.clone().unwrap_or_default(),
            ]
        })
        .collect();
    print_table(
        &["VERSION", "NAME", "STATUS", "APPLIED AT", "TIME", "ERROR"],
        &rows,
    );
    Ok(())
}

#[cfg(test)]
#[path = "history_test.rs"]
mod tests;
