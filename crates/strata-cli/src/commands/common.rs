//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use strata_core::{Config, DirSource};
use strata_engine::{Engine, MigrationDb};

use crate::cli::GlobalArgs;

/// Project directory plus its effective configuration.
#[derive(Debug)]
pub(crate) struct Project {
    pub(crate) root: PathBuf,
    pub(crate) config: Config,
}

impl Project {
    pub(crate) fn migrations_path(&self) -> PathBuf {
        self.config.migrations_path(&self.root)
    }
}

/// Load the project config, applying `--config` and `--database` overrides.
///
/// A project without a `strata.yml` runs on defaults.
pub(crate) fn load_project(global: &GlobalArgs) -> Result<Project> {
    let root = PathBuf::from(&global.project_dir);
    let mut config = match &global.config {
        Some(path) => Config::load(Path::new(path)),
        None => Config::load_or_default(&root),
    }
    .context("Failed to load configuration")?;

    if let Some(database) = &global.database {
        config.database = database.clone();
        config
            .validate()
            .context("Invalid --database override")?;
    }

    Ok(Project { root, config })
}

/// Open the project's target database.
pub(crate) fn open_database(project: &Project) -> Result<MigrationDb> {
    let path = project.config.database_path(&project.root);
    log::debug!("Opening database {path}");
    MigrationDb::new(&path).with_context(|| format!("Failed to open database: {path}"))
}

/// Script source over the project's migrations directory.
pub(crate) fn migration_source(project: &Project) -> DirSource {
    DirSource::new(project.migrations_path())
}

/// Bind an engine, creating the bookkeeping tables on first use.
pub(crate) fn build_engine<'a>(
    db: &'a MigrationDb,
    source: &'a DirSource,
    project: &Project,
) -> Result<Engine<'a>> {
    Engine::new(db.conn(), source, &project.config)
        .context("Failed to initialize migration state tables")
}

/// Calculate column widths for table output.
///
/// Each width is the maximum of the header length and every cell in that
/// column.
pub(crate) fn calculate_column_widths(headers: &[&str], rows: &[Vec<String>]) -> Vec<usize> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.len());
        }
    }
    widths
}

/// Render a left-aligned table: header, dashed separator, then rows.
/// Columns are separated by two spaces and trailing padding is trimmed.
pub(crate) fn format_table(headers: &[&str], rows: &[Vec<String>]) -> Vec<String> {
    let widths = calculate_column_widths(headers, rows);
    let render = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| format!("{:<width$}", cell, width = w))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(render(headers.to_vec()));
    lines.push(
        widths
            .iter()
            .map(|&w| "-".repeat(w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    for row in rows {
        lines.push(render(row.iter().map(String::as_str).collect()));
    }
    lines
}

/// Print a formatted table to stdout.
pub(crate) fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    for line in format_table(headers, rows) {
        println!("{line}");
    }
}

#[cfg(test)]
#[path = "common_test.rs"]
mod tests;
