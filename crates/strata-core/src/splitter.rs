//! Splitting migration scripts into individual statements.
//!
//! [`NaiveSplitter`] cuts on every `;`. That is wrong for scripts with a `;`
//! inside a string literal, a comment, or a procedural body; such scripts need
//! [`ParsedSplitter`] (selected with `splitter: parsed` in strata.yml).

use crate::config::SplitterKind;
use crate::error::{CoreError, CoreResult};
use sqlparser::dialect::DuckDbDialect;
use sqlparser::parser::Parser;

/// Turns a script body into the statements executed, in order.
pub trait StatementSplitter {
    fn split(&self, script: &str) -> CoreResult<Vec<String>>;

    /// Name used in logs
    fn name(&self) -> &'static str;
}

/// Split on bare `;`.
///
/// Fragments that are blank or contain only `--` comment lines are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct NaiveSplitter;

impl StatementSplitter for NaiveSplitter {
    fn split(&self, script: &str) -> CoreResult<Vec<String>> {
        Ok(script
            .split(';')
            .map(str::trim)
            .filter(|fragment| has_code(fragment))
            .map(str::to_string)
            .collect())
    }

    fn name(&self) -> &'static str {
        "naive"
    }
}

fn has_code(fragment: &str) -> bool {
    fragment.lines().any(|line| {
        let line = line.trim();
        !line.is_empty() && !line.starts_with("--")
    })
}

/// Parse the script with sqlparser's DuckDB dialect and re-render each statement.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParsedSplitter;

impl StatementSplitter for ParsedSplitter {
    fn split(&self, script: &str) -> CoreResult<Vec<String>> {
        let statements =
            Parser::parse_sql(&DuckDbDialect {}, script).map_err(|e| CoreError::SqlParse {
                message: e.to_string(),
            })?;
        Ok(statements.iter().map(ToString::to_string).collect())
    }

    fn name(&self) -> &'static str {
        "parsed"
    }
}

/// Splitter selected by configuration
pub fn splitter_for(kind: SplitterKind) -> Box<dyn StatementSplitter> {
    match kind {
        SplitterKind::Naive => Box::new(NaiveSplitter),
        SplitterKind::Parsed => Box::new(ParsedSplitter),
    }
}

#[cfg(test)]
#[path = "splitter_test.rs"]
mod tests;
