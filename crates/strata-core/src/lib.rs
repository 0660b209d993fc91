//! strata-core - Core library for Strata
//!
//! This crate provides the pieces of the migration engine that never touch a
//! database: configuration parsing, the migration model and its checksum,
//! read-only script sources (directory or embedded bundle), the scanner that
//! pairs up/down scripts by version, and statement splitting.

pub mod checksum;
pub mod config;
pub mod error;
pub mod migration;
pub mod scaffold;
pub mod scanner;
pub mod source;
pub mod splitter;
pub mod sql_utils;

pub use checksum::compute_checksum;
pub use config::{Config, SplitterKind};
pub use error::{CoreError, CoreResult};
pub use migration::{Direction, Migration};
pub use scanner::Scanner;
pub use source::{BundleSource, DirSource, MigrationSource};
pub use splitter::{NaiveSplitter, ParsedSplitter, StatementSplitter};
