//! Read-only collections of migration scripts.
//!
//! The scanner only needs to list entries and read them by name, so a source
//! can be a directory on disk or a bundle of blobs compiled into the binary.

use crate::error::{CoreError, CoreResult};
use rust_embed::Embed;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A named, read-only collection of text files.
pub trait MigrationSource {
    /// List every entry as a `/`-separated path relative to the source root.
    fn entries(&self) -> CoreResult<Vec<String>>;

    /// Read an entry previously returned by [`entries`](Self::entries).
    fn read(&self, entry: &str) -> CoreResult<String>;

    /// Short description for logs and error messages
    fn describe(&self) -> String;
}

/// Migration scripts stored in a directory on disk.
///
/// Subdirectories are walked recursively.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn walk(&self, dir: &Path, prefix: &str, out: &mut Vec<String>) -> CoreResult<()> {
        let entries = fs::read_dir(dir).map_err(|e| CoreError::FileFormatError {
            path: dir.display().to_string(),
            source: e,
        })?;

        for entry in entries {
            let entry = entry?;
            let file_name = entry.file_name().to_string_lossy().into_owned();
            let relative = if prefix.is_empty() {
                file_name
            } else {
                format!("{prefix}/{file_name}")
            };

            let file_type = entry.file_type()?;
            if file_type.is_dir() {
                self.walk(&entry.path(), &relative, out)?;
            } else {
                out.push(relative);
            }
        }
        Ok(())
    }
}

impl MigrationSource for DirSource {
    fn entries(&self) -> CoreResult<Vec<String>> {
        if !self.root.is_dir() {
            return Err(CoreError::SourceNotFound {
                path: self.root.display().to_string(),
            });
        }
        let mut out = Vec::new();
        self.walk(&self.root, "", &mut out)?;
        Ok(out)
    }

    fn read(&self, entry: &str) -> CoreResult<String> {
        let path = self.root.join(entry);
        fs::read_to_string(&path).map_err(|e| CoreError::FileFormatError {
            path: path.display().to_string(),
            source: e,
        })
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

/// Migration scripts held in memory, typically embedded at compile time.
#[derive(Debug, Clone, Default)]
pub struct BundleSource {
    name: String,
    files: BTreeMap<String, Cow<'static, [u8]>>,
}

impl BundleSource {
    /// An empty bundle called `name`
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            files: BTreeMap::new(),
        }
    }

    /// Add (or replace) a file
    pub fn with_file(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.insert(path, content);
        self
    }

    pub fn insert(&mut self, path: impl Into<String>, content: impl Into<String>) {
        self.files
            .insert(path.into(), Cow::Owned(content.into().into_bytes()));
    }

    /// Build a bundle from a `rust-embed` folder.
    ///
    /// ```ignore
    /// #[derive(rust_embed::Embed)]
    /// #[folder = "migrations/"]
    /// struct Migrations;
    ///
    /// let source = BundleSource::from_embed::<Migrations>("app");
    /// ```
    pub fn from_embed<E: Embed>(name: impl Into<String>) -> Self {
        let mut files = BTreeMap::new();
        for path in E::iter() {
            if let Some(file) = E::get(&path) {
                files.insert(path.into_owned(), file.data);
            }
        }
        Self {
            name: name.into(),
            files,
        }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl MigrationSource for BundleSource {
    fn entries(&self) -> CoreResult<Vec<String>> {
        Ok(self.files.keys().cloned().collect())
    }

    fn read(&self, entry: &str) -> CoreResult<String> {
        let bytes = self
            .files
            .get(entry)
            .ok_or_else(|| CoreError::FileFormatError {
                path: format!("{}:{entry}", self.name),
                source: io::Error::new(io::ErrorKind::NotFound, "no such entry in bundle"),
            })?;
        String::from_utf8(bytes.to_vec()).map_err(|e| CoreError::FileFormatError {
            path: format!("{}:{entry}", self.name),
            source: io::Error::new(io::ErrorKind::InvalidData, e),
        })
    }

    fn describe(&self) -> String {
        format!("bundle '{}'", self.name)
    }
}

#[cfg(test)]
#[path = "source_test.rs"]
mod tests;
