//! Core shared types for rivet.
//!
//! This crate is intentionally small: name newtypes, source coordinates and
//! the fatal error taxonomy. Everything else lives in the crates that use it.

mod error;
mod name;

pub use error::CodegenError;
pub use name::{Name, PackageName, QualifiedName};

use std::fmt;
use std::path::PathBuf;

/// A position in a source document expressed as (line, UTF-16 code unit offset).
///
/// This matches the Language Server Protocol definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    #[inline]
    pub const fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 1-based in user-facing output, 0-based in memory.
        write!(f, "{}:{}", self.line + 1, self.character + 1)
    }
}

/// A source anchor for diagnostics: file path plus position.
///
/// Every fatal error carries one of these so callers can point at the
/// offending source construct rather than at generator internals.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    pub file: PathBuf,
    pub position: Position,
}

impl Location {
    pub fn new(file: impl Into<PathBuf>, position: Position) -> Self {
        Self {
            file: file.into(),
            position,
        }
    }

    /// A location for declarations constructed without source coordinates
    /// (synthetic fixtures, generated declarations).
    #[must_use]
    pub fn synthetic() -> Self {
        Self {
            file: PathBuf::new(),
            position: Position::new(0, 0),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.file.as_os_str().is_empty() {
            write!(f, "<synthetic>")
        } else {
            write!(f, "{}:{}", self.file.display(), self.position)
        }
    }
}
