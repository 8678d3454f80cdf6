use rivet_core::{PackageName, QualifiedName};
use rivet_syntax::{ImportDecl, SourceFile};

/// The import directives of one source file, split by addressing style.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportMap {
    singles: Vec<QualifiedName>,
    stars: Vec<PackageName>,
}

impl ImportMap {
    #[must_use]
    pub fn from_file(file: &SourceFile) -> Self {
        let mut out = ImportMap::default();
        for import in &file.imports {
            match import {
                ImportDecl::Single { path } => out.singles.push(path.clone()),
                ImportDecl::Star { package } => out.stars.push(package.clone()),
            }
        }
        out
    }

    /// The first explicit single-name import whose imported simple name is
    /// `simple_name`.
    #[must_use]
    pub fn single_for(&self, simple_name: &str) -> Option<&QualifiedName> {
        self.singles
            .iter()
            .find(|import| import.short_name().as_str() == simple_name)
    }

    /// Whether `qualified` is explicitly imported by name.
    #[must_use]
    pub fn has_single(&self, qualified: &str) -> bool {
        self.singles
            .iter()
            .any(|import| import.to_dotted() == qualified)
    }

    /// Wildcard-import prefixes in declaration order.
    #[must_use]
    pub fn stars(&self) -> &[PackageName] {
        &self.stars
    }
}
