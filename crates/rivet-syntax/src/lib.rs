//! Parsed declaration forest for Kotlin sources.
//!
//! The engine never parses text itself: the surrounding compiler hands it a
//! forest of declaration trees matching this model. Nodes are read-only to
//! every downstream consumer; generators only read from them and emit brand
//! new declarations. Construction is builder-style (`ClassDecl::new(..)` plus
//! public fields) so tests and the driver can assemble fixtures directly.

mod index;
mod types;

pub use index::{ClassPath, MemberRef};
pub use types::{TypeArg, TypeElement, TypeRef};

use rivet_core::{Location, Name, PackageName, QualifiedName};
use std::path::PathBuf;

/// The analyzable set of source files for one generation pass.
#[derive(Debug, Clone, Default)]
pub struct Forest {
    pub files: Vec<SourceFile>,
}

impl Forest {
    #[must_use]
    pub fn new(files: Vec<SourceFile>) -> Self {
        Self { files }
    }

    pub fn push(&mut self, file: SourceFile) {
        self.files.push(file);
    }
}

/// One parsed compilation unit.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub package: PackageName,
    pub imports: Vec<ImportDecl>,
    pub classes: Vec<ClassDecl>,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>, package: PackageName) -> Self {
        Self {
            path: path.into(),
            package,
            imports: Vec::new(),
            classes: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportDecl {
    /// `import java.io.File`
    Single { path: QualifiedName },
    /// `import java.io.*`
    Star { package: PackageName },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    Class,
    Interface,
    Object,
    CompanionObject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Internal,
    Protected,
    Private,
}

/// A class-like declaration: class, interface, object or companion object.
#[derive(Debug, Clone)]
pub struct ClassDecl {
    pub name: Name,
    pub kind: ClassKind,
    pub visibility: Visibility,
    pub is_abstract: bool,
    pub annotations: Vec<AnnotationUsage>,
    pub type_params: Vec<TypeParam>,
    /// Supertype entries as written in the declaration header.
    pub super_types: Vec<TypeRef>,
    pub constructors: Vec<ConstructorDecl>,
    pub functions: Vec<FunctionDecl>,
    pub properties: Vec<PropertyDecl>,
    pub nested: Vec<ClassDecl>,
    pub location: Location,
}

impl ClassDecl {
    pub fn new(name: impl Into<Name>, kind: ClassKind) -> Self {
        Self {
            name: name.into(),
            kind,
            visibility: Visibility::Public,
            is_abstract: false,
            annotations: Vec::new(),
            type_params: Vec::new(),
            super_types: Vec::new(),
            constructors: Vec::new(),
            functions: Vec::new(),
            properties: Vec::new(),
            nested: Vec::new(),
            location: Location::synthetic(),
        }
    }

    #[must_use]
    pub fn is_interface(&self) -> bool {
        self.kind == ClassKind::Interface
    }

    #[must_use]
    pub fn is_object(&self) -> bool {
        matches!(self.kind, ClassKind::Object | ClassKind::CompanionObject)
    }

    #[must_use]
    pub fn is_companion(&self) -> bool {
        self.kind == ClassKind::CompanionObject
    }

    #[must_use]
    pub fn is_generic(&self) -> bool {
        !self.type_params.is_empty()
    }

    /// Companion objects nested directly in this declaration.
    pub fn companions(&self) -> impl Iterator<Item = &ClassDecl> {
        self.nested.iter().filter(|nested| nested.is_companion())
    }
}

/// A declared type parameter, e.g. `T : CharSequence`.
#[derive(Debug, Clone)]
pub struct TypeParam {
    pub name: Name,
    pub extends_bound: Option<TypeRef>,
}

impl TypeParam {
    pub fn new(name: impl Into<Name>) -> Self {
        Self {
            name: name.into(),
            extends_bound: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConstructorDecl {
    pub annotations: Vec<AnnotationUsage>,
    pub params: Vec<ParamDecl>,
    pub location: Location,
}

impl ConstructorDecl {
    #[must_use]
    pub fn new() -> Self {
        Self {
            annotations: Vec::new(),
            params: Vec::new(),
            location: Location::synthetic(),
        }
    }
}

impl Default for ConstructorDecl {
    fn default() -> Self {
        Self::new()
    }
}

/// A value parameter of a constructor or function.
#[derive(Debug, Clone)]
pub struct ParamDecl {
    pub name: Name,
    pub annotations: Vec<AnnotationUsage>,
    pub ty: TypeRef,
    pub location: Location,
}

impl ParamDecl {
    pub fn new(name: impl Into<Name>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            annotations: Vec::new(),
            ty,
            location: Location::synthetic(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FunctionDecl {
    pub name: Name,
    pub visibility: Visibility,
    pub is_abstract: bool,
    pub annotations: Vec<AnnotationUsage>,
    pub params: Vec<ParamDecl>,
    pub return_type: Option<TypeRef>,
    pub location: Location,
}

impl FunctionDecl {
    pub fn new(name: impl Into<Name>) -> Self {
        Self {
            name: name.into(),
            visibility: Visibility::Public,
            is_abstract: false,
            annotations: Vec::new(),
            params: Vec::new(),
            return_type: None,
            location: Location::synthetic(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PropertyDecl {
    pub name: Name,
    pub visibility: Visibility,
    pub annotations: Vec<AnnotationUsage>,
    pub ty: Option<TypeRef>,
    pub location: Location,
}

impl PropertyDecl {
    pub fn new(name: impl Into<Name>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            visibility: Visibility::Public,
            annotations: Vec::new(),
            ty: Some(ty),
            location: Location::synthetic(),
        }
    }
}

/// One syntactic annotation entry as written in source.
///
/// The `token` is the spelling between `@` and the argument list: a simple
/// name (`Module`), a qualified name (`dagger.Module`), or a use-site
/// targeted form captured separately (`get` in `@get:Provides`). Resolution
/// to an annotation identity happens lazily in `rivet-resolve` because the
/// answer can change between passes.
#[derive(Debug, Clone)]
pub struct AnnotationUsage {
    pub token: String,
    pub use_site_target: Option<Name>,
    pub args: Vec<AnnotationArg>,
    pub location: Location,
}

impl AnnotationUsage {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            use_site_target: None,
            args: Vec::new(),
            location: Location::synthetic(),
        }
    }

    pub fn with_target(token: impl Into<String>, target: impl Into<Name>) -> Self {
        Self {
            use_site_target: Some(target.into()),
            ..Self::new(token)
        }
    }

    /// The simple-name portion of the token.
    #[must_use]
    pub fn short_name(&self) -> &str {
        self.token.rsplit('.').next().unwrap_or(&self.token)
    }

    #[must_use]
    pub fn argument(&self, key: &str) -> Option<&AnnotationValue> {
        self.args
            .iter()
            .find(|arg| arg.name.as_ref().is_some_and(|name| name.as_str() == key))
            .map(|arg| &arg.value)
    }

    /// The sole positional argument, if the usage has exactly one.
    #[must_use]
    pub fn single_positional(&self) -> Option<&AnnotationValue> {
        let mut positional = self.args.iter().filter(|arg| arg.name.is_none());
        let first = positional.next()?;
        positional.next().is_none().then_some(&first.value)
    }
}

#[derive(Debug, Clone)]
pub struct AnnotationArg {
    pub name: Option<Name>,
    pub value: AnnotationValue,
}

impl AnnotationArg {
    pub fn positional(value: AnnotationValue) -> Self {
        Self { name: None, value }
    }

    pub fn named(name: impl Into<Name>, value: AnnotationValue) -> Self {
        Self {
            name: Some(name.into()),
            value,
        }
    }
}

#[derive(Debug, Clone)]
pub enum AnnotationValue {
    Bool(bool),
    Str(String),
    /// `Foo::class`
    ClassLiteral(TypeRef),
    /// `[Foo::class, Bar::class]`
    Array(Vec<AnnotationValue>),
}
