//! The trigger-pattern generators.
//!
//! Each generator scans the forest for its trigger sites and emits new
//! declarations; all of them share the declaration index, the annotation and
//! type resolvers and the parameter modeler. Trigger sites are processed
//! independently, so generators hold no state across sites or passes.

mod assisted_factory;
mod component_check;
mod contributes_injector;
mod inject_factory;
mod members_injector;
mod provides_factory;

pub use assisted_factory::AssistedInjectGenerator;
pub use component_check::ComponentDetectorCheck;
pub use contributes_injector::ContributesAndroidInjectorGenerator;
pub use inject_factory::InjectConstructorFactoryGenerator;
pub use members_injector::MembersInjectorGenerator;
pub use provides_factory::ProvidesMethodFactoryGenerator;

use crate::poet::{FileSpec, TypeVariableSpec};
use rivet_core::{CodegenError, Location, PackageName};
use rivet_resolve::{find_annotation, resolve_type_ref, ResolveContext, SymbolOracle};
use rivet_syntax::{ClassPath, ConstructorDecl, Forest, SourceFile};
use std::path::PathBuf;

/// The read-only snapshot one generation pass runs against.
pub struct PassInput<'a> {
    pub forest: &'a Forest,
    pub oracle: &'a dyn SymbolOracle,
    /// The compilation module name, used to mangle factories for internal
    /// members.
    pub module_name: &'a str,
}

/// One trigger-pattern generator.
pub trait Generator {
    /// Stable identifier recorded in generated-file provenance comments.
    fn id(&self) -> &'static str;

    fn generate(&self, input: &PassInput<'_>) -> Result<Vec<GeneratedFile>, CodegenError>;
}

/// A generated compilation unit, handed to materialization exactly once.
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    pub package: PackageName,
    pub name: String,
    /// Full rendered source, provenance header included.
    pub content: String,
    /// Declaration-tree view for the next pass's analysis.
    pub lowered: SourceFile,
    pub generator: &'static str,
    /// The trigger site this file was generated for, for collision reports.
    pub trigger: Location,
}

impl GeneratedFile {
    #[must_use]
    pub fn from_spec(spec: FileSpec, generator: &'static str, trigger: Location) -> Self {
        let mut content = format!(
            "// Generated by rivet-codegen ({generator})\n// https://github.com/rivet-kt/rivet\n\n"
        );
        content.push_str(&spec.render());

        let mut relative = PathBuf::new();
        for segment in spec.package().segments() {
            relative.push(segment.as_str());
        }
        relative.push(format!("{}.kt", spec.name()));

        let package = spec.package().clone();
        let name = spec.name().to_string();
        let lowered = spec.lower(relative);

        Self {
            package,
            name,
            content,
            lowered,
            generator,
            trigger,
        }
    }

    /// The package-mirroring path of this file relative to the output root.
    #[must_use]
    pub fn relative_path(&self) -> PathBuf {
        self.lowered.path.clone()
    }
}

/// The constructor of `path` marked with `marker`, if any. More than one
/// marked constructor on a single type is a configuration error.
pub(crate) fn injected_constructor<'a>(
    path: &ClassPath<'a>,
    marker: &str,
) -> Result<Option<&'a ConstructorDecl>, CodegenError> {
    let mut marked = path
        .class
        .constructors
        .iter()
        .filter(|ctor| find_annotation(&ctor.annotations, path.file, marker).is_some());

    let first = match marked.next() {
        Some(ctor) => ctor,
        None => return Ok(None),
    };
    if marked.next().is_some() {
        return Err(CodegenError::DuplicateDeclaration {
            message: format!(
                "type {} may only contain one injected constructor",
                path.qualified_name()
            ),
            location: path.class.location.clone(),
        });
    }
    Ok(Some(first))
}

/// Type variables a generated factory must redeclare for a generic class,
/// bounds resolved.
pub(crate) fn type_variable_specs(
    path: &ClassPath<'_>,
    ctx: &ResolveContext<'_>,
) -> Result<Vec<TypeVariableSpec>, CodegenError> {
    path.class
        .type_params
        .iter()
        .map(|param| {
            let mut spec = TypeVariableSpec::new(param.name.as_str());
            if let Some(bound) = &param.extends_bound {
                let resolved = resolve_type_ref(bound, &path.class.location, ctx)?;
                spec = spec.with_bound(resolved.to_string());
            }
            Ok(spec)
        })
        .collect()
}

/// The rendered type of the annotated class itself, type variables applied.
pub(crate) fn class_type_rendered(path: &ClassPath<'_>, type_vars: &[TypeVariableSpec]) -> String {
    let base = path.qualified_name().to_dotted();
    if type_vars.is_empty() {
        base
    } else {
        let names: Vec<&str> = type_vars.iter().map(|var| var.name.as_str()).collect();
        format!("{}<{}>", base, names.join(", "))
    }
}

/// `name`, parameterized the same way as [`class_type_rendered`].
pub(crate) fn parameterized_name(name: &str, type_vars: &[TypeVariableSpec]) -> String {
    if type_vars.is_empty() {
        name.to_string()
    } else {
        let names: Vec<&str> = type_vars.iter().map(|var| var.name.as_str()).collect();
        format!("{}<{}>", name, names.join(", "))
    }
}
