//! Syntactic type reference -> fully qualified semantic type.
//!
//! Resolution runs over an incomplete compilation: imports and enclosing
//! declarations come from syntax, everything else from the [`SymbolOracle`].
//! The rules form an ordered early-return sequence; the first one that
//! produces a name wins, and exhausting them is a fatal error.

use crate::oracle::transitive_super_types;
use crate::{
    ImportMap, SemanticType, SemanticTypeKind, SuppressWildcards, SymbolOracle, TypeArgument,
};
use rivet_core::{CodegenError, Location, Name, PackageName, QualifiedName};
use rivet_syntax::{ClassPath, SourceFile, TypeArg, TypeElement, TypeRef};
use tracing::trace;

/// Everything a resolution needs to know about where a reference appears.
pub struct ResolveContext<'a> {
    pub file: &'a SourceFile,
    pub class_path: &'a ClassPath<'a>,
    pub oracle: &'a dyn SymbolOracle,
}

/// The outcome of resolving a single (possibly dotted) name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedName {
    Qualified(QualifiedName),
    /// The name is a generic type parameter in an enclosing scope and must be
    /// emitted as a type-variable placeholder, not a concrete type.
    TypeVariable(Name),
}

/// Resolves a full type reference, recursing through type arguments,
/// function-type parts and nullable wrappers.
pub fn resolve_type_ref(
    ty: &TypeRef,
    location: &Location,
    ctx: &ResolveContext<'_>,
) -> Result<SemanticType, CodegenError> {
    match &ty.element {
        TypeElement::Nullable(inner) => {
            Ok(resolve_type_ref(inner, location, ctx)?.with_nullable(true))
        }
        TypeElement::Function {
            receiver,
            params,
            ret,
        } => {
            let receiver = receiver
                .as_deref()
                .map(|receiver| resolve_type_ref(receiver, location, ctx))
                .transpose()?
                .map(Box::new);
            let params = params
                .iter()
                .map(|param| resolve_type_ref(param, location, ctx))
                .collect::<Result<Vec<_>, _>>()?;
            let ret = Box::new(resolve_type_ref(ret, location, ctx)?);
            Ok(SemanticType {
                kind: SemanticTypeKind::Lambda {
                    receiver,
                    params,
                    ret,
                },
                nullable: false,
                suppress_wildcards: SuppressWildcards::No,
            })
        }
        TypeElement::User { name, args } => {
            let resolved_args = args
                .iter()
                .map(|arg| match arg {
                    TypeArg::Star => Ok(TypeArgument::Star),
                    TypeArg::Type(inner) => {
                        resolve_type_ref(inner, location, ctx).map(TypeArgument::Type)
                    }
                })
                .collect::<Result<Vec<_>, _>>()?;

            match resolve_user_name(name, location, ctx)? {
                ResolvedName::Qualified(qualified) => {
                    Ok(SemanticType::class(qualified, resolved_args))
                }
                ResolvedName::TypeVariable(name) => Ok(SemanticType::type_variable(name)),
            }
        }
    }
}

/// Resolves a single dotted-or-simple name against the context.
pub fn resolve_user_name(
    name: &str,
    location: &Location,
    ctx: &ResolveContext<'_>,
) -> Result<ResolvedName, CodegenError> {
    // Already fully qualified: a dotted spelling with a lowercase leading
    // segment is treated as package-qualified. Probe the oracle for the
    // correct package/class split so inner classes from dependencies
    // (`a.b.Outer.Inner`) aren't mis-read as a deeper package, then accept
    // the spelling as-is.
    if name.contains('.')
        && name
            .chars()
            .next()
            .is_some_and(|first| first.is_lowercase())
    {
        let qualified = QualifiedName::from_dotted(name);
        if !confirm_qualified_split(&qualified, ctx.oracle) {
            trace!(name, "accepting qualified spelling without oracle confirmation");
        }
        return Ok(ResolvedName::Qualified(qualified));
    }

    // A generic type parameter declared by an enclosing scope.
    if !name.contains('.') {
        if let Some(param) = ctx
            .class_path
            .type_params_in_scope()
            .find(|param| param.name.as_str() == name)
        {
            return Ok(ResolvedName::TypeVariable(param.name.clone()));
        }
    }

    let imports = ImportMap::from_file(ctx.file);

    // Explicitly imported simple name.
    if let Some(import) = imports.single_for(name) {
        return Ok(ResolvedName::Qualified(import.clone()));
    }

    // Same package as the containing file.
    let package = &ctx.file.package;
    if let Some(qualified) = probe_class(ctx.oracle, package, name) {
        return Ok(ResolvedName::Qualified(qualified));
    }

    // A type alias declared in the containing package.
    if !name.contains('.') {
        if let Some(target) = ctx
            .oracle
            .type_alias_target(package, &Name::from(name))
        {
            return Ok(ResolvedName::Qualified(target));
        }
    }

    // The base language's implicit default-import namespaces, in their fixed
    // fallback order.
    for namespace in ctx.oracle.default_import_packages() {
        if let Some(qualified) = probe_class(ctx.oracle, &namespace, name) {
            trace!(name, namespace = %namespace, "resolved through default imports");
            return Ok(ResolvedName::Qualified(qualified));
        }
    }

    // A member of the containing declaration or one of its transitive
    // supertypes.
    if let Some(qualified) = find_in_super_types(name, ctx) {
        return Ok(ResolvedName::Qualified(qualified));
    }

    // Wildcard imports, in import order: classes first, then type aliases.
    for star in imports.stars() {
        if let Some(qualified) = probe_class(ctx.oracle, star, name) {
            trace!(name, star = %star, "resolved through wildcard import");
            return Ok(ResolvedName::Qualified(qualified));
        }
        if !name.contains('.') {
            if let Some(target) = ctx.oracle.type_alias_target(star, &Name::from(name)) {
                return Ok(ResolvedName::Qualified(target));
            }
        }
    }

    Err(CodegenError::UnresolvedType {
        reference: name.to_string(),
        location: location.clone(),
    })
}

fn probe_class(
    oracle: &dyn SymbolOracle,
    prefix: &PackageName,
    name: &str,
) -> Option<QualifiedName> {
    let dotted = if prefix.is_root() {
        name.to_string()
    } else {
        format!("{}.{}", prefix.to_dotted(), name)
    };
    let candidate = QualifiedName::from_dotted(&dotted);
    oracle.class_exists(&candidate).then_some(candidate)
}

fn find_in_super_types(name: &str, ctx: &ResolveContext<'_>) -> Option<QualifiedName> {
    let own = ctx.class_path.qualified_name();
    let candidate = QualifiedName::from_dotted(&format!("{}.{}", own.to_dotted(), name));
    if ctx.oracle.class_exists(&candidate) {
        return Some(candidate);
    }

    for super_type in transitive_super_types(ctx.oracle, &own) {
        let candidate =
            QualifiedName::from_dotted(&format!("{}.{}", super_type.to_dotted(), name));
        if ctx.oracle.class_exists(&candidate) {
            trace!(name, super_type = %super_type, "resolved through supertype chain");
            return Some(candidate);
        }
    }

    None
}

/// Tries progressively shorter package prefixes against progressively longer
/// class-segment suffixes until the oracle confirms one split.
fn confirm_qualified_split(name: &QualifiedName, oracle: &dyn SymbolOracle) -> bool {
    let segments = name.segments();
    for split in (0..segments.len()).rev() {
        let package = PackageName::from_dotted(
            &segments[..split]
                .iter()
                .map(Name::as_str)
                .collect::<Vec<_>>()
                .join("."),
        );
        if oracle.has_class_id(&package, &segments[split..]) {
            return true;
        }
    }
    false
}
