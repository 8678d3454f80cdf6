//! The normalized parameter model shared by every generator.
//!
//! A modeled [`Parameter`] keeps two readings of its type apart: the
//! *unwrapped* inner type (what the target constructor or method consumes)
//! and the *declared* type (what a generated constructor parameter must
//! spell, `Provider<T>`/`Lazy<T>` wrapping included). Conflating the two
//! produces wrong generated signatures.

use rivet_core::{CodegenError, Location};
use rivet_resolve::{
    find_annotation, markers, resolve_type_ref, resolve_user_name, string_argument,
    ResolveContext, ResolvedName, SemanticType, SuppressWildcards,
};
use rivet_syntax::{AnnotationUsage, ParamDecl, PropertyDecl, TypeRef};

/// How a parameter site wraps its dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapperKind {
    Plain,
    /// The syntactic type was literally `Provider<T>`.
    Provider,
    /// The syntactic type was literally `Lazy<T>`.
    Lazy,
}

#[derive(Debug, Clone)]
pub struct Parameter {
    /// Positional synthetic name, stable and collision-free per declaration.
    pub name: String,
    /// The unwrapped inner type.
    pub type_name: SemanticType,
    pub wrapper: WrapperKind,
    pub is_assisted: bool,
    /// The distinguishing label of `@Assisted("label")`, empty when absent.
    pub assisted_identifier: String,
    pub location: Location,
}

impl Parameter {
    /// The type the trigger site declared: the inner type re-wrapped in its
    /// marker generic.
    #[must_use]
    pub fn original_type_name(&self) -> SemanticType {
        match self.wrapper {
            WrapperKind::Plain => self.type_name.clone(),
            WrapperKind::Provider => self.type_name.wrap_in_provider(),
            WrapperKind::Lazy => self.type_name.wrap_in_lazy(),
        }
    }

    /// The type a generated factory constructor declares for this parameter.
    #[must_use]
    pub fn provider_type_name(&self) -> SemanticType {
        self.type_name.wrap_in_provider()
    }

    /// The expression a generated `get()` body passes for this parameter when
    /// its own fields are providers.
    #[must_use]
    pub fn as_provider_argument(&self) -> String {
        match self.wrapper {
            WrapperKind::Provider => self.name.clone(),
            WrapperKind::Lazy => format!(
                "{}.lazy({})",
                markers::DAGGER_DOUBLE_CHECK,
                self.name
            ),
            WrapperKind::Plain => format!("{}.get()", self.name),
        }
    }

    /// Identity used for duplicate-assisted detection: resolved type plus
    /// identifier label.
    #[must_use]
    pub fn assisted_key(&self) -> (String, String) {
        (self.type_name.to_string(), self.assisted_identifier.clone())
    }
}

/// One syntactic site the modeler accepts: a value parameter or a
/// member-injected property.
pub struct ModelSource<'a> {
    annotations: &'a [AnnotationUsage],
    ty: &'a TypeRef,
    location: &'a Location,
}

impl<'a> ModelSource<'a> {
    #[must_use]
    pub fn from_param(param: &'a ParamDecl) -> Self {
        Self {
            annotations: &param.annotations,
            ty: &param.ty,
            location: &param.location,
        }
    }

    pub fn from_property(property: &'a PropertyDecl) -> Result<Self, CodegenError> {
        let ty = property
            .ty
            .as_ref()
            .ok_or_else(|| CodegenError::MalformedAnnotationUsage {
                message: format!(
                    "couldn't obtain type reference for property `{}`",
                    property.name
                ),
                location: property.location.clone(),
            })?;
        Ok(Self {
            annotations: &property.annotations,
            ty,
            location: &property.location,
        })
    }
}

/// Converts syntactic sites into the normalized parameter model.
pub fn model_parameters(
    sources: &[ModelSource<'_>],
    ctx: &ResolveContext<'_>,
) -> Result<Vec<Parameter>, CodegenError> {
    sources
        .iter()
        .enumerate()
        .map(|(index, source)| model_parameter(index, source, ctx))
        .collect()
}

fn model_parameter(
    index: usize,
    source: &ModelSource<'_>,
    ctx: &ResolveContext<'_>,
) -> Result<Parameter, CodegenError> {
    let declared = source.ty;

    // The outer name decides wrapping. Resolution failures here are not
    // fatal; an unresolvable outer name simply isn't one of the markers.
    let outer_name = declared
        .user_name()
        .and_then(|name| resolve_user_name(name, source.location, ctx).ok())
        .and_then(|resolved| match resolved {
            ResolvedName::Qualified(qualified) => Some(qualified.to_dotted()),
            ResolvedName::TypeVariable(_) => None,
        });

    let (wrapper, type_name) = if declared.is_nullable() {
        // Nullable parameters stay plain regardless of wrapping.
        (
            WrapperKind::Plain,
            resolve_type_ref(declared, source.location, ctx)?,
        )
    } else {
        let wrapper = match outer_name.as_deref() {
            Some(markers::PROVIDER) => WrapperKind::Provider,
            Some(markers::DAGGER_LAZY) => WrapperKind::Lazy,
            _ => WrapperKind::Plain,
        };
        match wrapper {
            WrapperKind::Plain => (wrapper, resolve_type_ref(declared, source.location, ctx)?),
            WrapperKind::Provider | WrapperKind::Lazy => {
                let inner = declared.single_type_argument().ok_or_else(|| {
                    CodegenError::MalformedAnnotationUsage {
                        message: format!(
                            "`{}` must declare exactly one type argument",
                            declared.user_name().unwrap_or_default()
                        ),
                        location: source.location.clone(),
                    }
                })?;
                (wrapper, resolve_type_ref(inner, source.location, ctx)?)
            }
        }
    };

    let type_name = apply_suppress_wildcards(type_name, declared);

    let assisted = find_annotation(source.annotations, ctx.file, markers::ASSISTED);
    let assisted_identifier = assisted
        .and_then(|usage| string_argument(usage, "value"))
        .unwrap_or_default()
        .to_string();

    Ok(Parameter {
        name: format!("param{index}"),
        type_name,
        wrapper,
        is_assisted: assisted.is_some(),
        assisted_identifier,
        location: source.location.clone(),
    })
}

/// The variance-suppression decision for a declared type reference.
///
/// Applied when the syntax carries an explicit suppress-wildcards annotation,
/// or defensively whenever the declared type is generic; function-shaped
/// types take the empty-argument-list emission shape instead.
#[must_use]
pub fn suppress_mode(declared: &TypeRef) -> SuppressWildcards {
    let explicit = declared.annotations.iter().any(|token| {
        token == markers::JVM_SUPPRESS_WILDCARDS
            || token.as_str()
                == markers::JVM_SUPPRESS_WILDCARDS
                    .rsplit('.')
                    .next()
                    .unwrap_or_default()
    });

    if explicit || declared.is_generic() {
        SuppressWildcards::Annotated
    } else if declared.is_function_type() {
        SuppressWildcards::AnnotatedEmptyArgs
    } else {
        SuppressWildcards::No
    }
}

/// Attaches the suppress-wildcards decision for `declared` to a resolved type.
#[must_use]
pub fn apply_suppress_wildcards(ty: SemanticType, declared: &TypeRef) -> SemanticType {
    match suppress_mode(declared) {
        SuppressWildcards::No => ty,
        mode => ty.with_suppress_wildcards(mode),
    }
}

/// Renders the comma-separated argument list generated bodies pass along.
///
/// With `as_provider` the factory's provider fields are adapted per wrapper
/// kind; otherwise parameters forward by name. `include_module` prepends the
/// `module` receiver argument.
#[must_use]
pub fn argument_list(params: &[Parameter], as_provider: bool, include_module: bool) -> String {
    let mut arguments: Vec<String> = params
        .iter()
        .map(|param| {
            if as_provider {
                param.as_provider_argument()
            } else {
                param.name.clone()
            }
        })
        .collect();
    if include_module {
        arguments.insert(0, "module".to_string());
    }
    arguments.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rivet_core::PackageName;
    use rivet_resolve::MemoryOracle;
    use rivet_syntax::{ClassDecl, ClassKind, Forest, ImportDecl, SourceFile, TypeArg};

    fn fixture_forest() -> (Forest, MemoryOracle) {
        let mut file = SourceFile::new("src/Subject.kt", PackageName::from_dotted("com.test"));
        file.imports.push(ImportDecl::Single {
            path: rivet_core::QualifiedName::from_dotted("javax.inject.Provider"),
        });
        file.imports.push(ImportDecl::Single {
            path: rivet_core::QualifiedName::from_dotted("dagger.Lazy"),
        });
        file.classes.push(ClassDecl::new("Subject", ClassKind::Class));

        let mut oracle = MemoryOracle::new();
        oracle.add_class("kotlin", "String");
        oracle.add_class("com.test", "Service");
        (Forest::new(vec![file]), oracle)
    }

    fn model_one(forest: &Forest, oracle: &MemoryOracle, ty: TypeRef) -> Parameter {
        let path = forest.classes_and_inner_classes().next().expect("class");
        let ctx = ResolveContext {
            file: path.file,
            class_path: &path,
            oracle,
        };
        let param = ParamDecl::new("value", ty);
        let sources = vec![ModelSource::from_param(&param)];
        model_parameters(&sources, &ctx)
            .expect("modeling succeeds")
            .remove(0)
    }

    #[test]
    fn provider_wrapping_unwraps_one_level() {
        let (forest, oracle) = fixture_forest();
        let param = model_one(
            &forest,
            &oracle,
            TypeRef::parameterized("Provider", vec![TypeArg::Type(TypeRef::user("Service"))]),
        );
        assert_eq!(param.wrapper, WrapperKind::Provider);
        // Unwrapped inner type for the target call...
        assert!(param.type_name.to_string().contains("com.test.Service"));
        // ...while the declared reading re-wraps.
        assert_eq!(
            param.original_type_name().to_string().replace(
                "@kotlin.jvm.JvmSuppressWildcards ",
                ""
            ),
            "javax.inject.Provider<com.test.Service>"
        );
    }

    #[test]
    fn wrapper_rewrap_law_holds_for_lazy() {
        let (forest, oracle) = fixture_forest();
        let param = model_one(
            &forest,
            &oracle,
            TypeRef::parameterized("Lazy", vec![TypeArg::Type(TypeRef::user("Service"))]),
        );
        assert_eq!(param.wrapper, WrapperKind::Lazy);
        let rewrapped = match param.wrapper {
            WrapperKind::Lazy => param.type_name.wrap_in_lazy(),
            _ => unreachable!(),
        };
        assert_eq!(rewrapped, param.original_type_name());
    }

    #[test]
    fn nullable_parameters_stay_plain() {
        let (forest, oracle) = fixture_forest();
        let param = model_one(
            &forest,
            &oracle,
            TypeRef::parameterized("Provider", vec![TypeArg::Type(TypeRef::user("Service"))])
                .nullable(),
        );
        assert_eq!(param.wrapper, WrapperKind::Plain);
        assert!(param.type_name.nullable);
    }

    #[test]
    fn generic_declared_types_get_wildcard_suppression() {
        let (forest, oracle) = fixture_forest();
        let mut forest = forest;
        forest.files[0].imports.push(ImportDecl::Single {
            path: rivet_core::QualifiedName::from_dotted("kotlin.collections.List"),
        });
        let param = model_one(
            &forest,
            &oracle,
            TypeRef::parameterized("List", vec![TypeArg::Type(TypeRef::user("String"))]),
        );
        assert_eq!(
            param.type_name.suppress_wildcards,
            SuppressWildcards::Annotated
        );
    }

    #[test]
    fn function_types_get_the_empty_argument_shape() {
        let (forest, oracle) = fixture_forest();
        let param = model_one(
            &forest,
            &oracle,
            TypeRef::function(None, vec![TypeRef::user("String")], TypeRef::user("String")),
        );
        assert_eq!(
            param.type_name.suppress_wildcards,
            SuppressWildcards::AnnotatedEmptyArgs
        );
    }

    #[test]
    fn names_are_positional_and_collision_free() {
        let (forest, oracle) = fixture_forest();
        let path = forest.classes_and_inner_classes().next().expect("class");
        let ctx = ResolveContext {
            file: path.file,
            class_path: &path,
            oracle: &oracle,
        };
        let first = ParamDecl::new("a", TypeRef::user("Service"));
        let second = ParamDecl::new("b", TypeRef::user("Service"));
        let sources = vec![
            ModelSource::from_param(&first),
            ModelSource::from_param(&second),
        ];
        let params = model_parameters(&sources, &ctx).expect("modeling succeeds");
        assert_eq!(params[0].name, "param0");
        assert_eq!(params[1].name, "param1");
    }

    #[test]
    fn argument_list_adapts_wrappers() {
        let (forest, oracle) = fixture_forest();
        let plain = model_one(&forest, &oracle, TypeRef::user("Service"));
        let lazy = model_one(
            &forest,
            &oracle,
            TypeRef::parameterized("Lazy", vec![TypeArg::Type(TypeRef::user("Service"))]),
        );
        let params = vec![plain, lazy];
        // Positional names are per-call in this test fixture, both param0.
        let rendered = argument_list(&params, true, true);
        assert!(rendered.starts_with("module, param0.get(), "));
        assert!(rendered.contains("dagger.internal.DoubleCheck.lazy(param0)"));
    }
}
