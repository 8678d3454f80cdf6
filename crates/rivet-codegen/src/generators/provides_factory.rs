//! Generates one `Factory` class per `@Provides` member of a `@Module`
//! container, re-invoking the original method or property getter through a
//! static accessor.

use super::{GeneratedFile, Generator, PassInput};
use crate::params::{
    apply_suppress_wildcards, argument_list, model_parameters, ModelSource, Parameter,
};
use crate::poet::{FileSpec, FunSpec, TypeSpec};
use crate::validate;
use rivet_core::{CodegenError, Location, Name};
use rivet_resolve::{
    find_annotation, has_annotation, markers, resolve_type_ref, ResolveContext, SemanticType,
};
use rivet_syntax::{ClassPath, FunctionDecl, MemberRef, PropertyDecl, TypeRef, Visibility};
use tracing::debug;

pub struct ProvidesMethodFactoryGenerator;

impl Generator for ProvidesMethodFactoryGenerator {
    fn id(&self) -> &'static str {
        "provides-method-factory"
    }

    fn generate(&self, input: &PassInput<'_>) -> Result<Vec<GeneratedFile>, CodegenError> {
        let mut files = Vec::new();
        for path in input.forest.classes_and_inner_classes() {
            if !has_annotation(&path.class.annotations, path.file, markers::DAGGER_MODULE) {
                continue;
            }

            let provider_functions: Vec<MemberRef<'_, FunctionDecl>> = path
                .functions(true)
                .into_iter()
                .filter(|member| {
                    has_annotation(&member.decl.annotations, path.file, markers::DAGGER_PROVIDES)
                })
                .collect();

            for member in &provider_functions {
                validate::check_provider_not_abstract(&path, member)?;
            }
            validate::check_duplicate_provider_names(&path, &provider_functions)?;

            for member in &provider_functions {
                files.push(generate_factory(
                    &path,
                    ProviderMember::Function(member),
                    input,
                )?);
            }

            // Properties provide through their getter, marked `@get:Provides`.
            let provider_properties: Vec<MemberRef<'_, PropertyDecl>> = path
                .properties(true)
                .into_iter()
                .filter(|member| {
                    find_annotation(&member.decl.annotations, path.file, markers::DAGGER_PROVIDES)
                        .is_some_and(|usage| {
                            usage
                                .use_site_target
                                .as_ref()
                                .is_some_and(|target| target.as_str() == "get")
                        })
                })
                .collect();
            for member in &provider_properties {
                files.push(generate_factory(
                    &path,
                    ProviderMember::Property(member),
                    input,
                )?);
            }
        }
        debug!(generator = self.id(), files = files.len(), "scan complete");
        Ok(files)
    }
}

enum ProviderMember<'a, 'b> {
    Function(&'b MemberRef<'a, FunctionDecl>),
    Property(&'b MemberRef<'a, PropertyDecl>),
}

impl ProviderMember<'_, '_> {
    fn name(&self) -> &Name {
        match self {
            ProviderMember::Function(member) => &member.decl.name,
            ProviderMember::Property(member) => &member.decl.name,
        }
    }

    fn in_companion(&self) -> bool {
        match self {
            ProviderMember::Function(member) => member.in_companion,
            ProviderMember::Property(member) => member.in_companion,
        }
    }

    fn is_property(&self) -> bool {
        matches!(self, ProviderMember::Property(_))
    }

    fn location(&self) -> &Location {
        match self {
            ProviderMember::Function(member) => &member.decl.location,
            ProviderMember::Property(member) => &member.decl.location,
        }
    }

    fn declared_type(&self) -> Result<&TypeRef, CodegenError> {
        let ty = match self {
            ProviderMember::Function(member) => member.decl.return_type.as_ref(),
            ProviderMember::Property(member) => member.decl.ty.as_ref(),
        };
        ty.ok_or_else(|| CodegenError::MalformedAnnotationUsage {
            message: format!("couldn't obtain type reference for `{}`", self.name()),
            location: self.location().clone(),
        })
    }

    fn is_mangled(&self, path: &ClassPath<'_>) -> bool {
        match self {
            ProviderMember::Property(_) => false,
            ProviderMember::Function(member) => {
                member.decl.visibility == Visibility::Internal
                    && !has_annotation(&member.decl.annotations, path.file, markers::PUBLISHED_API)
            }
        }
    }
}

fn generate_factory(
    path: &ClassPath<'_>,
    member: ProviderMember<'_, '_>,
    input: &PassInput<'_>,
) -> Result<GeneratedFile, CodegenError> {
    let ctx = ResolveContext {
        file: path.file,
        class_path: path,
        oracle: input.oracle,
    };

    let is_companion = member.in_companion();
    let is_object = is_companion || path.class.is_object();
    let is_property = member.is_property();
    let is_mangled = member.is_mangled(path);
    let mangled_suffix = mangled_name_suffix(input.module_name);

    let package = path.file.package.clone();
    let callable_name = member.name().clone();

    let mut class_name = String::new();
    class_name.push_str(&path.generated_name_base("_"));
    class_name.push('_');
    if is_companion {
        class_name.push_str("Companion_");
    }
    if is_property {
        class_name.push_str("Get");
    }
    class_name.push_str(&callable_name.capitalized());
    if is_mangled {
        class_name.push('$');
        class_name.push_str(&mangled_suffix);
    }
    class_name.push_str("Factory");

    let parameters: Vec<Parameter> = match &member {
        ProviderMember::Function(function) => {
            let sources: Vec<ModelSource<'_>> = function
                .decl
                .params
                .iter()
                .map(ModelSource::from_param)
                .collect();
            model_parameters(&sources, &ctx)?
        }
        ProviderMember::Property(_) => Vec::new(),
    };

    let declared_return = member.declared_type()?;
    let return_type: SemanticType = apply_suppress_wildcards(
        resolve_type_ref(declared_return, member.location(), &ctx)?,
        declared_return,
    );
    let return_type_is_nullable = declared_return.is_nullable();
    let rendered_return = return_type.to_string();

    let module_class = path.qualified_name().to_dotted();

    // The accessor name mirrors what the compiled member is called: property
    // getters gain a `get` prefix, internal functions carry the module suffix.
    let byte_code_function_name = if is_property {
        format!("get{}", callable_name.capitalized())
    } else if is_mangled {
        format!("{callable_name}${mangled_suffix}")
    } else {
        callable_name.as_str().to_string()
    };

    let can_generate_an_object = is_object && parameters.is_empty();
    let mut class_builder = if can_generate_an_object {
        TypeSpec::object(&class_name)
    } else {
        TypeSpec::class(&class_name)
    };
    class_builder = class_builder.add_super_interface(format!(
        "{}<{}>",
        markers::DAGGER_FACTORY,
        rendered_return
    ));

    if !can_generate_an_object {
        if !is_object {
            class_builder = class_builder.add_ctor_property("module", &module_class);
        }
        for parameter in &parameters {
            class_builder = class_builder
                .add_ctor_property(&parameter.name, parameter.provider_type_name().to_string());
        }
    }

    class_builder = class_builder.add_function(
        FunSpec::new("get")
            .override_modifier()
            .returns(&rendered_return)
            .add_statement(format!(
                "return {}({})",
                byte_code_function_name,
                argument_list(&parameters, true, !is_object)
            )),
    );

    let create = {
        let mut create = FunSpec::new("create").jvm_static().returns(&class_name);
        if can_generate_an_object {
            create = create.add_statement("return this");
        } else {
            if !is_object {
                create = create.add_parameter("module", &module_class);
            }
            for parameter in &parameters {
                create = create
                    .add_parameter(&parameter.name, parameter.provider_type_name().to_string());
            }
            create = create.add_statement(format!(
                "return {}({})",
                class_name,
                argument_list(&parameters, false, !is_object)
            ));
        }
        create
    };

    let accessor = {
        let mut accessor = FunSpec::new(&byte_code_function_name)
            .jvm_static()
            .returns(&rendered_return);
        if !is_object {
            accessor = accessor.add_parameter("module", &module_class);
        }
        for parameter in &parameters {
            accessor =
                accessor.add_parameter(&parameter.name, parameter.original_type_name().to_string());
        }

        let arguments_without_module = if is_property {
            String::new()
        } else {
            let names: Vec<&str> = parameters
                .iter()
                .map(|parameter| parameter.name.as_str())
                .collect();
            format!("({})", names.join(", "))
        };

        let invocation = if is_object {
            format!("{module_class}.{callable_name}{arguments_without_module}")
        } else {
            format!("module.{callable_name}{arguments_without_module}")
        };

        // Non-nullable providers get a null-checking wrapper around the
        // returned value; a nullable declared return type opts out.
        let statement = if return_type_is_nullable {
            format!("return {invocation}")
        } else {
            format!(
                "return {}.checkNotNull({invocation}, \"Cannot return null from a non-@Nullable @Provides method\")",
                markers::DAGGER_PRECONDITIONS
            )
        };
        accessor.add_statement(statement)
    };

    if can_generate_an_object {
        class_builder = class_builder.add_function(create).add_function(accessor);
    } else {
        class_builder = class_builder.add_type(
            TypeSpec::companion_object()
                .add_function(create)
                .add_function(accessor),
        );
    }

    let spec = FileSpec::new(package, &class_name).add_type(class_builder);
    Ok(GeneratedFile::from_spec(
        spec,
        "provides-method-factory",
        member.location().clone(),
    ))
}

/// Strips the `<`/`>` wrapping compiler module names carry
/// (`<production sources for module app>` style).
fn mangled_name_suffix(module_name: &str) -> String {
    let name = module_name.trim();
    if let Some(stripped) = name.strip_prefix('<').and_then(|n| n.strip_suffix('>')) {
        stripped.to_string()
    } else {
        name.to_string()
    }
}
