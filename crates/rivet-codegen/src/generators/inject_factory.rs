//! Generates the `_Factory` class for a type with an `@Inject` constructor,
//! e.g. for
//! ```kotlin
//! class Service @Inject constructor(repository: Repository)
//! ```
//! this generator creates `Service_Factory` implementing
//! `dagger.internal.Factory<Service>` with static `create`/`newInstance`
//! helpers.

use super::{
    class_type_rendered, injected_constructor, parameterized_name, type_variable_specs,
    GeneratedFile, Generator, PassInput,
};
use crate::params::{argument_list, model_parameters, ModelSource, Parameter};
use crate::poet::{FileSpec, FunSpec, TypeSpec};
use rivet_core::CodegenError;
use rivet_resolve::{has_annotation, markers, ResolveContext};
use rivet_syntax::{ClassPath, ConstructorDecl, PropertyDecl, Visibility};
use tracing::debug;

pub struct InjectConstructorFactoryGenerator;

impl Generator for InjectConstructorFactoryGenerator {
    fn id(&self) -> &'static str {
        "inject-constructor-factory"
    }

    fn generate(&self, input: &PassInput<'_>) -> Result<Vec<GeneratedFile>, CodegenError> {
        let mut files = Vec::new();
        for path in input.forest.classes_and_inner_classes() {
            if let Some(constructor) = injected_constructor(&path, markers::INJECT)? {
                files.push(generate_factory(&path, constructor, input)?);
            }
        }
        debug!(generator = self.id(), files = files.len(), "scan complete");
        Ok(files)
    }
}

/// Non-private `@Inject` properties of the class body, in declaration order.
pub(crate) fn member_inject_properties<'a>(path: &ClassPath<'a>) -> Vec<&'a PropertyDecl> {
    path.class
        .properties
        .iter()
        .filter(|property| property.visibility != Visibility::Private)
        .filter(|property| has_annotation(&property.annotations, path.file, markers::INJECT))
        .collect()
}

fn generate_factory(
    path: &ClassPath<'_>,
    constructor: &ConstructorDecl,
    input: &PassInput<'_>,
) -> Result<GeneratedFile, CodegenError> {
    let ctx = ResolveContext {
        file: path.file,
        class_path: path,
        oracle: input.oracle,
    };

    let package = path.file.package.clone();
    let class_name = format!("{}_Factory", path.generated_name_base("_"));

    let member_properties = member_inject_properties(path);

    let mut sources: Vec<ModelSource<'_>> = constructor
        .params
        .iter()
        .map(ModelSource::from_param)
        .collect();
    for property in &member_properties {
        sources.push(ModelSource::from_property(property)?);
    }
    let parameters = model_parameters(&sources, &ctx)?;

    let constructor_size = constructor.params.len();
    let constructor_params = &parameters[..constructor_size];
    let member_params = &parameters[constructor_size..];

    let type_vars = type_variable_specs(path, &ctx)?;
    let class_type = class_type_rendered(path, &type_vars);
    let factory_type = parameterized_name(&class_name, &type_vars);

    // The zero-parameter case collapses to a singleton holder object instead
    // of a class with a constructor.
    let can_generate_an_object = parameters.is_empty();
    let mut class_builder = if can_generate_an_object {
        TypeSpec::object(&class_name)
    } else {
        TypeSpec::class(&class_name)
    };
    for var in &type_vars {
        class_builder = class_builder.add_type_variable(var.clone());
    }
    class_builder = class_builder.add_super_interface(format!(
        "{}<{}>",
        markers::DAGGER_FACTORY,
        class_type
    ));
    for parameter in &parameters {
        class_builder = class_builder
            .add_ctor_property(&parameter.name, parameter.provider_type_name().to_string());
    }

    class_builder = class_builder.add_function(get_function(
        path,
        &package,
        constructor_params,
        member_params,
        &member_properties,
        &class_type,
    ));

    let create = {
        let mut create = FunSpec::new("create").jvm_static().returns(&factory_type);
        for var in &type_vars {
            create = create.add_type_variable(var.clone());
        }
        if can_generate_an_object {
            create = create.add_statement("return this");
        } else {
            for parameter in &parameters {
                create =
                    create.add_parameter(&parameter.name, parameter.provider_type_name().to_string());
            }
            create = create.add_statement(format!(
                "return {}({})",
                factory_type,
                argument_list(&parameters, false, false)
            ));
        }
        create
    };

    let new_instance = {
        let mut new_instance = FunSpec::new("newInstance").jvm_static().returns(&class_type);
        for var in &type_vars {
            new_instance = new_instance.add_type_variable(var.clone());
        }
        for parameter in constructor_params {
            new_instance =
                new_instance.add_parameter(&parameter.name, parameter.original_type_name().to_string());
        }
        let arguments: Vec<String> = constructor_params
            .iter()
            .map(|parameter| parameter.name.clone())
            .collect();
        new_instance
            .add_statement(format!("return {}({})", class_type, arguments.join(", ")))
    };

    // On the object variant the static helpers live on the object itself; a
    // class variant nests them in a companion object.
    if can_generate_an_object {
        class_builder = class_builder.add_function(create).add_function(new_instance);
    } else {
        class_builder = class_builder.add_type(
            TypeSpec::companion_object()
                .add_function(create)
                .add_function(new_instance),
        );
    }

    let spec = FileSpec::new(package, &class_name).add_type(class_builder);
    Ok(GeneratedFile::from_spec(
        spec,
        "inject-constructor-factory",
        constructor.location.clone(),
    ))
}

fn get_function(
    path: &ClassPath<'_>,
    package: &rivet_core::PackageName,
    constructor_params: &[Parameter],
    member_params: &[Parameter],
    member_properties: &[&PropertyDecl],
    class_type: &str,
) -> FunSpec {
    let mut get = FunSpec::new("get").override_modifier().returns(class_type);

    let new_instance_arguments = argument_list(constructor_params, true, false);

    if member_params.is_empty() {
        return get.add_statement(format!("return newInstance({new_instance_arguments})"));
    }

    get = get.add_statement(format!("val instance = newInstance({new_instance_arguments})"));

    // Post-construction member injection routes through the members injector
    // generated for this class.
    let injector_name = format!("{}_MembersInjector", path.generated_name_base("_"));
    let injector = if package.is_root() {
        injector_name
    } else {
        format!("{}.{}", package.to_dotted(), injector_name)
    };

    for (parameter, property) in member_params.iter().zip(member_properties) {
        let function_name = format!("inject{}", property.name.capitalized());
        get = get.add_statement(format!(
            "{injector}.{function_name}(instance, {})",
            parameter.as_provider_argument()
        ));
    }

    get.add_statement("return instance")
}
