//! Generates the `_Factory` class for a type with an `@AssistedInject`
//! constructor, e.g. for
//! ```kotlin
//! class AssistedService @AssistedInject constructor(@Assisted name: String)
//! ```
//! this generator creates `AssistedService_Factory` whose instance `get`
//! takes the assisted parameters and whose constructor takes providers for
//! everything else.

use super::{
    class_type_rendered, injected_constructor, parameterized_name, type_variable_specs,
    GeneratedFile, Generator, PassInput,
};
use crate::params::{argument_list, model_parameters, ModelSource, Parameter};
use crate::poet::{FileSpec, FunSpec, TypeSpec};
use crate::validate;
use rivet_core::CodegenError;
use rivet_resolve::{markers, ResolveContext};
use rivet_syntax::{ClassPath, ConstructorDecl};
use tracing::debug;

pub struct AssistedInjectGenerator;

impl Generator for AssistedInjectGenerator {
    fn id(&self) -> &'static str {
        "assisted-inject-factory"
    }

    fn generate(&self, input: &PassInput<'_>) -> Result<Vec<GeneratedFile>, CodegenError> {
        let mut files = Vec::new();
        for path in input.forest.classes_and_inner_classes() {
            if let Some(constructor) = injected_constructor(&path, markers::ASSISTED_INJECT)? {
                files.push(generate_factory(&path, constructor, input)?);
            }
        }
        debug!(generator = self.id(), files = files.len(), "scan complete");
        Ok(files)
    }
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

    let sources: Vec<ModelSource<'_>> = constructor
        .params
        .iter()
        .map(ModelSource::from_param)
        .collect();
    let parameters = model_parameters(&sources, &ctx)?;

    let assisted: Vec<&Parameter> = parameters.iter().filter(|p| p.is_assisted).collect();
    let not_assisted: Vec<Parameter> = parameters
        .iter()
        .filter(|p| !p.is_assisted)
        .cloned()
        .collect();

    validate::check_distinct_assisted_parameters(&path.class.location, &assisted)?;

    let type_vars = type_variable_specs(path, &ctx)?;
    let class_type = class_type_rendered(path, &type_vars);
    let factory_type = parameterized_name(&class_name, &type_vars);

    let mut class_builder = TypeSpec::class(&class_name);
    for var in &type_vars {
        class_builder = class_builder.add_type_variable(var.clone());
    }
    for parameter in &not_assisted {
        class_builder = class_builder
            .add_ctor_property(&parameter.name, parameter.provider_type_name().to_string());
    }

    // The instance `get` takes only the assisted parameters; the rest come
    // from the factory's provider fields.
    let get = {
        let mut get = FunSpec::new("get").returns(&class_type);
        for parameter in &assisted {
            get = get.add_parameter(&parameter.name, parameter.original_type_name().to_string());
        }
        let arguments: Vec<String> = parameters
            .iter()
            .map(|parameter| {
                if parameter.is_assisted {
                    parameter.name.clone()
                } else {
                    parameter.as_provider_argument()
                }
            })
            .collect();
        get.add_statement(format!("return newInstance({})", arguments.join(", ")))
    };
    class_builder = class_builder.add_function(get);

    let create = {
        let mut create = FunSpec::new("create").jvm_static().returns(&factory_type);
        for var in &type_vars {
            create = create.add_type_variable(var.clone());
        }
        for parameter in &not_assisted {
            create =
                create.add_parameter(&parameter.name, parameter.provider_type_name().to_string());
        }
        create.add_statement(format!(
            "return {}({})",
            factory_type,
            argument_list(&not_assisted, false, false)
        ))
    };

    let new_instance = {
        let mut new_instance = FunSpec::new("newInstance").jvm_static().returns(&class_type);
        for var in &type_vars {
            new_instance = new_instance.add_type_variable(var.clone());
        }
        for parameter in &parameters {
            new_instance = new_instance
                .add_parameter(&parameter.name, parameter.original_type_name().to_string());
        }
        let names: Vec<&str> = parameters
            .iter()
            .map(|parameter| parameter.name.as_str())
            .collect();
        new_instance.add_statement(format!("return {}({})", class_type, names.join(", ")))
    };

    class_builder = class_builder.add_type(
        TypeSpec::companion_object()
            .add_function(create)
            .add_function(new_instance),
    );

    let spec = FileSpec::new(package, &class_name).add_type(class_builder);
    Ok(GeneratedFile::from_spec(
        spec,
        "assisted-inject-factory",
        constructor.location.clone(),
    ))
}
