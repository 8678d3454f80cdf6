//! Generates the `_MembersInjector` class for types with `@Inject`-marked
//! properties, consumed after construction by the constructor factory.

use super::inject_factory::member_inject_properties;
use super::{
    class_type_rendered, parameterized_name, type_variable_specs, GeneratedFile, Generator,
    PassInput,
};
use crate::params::{model_parameters, ModelSource};
use crate::poet::{FileSpec, FunSpec, TypeSpec};
use crate::validate;
use rivet_core::CodegenError;
use rivet_resolve::{markers, ResolveContext};
use rivet_syntax::{ClassPath, PropertyDecl};
use tracing::debug;

pub struct MembersInjectorGenerator;

impl Generator for MembersInjectorGenerator {
    fn id(&self) -> &'static str {
        "members-injector"
    }

    fn generate(&self, input: &PassInput<'_>) -> Result<Vec<GeneratedFile>, CodegenError> {
        let mut files = Vec::new();
        for path in input.forest.classes_and_inner_classes() {
            let properties = member_inject_properties(&path);
            if properties.is_empty() {
                continue;
            }
            validate::check_duplicate_inject_properties(&path, &properties)?;
            files.push(generate_injector(&path, &properties, input)?);
        }
        debug!(generator = self.id(), files = files.len(), "scan complete");
        Ok(files)
    }
}

fn generate_injector(
    path: &ClassPath<'_>,
    properties: &[&PropertyDecl],
    input: &PassInput<'_>,
) -> Result<GeneratedFile, CodegenError> {
    let ctx = ResolveContext {
        file: path.file,
        class_path: path,
        oracle: input.oracle,
    };

    let package = path.file.package.clone();
    let class_name = format!("{}_MembersInjector", path.generated_name_base("_"));

    let sources = properties
        .iter()
        .map(|property| ModelSource::from_property(property))
        .collect::<Result<Vec<_>, _>>()?;
    let parameters = model_parameters(&sources, &ctx)?;

    let type_vars = type_variable_specs(path, &ctx)?;
    let class_type = class_type_rendered(path, &type_vars);
    let injector_type = parameterized_name(&class_name, &type_vars);

    let mut class_builder = TypeSpec::class(&class_name);
    for var in &type_vars {
        class_builder = class_builder.add_type_variable(var.clone());
    }
    class_builder = class_builder.add_super_interface(format!(
        "{}<{}>",
        markers::DAGGER_MEMBERS_INJECTOR,
        class_type
    ));
    for parameter in &parameters {
        class_builder = class_builder
            .add_ctor_property(&parameter.name, parameter.provider_type_name().to_string());
    }

    let inject_members = {
        let mut inject_members = FunSpec::new("injectMembers")
            .override_modifier()
            .add_parameter("instance", &class_type);
        for (parameter, property) in parameters.iter().zip(properties) {
            inject_members = inject_members.add_statement(format!(
                "inject{}(instance, {})",
                property.name.capitalized(),
                parameter.as_provider_argument()
            ));
        }
        inject_members
    };
    class_builder = class_builder.add_function(inject_members);

    let mut companion = TypeSpec::companion_object();

    let create = {
        let mut create = FunSpec::new("create").jvm_static().returns(&injector_type);
        for var in &type_vars {
            create = create.add_type_variable(var.clone());
        }
        for parameter in &parameters {
            create =
                create.add_parameter(&parameter.name, parameter.provider_type_name().to_string());
        }
        let names: Vec<&str> = parameters
            .iter()
            .map(|parameter| parameter.name.as_str())
            .collect();
        create.add_statement(format!("return {}({})", injector_type, names.join(", ")))
    };
    companion = companion.add_function(create);

    // One static setter per property, shared with the constructor factory's
    // post-construction call sequence.
    for (parameter, property) in parameters.iter().zip(properties) {
        let mut setter = FunSpec::new(format!("inject{}", property.name.capitalized()))
            .jvm_static()
            .add_parameter("instance", &class_type);
        for var in &type_vars {
            setter = setter.add_type_variable(var.clone());
        }
        setter = setter
            .add_parameter(
                property.name.as_str(),
                parameter.original_type_name().to_string(),
            )
            .add_statement(format!(
                "instance.{} = {}",
                property.name, property.name
            ));
        companion = companion.add_function(setter);
    }

    class_builder = class_builder.add_type(companion);

    let spec = FileSpec::new(package, &class_name).add_type(class_builder);
    Ok(GeneratedFile::from_spec(
        spec,
        "members-injector",
        path.class.location.clone(),
    ))
}
