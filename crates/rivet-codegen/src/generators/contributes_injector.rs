//! Generates the binding module for `@ContributesAndroidInjector` functions:
//! an abstract `@Module` class nesting a `@Subcomponent` interface, its
//! factory interface, and the `@Binds @IntoMap` method wiring the factory
//! into the injector map.

use super::{GeneratedFile, Generator, PassInput};
use crate::params::apply_suppress_wildcards;
use crate::poet::{AnnotationSpec, FileSpec, FunSpec, TypeSpec};
use rivet_core::{CodegenError, QualifiedName};
use rivet_resolve::{
    class_array_argument, find_annotation, has_annotation, markers, resolve_type_ref,
    resolve_user_name, ResolveContext, ResolvedName,
};
use rivet_syntax::{AnnotationUsage, ClassPath, FunctionDecl, MemberRef};
use tracing::debug;

pub struct ContributesAndroidInjectorGenerator;

impl Generator for ContributesAndroidInjectorGenerator {
    fn id(&self) -> &'static str {
        "contributes-android-injector"
    }

    fn generate(&self, input: &PassInput<'_>) -> Result<Vec<GeneratedFile>, CodegenError> {
        let mut files = Vec::new();
        for path in input.forest.classes_and_inner_classes() {
            if !has_annotation(&path.class.annotations, path.file, markers::DAGGER_MODULE) {
                continue;
            }
            for member in path.functions(true) {
                let usage = find_annotation(
                    &member.decl.annotations,
                    path.file,
                    markers::CONTRIBUTES_ANDROID_INJECTOR,
                );
                if let Some(usage) = usage {
                    files.push(generate_binding_module(&path, &member, usage, input)?);
                }
            }
        }
        debug!(generator = self.id(), files = files.len(), "scan complete");
        Ok(files)
    }
}

fn generate_binding_module(
    path: &ClassPath<'_>,
    member: &MemberRef<'_, FunctionDecl>,
    usage: &AnnotationUsage,
    input: &PassInput<'_>,
) -> Result<GeneratedFile, CodegenError> {
    let ctx = ResolveContext {
        file: path.file,
        class_path: path,
        oracle: input.oracle,
    };
    let function = member.decl;

    let package = path.file.package.clone();

    let declared_return =
        function
            .return_type
            .as_ref()
            .ok_or_else(|| CodegenError::MalformedAnnotationUsage {
                message: format!("couldn't obtain type reference for `{}`", function.name),
                location: function.location.clone(),
            })?;
    let return_type = apply_suppress_wildcards(
        resolve_type_ref(declared_return, &function.location, &ctx)?,
        declared_return,
    );
    let rendered_return = return_type.to_string();
    let binding_target_name = return_type
        .class_name()
        .map(QualifiedName::short_name)
        .ok_or_else(|| CodegenError::MalformedAnnotationUsage {
            message: format!(
                "`{}` must return a class type to contribute an injector",
                function.name
            ),
            location: function.location.clone(),
        })?;
    let return_class = return_type
        .class_name()
        .map(QualifiedName::to_dotted)
        .unwrap_or_default();

    let class_name = format!(
        "{}_{}",
        path.generated_name_base("_"),
        function.name.capitalized()
    );

    // The optional `modules = [...]` list forwards verbatim onto the
    // generated subcomponent.
    let module_classes: Vec<String> = match class_array_argument(usage, "modules")? {
        Some(refs) => refs
            .iter()
            .map(|ty| {
                resolve_type_ref(ty, &usage.location, &ctx)
                    .map(|resolved| format!("{resolved}::class"))
            })
            .collect::<Result<Vec<_>, _>>()?,
        None => Vec::new(),
    };

    // Every other annotation on the trigger function is assumed to be a scope
    // marker and re-attaches to the subcomponent.
    let scope_annotations: Vec<String> = function
        .annotations
        .iter()
        .filter(|annotation| annotation.token != usage.token)
        .map(|annotation| {
            match resolve_user_name(&annotation.token, &annotation.location, &ctx) {
                Ok(ResolvedName::Qualified(qualified)) => qualified.to_dotted(),
                _ => annotation.token.clone(),
            }
        })
        .collect();

    let subcomponent_name = format!("{binding_target_name}Subcomponent");

    let subcomponent_factory = TypeSpec::interface("Factory")
        .add_annotation(AnnotationSpec::new(format!(
            "{}.Factory",
            markers::DAGGER_SUBCOMPONENT
        )))
        .add_super_interface(format!(
            "{}.Factory<{}>",
            markers::ANDROID_INJECTOR,
            rendered_return
        ));

    let mut subcomponent_annotation = AnnotationSpec::new(markers::DAGGER_SUBCOMPONENT);
    if !module_classes.is_empty() {
        subcomponent_annotation =
            subcomponent_annotation.add_member(format!("modules = [{}]", module_classes.join(", ")));
    }

    let mut subcomponent = TypeSpec::interface(&subcomponent_name)
        .add_annotation(subcomponent_annotation);
    for scope in &scope_annotations {
        subcomponent = subcomponent.add_annotation(AnnotationSpec::new(scope.clone()));
    }
    subcomponent = subcomponent
        .add_super_interface(format!(
            "{}<{}>",
            markers::ANDROID_INJECTOR,
            rendered_return
        ))
        .add_type(subcomponent_factory);

    let full_subcomponent = if package.is_root() {
        format!("{class_name}.{subcomponent_name}")
    } else {
        format!("{}.{class_name}.{subcomponent_name}", package.to_dotted())
    };

    let bind_function = FunSpec::new("bindAndroidInjectorFactory")
        .abstract_modifier()
        .add_annotation(AnnotationSpec::new(markers::DAGGER_BINDS))
        .add_annotation(AnnotationSpec::new(markers::INTO_MAP))
        .add_annotation(
            AnnotationSpec::new(markers::CLASS_KEY).add_member(format!("{return_class}::class")),
        )
        .add_parameter("builder", format!("{subcomponent_name}.Factory"))
        .returns(format!("{}.Factory<*>", markers::ANDROID_INJECTOR));

    let module_type = TypeSpec::class(&class_name)
        .abstract_modifier()
        .private_empty_constructor()
        .add_annotation(
            AnnotationSpec::new(markers::DAGGER_MODULE)
                .add_member(format!("subcomponents = [{full_subcomponent}::class]")),
        )
        .add_type(subcomponent)
        .add_function(bind_function);

    let spec = FileSpec::new(package, &class_name).add_type(module_type);
    Ok(GeneratedFile::from_spec(
        spec,
        "contributes-android-injector",
        function.location.clone(),
    ))
}
