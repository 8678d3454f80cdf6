//! Factory generation for `@Inject` constructors.

mod common;

use common::{class_with_ctor, forest_of, generate, param, single_content};
use rivet_codegen::generators::InjectConstructorFactoryGenerator;
use rivet_core::CodegenError;
use rivet_syntax::{
    AnnotationUsage, ClassDecl, ClassKind, ConstructorDecl, PropertyDecl, TypeArg, TypeParam,
    TypeRef, Visibility,
};

const INJECT: &str = "javax.inject.Inject";

#[test]
fn generates_a_factory_for_a_simple_constructor() {
    let forest = forest_of(vec![class_with_ctor(
        "Service",
        INJECT,
        vec![param("name", TypeRef::user("kotlin.String"))],
    )]);

    let files = generate(&InjectConstructorFactoryGenerator, &forest).unwrap();
    let content = single_content(&files);

    assert_eq!(files[0].name, "Service_Factory");
    assert_eq!(files[0].package.to_dotted(), "com.test");
    assert!(content.contains(
        "class Service_Factory(\n  private val param0: javax.inject.Provider<kotlin.String>\n) : dagger.internal.Factory<com.test.Service> {"
    ));
    assert!(content.contains("override fun get(): com.test.Service {"));
    assert!(content.contains("return newInstance(param0.get())"));
    assert!(content.contains("fun create(param0: javax.inject.Provider<kotlin.String>): Service_Factory {"));
    assert!(content.contains("fun newInstance(param0: kotlin.String): com.test.Service {"));
    assert!(content.contains("return com.test.Service(param0)"));
}

#[test]
fn zero_parameter_constructor_emits_a_singleton_holder_object() {
    let forest = forest_of(vec![class_with_ctor("Service", INJECT, Vec::new())]);

    let files = generate(&InjectConstructorFactoryGenerator, &forest).unwrap();
    let content = single_content(&files);

    // The factory is a process-wide shared object; `create` hands it out
    // instead of allocating.
    assert!(content.contains("object Service_Factory : dagger.internal.Factory<com.test.Service> {"));
    assert!(content.contains("return this"));
    assert!(content.contains("return newInstance()"));
    assert!(!content.contains("companion object"));
}

#[test]
fn unannotated_constructors_do_not_trigger() {
    let mut class = ClassDecl::new("Plain", ClassKind::Class);
    class.constructors.push(ConstructorDecl::new());
    let forest = forest_of(vec![class]);

    let files = generate(&InjectConstructorFactoryGenerator, &forest).unwrap();
    assert!(files.is_empty());
}

#[test]
fn nested_classes_join_path_segments_with_underscores() {
    let mut outer = ClassDecl::new("Outer", ClassKind::Class);
    outer
        .nested
        .push(class_with_ctor("Inner", INJECT, Vec::new()));
    let forest = forest_of(vec![outer]);

    let files = generate(&InjectConstructorFactoryGenerator, &forest).unwrap();
    assert_eq!(files[0].name, "Outer_Inner_Factory");
    assert!(files[0].content.contains("com.test.Outer.Inner"));
}

#[test]
fn provider_and_lazy_wrapping_adapt_the_call_sites() {
    let forest = forest_of(vec![class_with_ctor(
        "Service",
        INJECT,
        vec![
            param(
                "direct",
                TypeRef::parameterized(
                    "javax.inject.Provider",
                    vec![TypeArg::Type(TypeRef::user("kotlin.String"))],
                ),
            ),
            param(
                "deferred",
                TypeRef::parameterized(
                    "dagger.Lazy",
                    vec![TypeArg::Type(TypeRef::user("kotlin.String"))],
                ),
            ),
        ],
    )]);

    let files = generate(&InjectConstructorFactoryGenerator, &forest).unwrap();
    let content = single_content(&files);

    // Provider-wrapped parameters forward the provider itself; lazy ones go
    // through the memoizing adapter.
    assert!(content.contains("return newInstance(param0, dagger.internal.DoubleCheck.lazy(param1))"));
    // newInstance declares the wrapped types the constructor declared.
    assert!(content.contains("param1: dagger.Lazy<@kotlin.jvm.JvmSuppressWildcards kotlin.String>"));
}

#[test]
fn generic_classes_propagate_type_parameters_and_bounds() {
    let mut class = class_with_ctor(
        "Holder",
        INJECT,
        vec![param("value", TypeRef::user("T"))],
    );
    class.type_params.push({
        let mut tp = TypeParam::new("T");
        tp.extends_bound = Some(TypeRef::user("kotlin.CharSequence"));
        tp
    });
    let forest = forest_of(vec![class]);

    let files = generate(&InjectConstructorFactoryGenerator, &forest).unwrap();
    let content = single_content(&files);

    assert!(content.contains("class Holder_Factory<T : kotlin.CharSequence>("));
    assert!(content.contains("private val param0: javax.inject.Provider<T>"));
    assert!(content.contains("fun <T : kotlin.CharSequence> create(param0: javax.inject.Provider<T>): Holder_Factory<T> {"));
    assert!(content.contains("fun <T : kotlin.CharSequence> newInstance(param0: T): com.test.Holder<T> {"));
}

#[test]
fn member_injected_properties_route_through_the_members_injector() {
    let mut class = class_with_ctor(
        "Target",
        INJECT,
        vec![param("name", TypeRef::user("kotlin.String"))],
    );
    let mut property = PropertyDecl::new("service", TypeRef::user("com.test.Service"));
    property.annotations.push(AnnotationUsage::new(INJECT));
    class.properties.push(property);
    let forest = forest_of(vec![class]);

    let files = generate(&InjectConstructorFactoryGenerator, &forest).unwrap();
    let content = single_content(&files);

    assert!(content.contains("val instance = newInstance(param0.get())"));
    assert!(content.contains("com.test.Target_MembersInjector.injectService(instance, param1.get())"));
    assert!(content.contains("return instance"));
    // The injected property still shows up as a factory dependency.
    assert!(content.contains("private val param1: javax.inject.Provider<com.test.Service>"));
}

#[test]
fn private_properties_are_not_member_injected() {
    let mut class = class_with_ctor("Target", INJECT, Vec::new());
    let mut property = PropertyDecl::new("hidden", TypeRef::user("kotlin.String"));
    property.visibility = Visibility::Private;
    property.annotations.push(AnnotationUsage::new(INJECT));
    class.properties.push(property);
    let forest = forest_of(vec![class]);

    let files = generate(&InjectConstructorFactoryGenerator, &forest).unwrap();
    let content = single_content(&files);
    assert!(!content.contains("MembersInjector"));
    assert!(content.contains("object Target_Factory"));
}

#[test]
fn two_injected_constructors_are_rejected() {
    let mut class = ClassDecl::new("Confused", ClassKind::Class);
    for _ in 0..2 {
        let mut ctor = ConstructorDecl::new();
        ctor.annotations.push(AnnotationUsage::new(INJECT));
        class.constructors.push(ctor);
    }
    let forest = forest_of(vec![class]);

    let error = generate(&InjectConstructorFactoryGenerator, &forest).unwrap_err();
    assert!(matches!(error, CodegenError::DuplicateDeclaration { .. }));
}

#[test]
fn emission_is_deterministic_across_independent_runs() {
    let build = || {
        forest_of(vec![class_with_ctor(
            "Service",
            INJECT,
            vec![param("name", TypeRef::user("kotlin.String"))],
        )])
    };

    let first = generate(&InjectConstructorFactoryGenerator, &build()).unwrap();
    let second = generate(&InjectConstructorFactoryGenerator, &build()).unwrap();

    assert_eq!(first[0].name, second[0].name);
    assert_eq!(first[0].package, second[0].package);
    assert_eq!(first[0].content, second[0].content);
}
