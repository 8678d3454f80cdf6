//! Binding-module generation for `@ContributesAndroidInjector` functions.

mod common;

use common::{forest_of, generate, single_content};
use rivet_codegen::generators::ContributesAndroidInjectorGenerator;
use rivet_syntax::{
    AnnotationArg, AnnotationUsage, AnnotationValue, ClassDecl, ClassKind, FunctionDecl, TypeRef,
};

const MODULE: &str = "dagger.Module";
const CONTRIBUTES: &str = "dagger.android.ContributesAndroidInjector";

fn contributing_module(function: FunctionDecl) -> ClassDecl {
    let mut module = ClassDecl::new("AppModule", ClassKind::Class);
    module.annotations.push(AnnotationUsage::new(MODULE));
    module.is_abstract = true;
    module.functions.push(function);
    module
}

fn contribute_function(name: &str, target: &str) -> FunctionDecl {
    let mut function = FunctionDecl::new(name);
    function.is_abstract = true;
    function.annotations.push(AnnotationUsage::new(CONTRIBUTES));
    function.return_type = Some(TypeRef::user(target));
    function
}

#[test]
fn emits_the_module_subcomponent_and_binding_method() {
    let forest = forest_of(vec![contributing_module(contribute_function(
        "contributeMainActivity",
        "com.test.MainActivity",
    ))]);

    let files = generate(&ContributesAndroidInjectorGenerator, &forest).unwrap();
    let content = single_content(&files);

    assert_eq!(files[0].name, "AppModule_ContributeMainActivity");
    assert!(content.contains(
        "@dagger.Module(subcomponents = [com.test.AppModule_ContributeMainActivity.MainActivitySubcomponent::class])"
    ));
    assert!(content.contains("abstract class AppModule_ContributeMainActivity private constructor()"));
    assert!(content.contains("@dagger.Subcomponent\n  interface MainActivitySubcomponent : dagger.android.AndroidInjector<com.test.MainActivity> {"));
    assert!(content.contains("@dagger.Subcomponent.Factory\n    interface Factory : dagger.android.AndroidInjector.Factory<com.test.MainActivity>"));
    assert!(content.contains("@dagger.Binds"));
    assert!(content.contains("@dagger.multibindings.IntoMap"));
    assert!(content.contains("@dagger.multibindings.ClassKey(com.test.MainActivity::class)"));
    assert!(content.contains(
        "abstract fun bindAndroidInjectorFactory(builder: MainActivitySubcomponent.Factory): dagger.android.AndroidInjector.Factory<*>"
    ));
}

#[test]
fn forwards_the_modules_argument_verbatim() {
    let mut function = contribute_function("contributeMainActivity", "com.test.MainActivity");
    function.annotations[0].args.push(AnnotationArg::named(
        "modules",
        AnnotationValue::Array(vec![
            AnnotationValue::ClassLiteral(TypeRef::user("com.test.MainModule")),
            AnnotationValue::ClassLiteral(TypeRef::user("com.test.ExtraModule")),
        ]),
    ));
    let forest = forest_of(vec![contributing_module(function)]);

    let files = generate(&ContributesAndroidInjectorGenerator, &forest).unwrap();
    let content = single_content(&files);

    assert!(content.contains(
        "@dagger.Subcomponent(modules = [com.test.MainModule::class, com.test.ExtraModule::class])"
    ));
}

#[test]
fn reattaches_scope_annotations_to_the_subcomponent() {
    let mut function = contribute_function("contributeMainActivity", "com.test.MainActivity");
    function
        .annotations
        .push(AnnotationUsage::new("com.test.ActivityScope"));
    let forest = forest_of(vec![contributing_module(function)]);

    let files = generate(&ContributesAndroidInjectorGenerator, &forest).unwrap();
    let content = single_content(&files);

    // The scope lands on the subcomponent, not on the generated module.
    assert!(content.contains("@com.test.ActivityScope\n  interface MainActivitySubcomponent"));
    assert!(!content.contains("@com.test.ActivityScope\nabstract class"));
    // The contribution marker itself is never re-attached.
    assert!(!content.contains("  @dagger.android.ContributesAndroidInjector"));
}

#[test]
fn functions_outside_module_containers_do_not_trigger() {
    let mut class = ClassDecl::new("NotAModule", ClassKind::Class);
    class.functions.push(contribute_function(
        "contributeMainActivity",
        "com.test.MainActivity",
    ));
    let forest = forest_of(vec![class]);

    let files = generate(&ContributesAndroidInjectorGenerator, &forest).unwrap();
    assert!(files.is_empty());
}
