//! Factory generation for `@AssistedInject` constructors.

mod common;

use common::{class_with_ctor, forest_of, generate, single_content};
use rivet_codegen::generators::AssistedInjectGenerator;
use rivet_core::CodegenError;
use rivet_syntax::{AnnotationArg, AnnotationUsage, AnnotationValue, ParamDecl, TypeRef};

const ASSISTED_INJECT: &str = "dagger.assisted.AssistedInject";
const ASSISTED: &str = "dagger.assisted.Assisted";

fn assisted_param(name: &str, ty: TypeRef, label: Option<&str>) -> ParamDecl {
    let mut param = ParamDecl::new(name, ty);
    let mut usage = AnnotationUsage::new(ASSISTED);
    if let Some(label) = label {
        usage
            .args
            .push(AnnotationArg::positional(AnnotationValue::Str(
                label.to_string(),
            )));
    }
    param.annotations.push(usage);
    param
}

#[test]
fn partitions_assisted_and_provided_parameters() {
    let forest = forest_of(vec![class_with_ctor(
        "AssistedService",
        ASSISTED_INJECT,
        vec![
            assisted_param("name", TypeRef::user("kotlin.String"), None),
            ParamDecl::new("repository", TypeRef::user("com.test.Repository")),
        ],
    )]);

    let files = generate(&AssistedInjectGenerator, &forest).unwrap();
    let content = single_content(&files);

    assert_eq!(files[0].name, "AssistedService_Factory");
    // Only the non-assisted dependency becomes a provider field.
    assert!(content.contains(
        "class AssistedService_Factory(\n  private val param1: javax.inject.Provider<com.test.Repository>\n)"
    ));
    // The instance get takes the assisted parameters directly.
    assert!(content.contains("fun get(param0: kotlin.String): com.test.AssistedService {"));
    assert!(content.contains("return newInstance(param0, param1.get())"));
    // create only takes the provided side.
    assert!(content.contains("fun create(param1: javax.inject.Provider<com.test.Repository>): AssistedService_Factory {"));
    // newInstance takes everything positionally.
    assert!(content.contains(
        "fun newInstance(param0: kotlin.String, param1: com.test.Repository): com.test.AssistedService {"
    ));
}

#[test]
fn fully_assisted_constructors_still_generate_a_class() {
    let forest = forest_of(vec![class_with_ctor(
        "AssistedService",
        ASSISTED_INJECT,
        vec![assisted_param("name", TypeRef::user("kotlin.String"), None)],
    )]);

    let files = generate(&AssistedInjectGenerator, &forest).unwrap();
    let content = single_content(&files);

    // Unlike plain injection, the assisted factory never collapses to an
    // object; it always carries an instance `get`.
    assert!(content.contains("class AssistedService_Factory"));
    assert!(content.contains("fun get(param0: kotlin.String)"));
}

#[test]
fn distinguishing_labels_keep_same_typed_parameters_apart() {
    let forest = forest_of(vec![class_with_ctor(
        "AssistedService",
        ASSISTED_INJECT,
        vec![
            assisted_param("first", TypeRef::user("kotlin.String"), Some("first")),
            assisted_param("second", TypeRef::user("kotlin.String"), Some("second")),
        ],
    )]);

    let files = generate(&AssistedInjectGenerator, &forest).unwrap();
    assert_eq!(files.len(), 1);
}

#[test]
fn duplicate_assisted_parameters_fail_naming_the_type() {
    let forest = forest_of(vec![class_with_ctor(
        "AssistedService",
        ASSISTED_INJECT,
        vec![
            assisted_param("first", TypeRef::user("kotlin.String"), None),
            assisted_param("second", TypeRef::user("kotlin.String"), None),
        ],
    )]);

    let error = generate(&AssistedInjectGenerator, &forest).unwrap_err();
    match error {
        CodegenError::DuplicateAssistedParameter { parameter, .. } => {
            assert!(parameter.contains("kotlin.String"));
            assert!(parameter.starts_with("@Assisted"));
        }
        other => panic!("expected duplicate assisted parameter error, got {other:?}"),
    }
}

#[test]
fn duplicate_labeled_parameters_report_the_label() {
    let forest = forest_of(vec![class_with_ctor(
        "AssistedService",
        ASSISTED_INJECT,
        vec![
            assisted_param("first", TypeRef::user("kotlin.String"), Some("token")),
            assisted_param("second", TypeRef::user("kotlin.String"), Some("token")),
        ],
    )]);

    let error = generate(&AssistedInjectGenerator, &forest).unwrap_err();
    match error {
        CodegenError::DuplicateAssistedParameter { parameter, .. } => {
            assert!(parameter.contains("@Assisted(\"token\")"));
        }
        other => panic!("expected duplicate assisted parameter error, got {other:?}"),
    }
}
