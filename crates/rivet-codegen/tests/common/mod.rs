//! Shared fixture helpers for generator tests.
//!
//! Fixtures spell annotation tokens fully qualified so resolution works
//! without import lists, the same way generated code references types.

use rivet_codegen::{GeneratedFile, Generator, PassInput};
use rivet_core::{CodegenError, PackageName};
use rivet_resolve::{LayeredOracle, MemoryOracle};
use rivet_syntax::{
    AnnotationUsage, ClassDecl, ClassKind, ConstructorDecl, Forest, ParamDecl, SourceFile, TypeRef,
};

pub fn source_file(package: &str) -> SourceFile {
    SourceFile::new("src/Test.kt", PackageName::from_dotted(package))
}

pub fn forest_of(classes: Vec<ClassDecl>) -> Forest {
    let mut file = source_file("com.test");
    file.classes = classes;
    Forest::new(vec![file])
}

/// A class with a single constructor carrying `marker` and the given
/// parameters.
pub fn class_with_ctor(name: &str, marker: &str, params: Vec<ParamDecl>) -> ClassDecl {
    let mut class = ClassDecl::new(name, ClassKind::Class);
    let mut ctor = ConstructorDecl::new();
    ctor.annotations.push(AnnotationUsage::new(marker));
    ctor.params = params;
    class.constructors.push(ctor);
    class
}

pub fn param(name: &str, ty: TypeRef) -> ParamDecl {
    ParamDecl::new(name, ty)
}

/// Runs one generator against a base oracle layered with the forest's own
/// declarations.
pub fn generate_with(
    generator: &dyn Generator,
    forest: &Forest,
    base: &MemoryOracle,
) -> Result<Vec<GeneratedFile>, CodegenError> {
    let snapshot = LayeredOracle::for_forest(forest, base);
    generator.generate(&PassInput {
        forest,
        oracle: &snapshot,
        module_name: "app",
    })
}

pub fn generate(
    generator: &dyn Generator,
    forest: &Forest,
) -> Result<Vec<GeneratedFile>, CodegenError> {
    generate_with(generator, forest, &MemoryOracle::new())
}

/// The rendered body of the only generated file.
pub fn single_content(files: &[GeneratedFile]) -> &str {
    assert_eq!(files.len(), 1, "expected exactly one generated file");
    &files[0].content
}
