//! Structured builders for generated Kotlin declarations.
//!
//! Generators assemble declaration trees through these builders and never
//! concatenate source text themselves. Rendering emits fully qualified names
//! throughout, so generated files carry no import list. A built [`FileSpec`]
//! can also be lowered back into a `rivet-syntax` tree so the next pass can
//! analyze what was generated.

use rivet_core::{Name, PackageName};
use rivet_syntax::{
    AnnotationUsage, ClassDecl, ClassKind, ConstructorDecl, FunctionDecl, SourceFile, TypeRef,
};
use std::fmt::Write as _;
use std::path::PathBuf;

const INDENT: &str = "  ";

/// One generated compilation unit holding a single top-level declaration.
#[derive(Debug, Clone)]
pub struct FileSpec {
    package: PackageName,
    name: String,
    types: Vec<TypeSpec>,
}

impl FileSpec {
    pub fn new(package: PackageName, name: impl Into<String>) -> Self {
        Self {
            package,
            name: name.into(),
            types: Vec::new(),
        }
    }

    #[must_use]
    pub fn add_type(mut self, ty: TypeSpec) -> Self {
        self.types.push(ty);
        self
    }

    #[must_use]
    pub fn package(&self) -> &PackageName {
        &self.package
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        if !self.package.is_root() {
            let _ = writeln!(out, "package {}", self.package.to_dotted());
            out.push('\n');
        }
        for (index, ty) in self.types.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            ty.render(&mut out, 0);
        }
        out
    }

    /// A declaration-tree view of the generated file, carrying what the
    /// trigger scans and the symbol oracle need: names, kinds, annotations,
    /// functions and nesting.
    #[must_use]
    pub fn lower(&self, path: PathBuf) -> SourceFile {
        let mut file = SourceFile::new(path, self.package.clone());
        file.classes = self.types.iter().map(TypeSpec::lower).collect();
        file
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TypeSpecKind {
    Class,
    Object,
    Interface,
    CompanionObject,
}

/// A class-like declaration under construction.
#[derive(Debug, Clone)]
pub struct TypeSpec {
    kind: TypeSpecKind,
    name: String,
    is_abstract: bool,
    annotations: Vec<AnnotationSpec>,
    type_variables: Vec<TypeVariableSpec>,
    ctor_params: Vec<ParameterSpec>,
    private_empty_ctor: bool,
    super_interfaces: Vec<String>,
    functions: Vec<FunSpec>,
    nested: Vec<TypeSpec>,
}

impl TypeSpec {
    pub fn class(name: impl Into<String>) -> Self {
        Self::new(TypeSpecKind::Class, name.into())
    }

    pub fn object(name: impl Into<String>) -> Self {
        Self::new(TypeSpecKind::Object, name.into())
    }

    pub fn interface(name: impl Into<String>) -> Self {
        Self::new(TypeSpecKind::Interface, name.into())
    }

    #[must_use]
    pub fn companion_object() -> Self {
        Self::new(TypeSpecKind::CompanionObject, String::new())
    }

    fn new(kind: TypeSpecKind, name: String) -> Self {
        Self {
            kind,
            name,
            is_abstract: false,
            annotations: Vec::new(),
            type_variables: Vec::new(),
            ctor_params: Vec::new(),
            private_empty_ctor: false,
            super_interfaces: Vec::new(),
            functions: Vec::new(),
            nested: Vec::new(),
        }
    }

    #[must_use]
    pub fn abstract_modifier(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    #[must_use]
    pub fn add_annotation(mut self, annotation: AnnotationSpec) -> Self {
        self.annotations.push(annotation);
        self
    }

    #[must_use]
    pub fn add_type_variable(mut self, variable: TypeVariableSpec) -> Self {
        self.type_variables.push(variable);
        self
    }

    /// Adds a primary-constructor parameter that is also a `private val`
    /// property of the type.
    #[must_use]
    pub fn add_ctor_property(mut self, name: impl Into<String>, ty: impl Into<String>) -> Self {
        self.ctor_params.push(ParameterSpec {
            name: name.into(),
            ty: ty.into(),
        });
        self
    }

    /// Emits `private constructor()` so the type cannot be instantiated.
    #[must_use]
    pub fn private_empty_constructor(mut self) -> Self {
        self.private_empty_ctor = true;
        self
    }

    #[must_use]
    pub fn add_super_interface(mut self, rendered: impl Into<String>) -> Self {
        self.super_interfaces.push(rendered.into());
        self
    }

    #[must_use]
    pub fn add_function(mut self, function: FunSpec) -> Self {
        self.functions.push(function);
        self
    }

    #[must_use]
    pub fn add_type(mut self, nested: TypeSpec) -> Self {
        self.nested.push(nested);
        self
    }

    fn has_body(&self) -> bool {
        !self.functions.is_empty() || !self.nested.is_empty()
    }

    fn render(&self, out: &mut String, depth: usize) {
        let pad = INDENT.repeat(depth);

        for annotation in &self.annotations {
            let _ = writeln!(out, "{pad}{}", annotation.render());
        }

        let keyword = match self.kind {
            TypeSpecKind::Class => "class",
            TypeSpecKind::Object => "object",
            TypeSpecKind::Interface => "interface",
            TypeSpecKind::CompanionObject => "companion object",
        };

        let _ = write!(out, "{pad}");
        if self.is_abstract {
            let _ = write!(out, "abstract ");
        }
        let _ = write!(out, "{keyword}");
        if !self.name.is_empty() {
            let _ = write!(out, " {}", self.name);
        }

        if !self.type_variables.is_empty() {
            let rendered: Vec<String> = self
                .type_variables
                .iter()
                .map(TypeVariableSpec::render)
                .collect();
            let _ = write!(out, "<{}>", rendered.join(", "));
        }

        if self.private_empty_ctor {
            let _ = write!(out, " private constructor()");
        } else if !self.ctor_params.is_empty() {
            let _ = writeln!(out, "(");
            for (index, param) in self.ctor_params.iter().enumerate() {
                let comma = if index + 1 < self.ctor_params.len() {
                    ","
                } else {
                    ""
                };
                let _ = writeln!(
                    out,
                    "{pad}{INDENT}private val {}: {}{comma}",
                    param.name, param.ty
                );
            }
            let _ = write!(out, "{pad})");
        }

        if !self.super_interfaces.is_empty() {
            let _ = write!(out, " : {}", self.super_interfaces.join(", "));
        }

        if !self.has_body() {
            out.push('\n');
            return;
        }

        let _ = writeln!(out, " {{");
        let mut first = true;
        for function in &self.functions {
            if !first {
                out.push('\n');
            }
            first = false;
            function.render(out, depth + 1);
        }
        for nested in &self.nested {
            if !first {
                out.push('\n');
            }
            first = false;
            nested.render(out, depth + 1);
        }
        let _ = writeln!(out, "{pad}}}");
    }

    fn lower(&self) -> ClassDecl {
        let kind = match self.kind {
            TypeSpecKind::Class => ClassKind::Class,
            TypeSpecKind::Object => ClassKind::Object,
            TypeSpecKind::Interface => ClassKind::Interface,
            TypeSpecKind::CompanionObject => ClassKind::CompanionObject,
        };
        let name = if self.name.is_empty() {
            "Companion".to_string()
        } else {
            self.name.clone()
        };

        let mut class = ClassDecl::new(name, kind);
        class.is_abstract = self.is_abstract;
        class.annotations = self
            .annotations
            .iter()
            .map(|annotation| AnnotationUsage::new(annotation.name.clone()))
            .collect();
        class.super_types = self
            .super_interfaces
            .iter()
            .map(|rendered| {
                let base = rendered.split('<').next().unwrap_or(rendered).trim();
                TypeRef::user(base)
            })
            .collect();
        if !self.ctor_params.is_empty() || self.private_empty_ctor {
            class.constructors.push(ConstructorDecl::new());
        }
        class.functions = self.functions.iter().map(FunSpec::lower).collect();
        class.type_params = self
            .type_variables
            .iter()
            .map(|variable| rivet_syntax::TypeParam::new(variable.name.clone()))
            .collect();
        class.nested = self.nested.iter().map(TypeSpec::lower).collect();
        class
    }
}

// Constructor parameters double as `private val` properties of the type.
#[derive(Debug, Clone)]
struct ParameterSpec {
    name: String,
    ty: String,
}

/// A function under construction.
#[derive(Debug, Clone)]
pub struct FunSpec {
    name: String,
    is_override: bool,
    is_abstract: bool,
    jvm_static: bool,
    annotations: Vec<AnnotationSpec>,
    type_variables: Vec<TypeVariableSpec>,
    params: Vec<(String, String)>,
    returns: Option<String>,
    statements: Vec<String>,
}

impl FunSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_override: false,
            is_abstract: false,
            jvm_static: false,
            annotations: Vec::new(),
            type_variables: Vec::new(),
            params: Vec::new(),
            returns: None,
            statements: Vec::new(),
        }
    }

    #[must_use]
    pub fn override_modifier(mut self) -> Self {
        self.is_override = true;
        self
    }

    #[must_use]
    pub fn abstract_modifier(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    #[must_use]
    pub fn jvm_static(mut self) -> Self {
        self.jvm_static = true;
        self
    }

    #[must_use]
    pub fn add_annotation(mut self, annotation: AnnotationSpec) -> Self {
        self.annotations.push(annotation);
        self
    }

    #[must_use]
    pub fn add_type_variable(mut self, variable: TypeVariableSpec) -> Self {
        self.type_variables.push(variable);
        self
    }

    #[must_use]
    pub fn add_parameter(mut self, name: impl Into<String>, ty: impl Into<String>) -> Self {
        self.params.push((name.into(), ty.into()));
        self
    }

    #[must_use]
    pub fn returns(mut self, ty: impl Into<String>) -> Self {
        self.returns = Some(ty.into());
        self
    }

    #[must_use]
    pub fn add_statement(mut self, statement: impl Into<String>) -> Self {
        self.statements.push(statement.into());
        self
    }

    fn render(&self, out: &mut String, depth: usize) {
        let pad = INDENT.repeat(depth);

        if self.jvm_static {
            let _ = writeln!(out, "{pad}@JvmStatic");
        }
        for annotation in &self.annotations {
            let _ = writeln!(out, "{pad}{}", annotation.render());
        }

        let _ = write!(out, "{pad}");
        if self.is_override {
            let _ = write!(out, "override ");
        }
        if self.is_abstract {
            let _ = write!(out, "abstract ");
        }
        let _ = write!(out, "fun ");
        if !self.type_variables.is_empty() {
            let rendered: Vec<String> = self
                .type_variables
                .iter()
                .map(TypeVariableSpec::render)
                .collect();
            let _ = write!(out, "<{}> ", rendered.join(", "));
        }
        let rendered_params: Vec<String> = self
            .params
            .iter()
            .map(|(name, ty)| format!("{name}: {ty}"))
            .collect();
        let _ = write!(out, "{}({})", self.name, rendered_params.join(", "));
        if let Some(returns) = &self.returns {
            let _ = write!(out, ": {returns}");
        }

        if self.is_abstract {
            out.push('\n');
            return;
        }

        let _ = writeln!(out, " {{");
        for statement in &self.statements {
            let _ = writeln!(out, "{pad}{INDENT}{statement}");
        }
        let _ = writeln!(out, "{pad}}}");
    }

    fn lower(&self) -> FunctionDecl {
        let mut function = FunctionDecl::new(Name::from(self.name.as_str()));
        function.is_abstract = self.is_abstract;
        function.annotations = self
            .annotations
            .iter()
            .map(|annotation| AnnotationUsage::new(annotation.name.clone()))
            .collect();
        function
    }
}

/// A rendered annotation application, e.g. `@dagger.Module(subcomponents = [..])`.
#[derive(Debug, Clone)]
pub struct AnnotationSpec {
    name: String,
    args: Vec<String>,
}

impl AnnotationSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    #[must_use]
    pub fn add_member(mut self, rendered: impl Into<String>) -> Self {
        self.args.push(rendered.into());
        self
    }

    fn render(&self) -> String {
        if self.args.is_empty() {
            format!("@{}", self.name)
        } else {
            format!("@{}({})", self.name, self.args.join(", "))
        }
    }
}

/// A declared type variable with an optional upper bound.
#[derive(Debug, Clone)]
pub struct TypeVariableSpec {
    pub name: String,
    pub bound: Option<String>,
}

impl TypeVariableSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bound: None,
        }
    }

    #[must_use]
    pub fn with_bound(mut self, bound: impl Into<String>) -> Self {
        self.bound = Some(bound.into());
        self
    }

    fn render(&self) -> String {
        match &self.bound {
            Some(bound) => format!("{} : {}", self.name, bound),
            None => self.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_a_minimal_factory_class() {
        let file = FileSpec::new(PackageName::from_dotted("com.test"), "Service_Factory")
            .add_type(
                TypeSpec::class("Service_Factory")
                    .add_ctor_property("param0", "javax.inject.Provider<kotlin.String>")
                    .add_super_interface("dagger.internal.Factory<com.test.Service>")
                    .add_function(
                        FunSpec::new("get")
                            .override_modifier()
                            .returns("com.test.Service")
                            .add_statement("return newInstance(param0.get())"),
                    ),
            );

        let rendered = file.render();
        assert!(rendered.starts_with("package com.test\n"));
        assert!(rendered.contains("class Service_Factory(\n  private val param0: javax.inject.Provider<kotlin.String>\n) : dagger.internal.Factory<com.test.Service> {"));
        assert!(rendered.contains("override fun get(): com.test.Service {"));
    }

    #[test]
    fn interfaces_without_members_render_without_braces() {
        let mut out = String::new();
        TypeSpec::interface("Factory")
            .add_annotation(AnnotationSpec::new("dagger.Subcomponent.Factory"))
            .add_super_interface("dagger.android.AndroidInjector.Factory<com.test.Main>")
            .render(&mut out, 0);
        assert_eq!(
            out,
            "@dagger.Subcomponent.Factory\ninterface Factory : dagger.android.AndroidInjector.Factory<com.test.Main>\n"
        );
    }

    #[test]
    fn lowering_preserves_names_annotations_and_nesting() {
        let file = FileSpec::new(PackageName::from_dotted("com.test"), "M_Contribute")
            .add_type(
                TypeSpec::class("M_Contribute")
                    .abstract_modifier()
                    .add_annotation(AnnotationSpec::new("dagger.Module"))
                    .add_type(TypeSpec::interface("MainSubcomponent")),
            );

        let lowered = file.lower(PathBuf::from("generated/com/test/M_Contribute.kt"));
        assert_eq!(lowered.package.to_dotted(), "com.test");
        let class = &lowered.classes[0];
        assert!(class.is_abstract);
        assert_eq!(class.annotations[0].token, "dagger.Module");
        assert_eq!(class.nested[0].name.as_str(), "MainSubcomponent");
    }
}
