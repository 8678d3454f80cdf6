//! Declaration index: a deterministic, lazily expanding walk over every
//! class-like declaration in a forest, nested ones included.

use crate::{ClassDecl, Forest, FunctionDecl, PropertyDecl, SourceFile, TypeParam};
use rivet_core::{Name, QualifiedName};

/// A class-like declaration together with its enclosing context.
///
/// `ancestors` lists enclosing declarations outermost first. The handle only
/// borrows from the forest; it never owns or mutates nodes.
#[derive(Debug, Clone)]
pub struct ClassPath<'a> {
    pub file: &'a SourceFile,
    pub ancestors: Vec<&'a ClassDecl>,
    pub class: &'a ClassDecl,
}

/// A member surfaced by [`ClassPath::functions`] / [`ClassPath::properties`],
/// remembering whether it was found inside a companion object.
#[derive(Debug, Clone, Copy)]
pub struct MemberRef<'a, T> {
    pub decl: &'a T,
    pub in_companion: bool,
}

impl Forest {
    /// Every class-like declaration in the forest, depth-first, parent before
    /// children, in file order then declaration order. Re-invoking over the
    /// same snapshot yields the same sequence.
    pub fn classes_and_inner_classes(&self) -> impl Iterator<Item = ClassPath<'_>> {
        let mut stack: Vec<ClassPath<'_>> = Vec::new();
        for file in self.files.iter().rev() {
            for class in file.classes.iter().rev() {
                stack.push(ClassPath {
                    file,
                    ancestors: Vec::new(),
                    class,
                });
            }
        }

        std::iter::from_fn(move || {
            let current = stack.pop()?;
            for nested in current.class.nested.iter().rev() {
                let mut ancestors = current.ancestors.clone();
                ancestors.push(current.class);
                stack.push(ClassPath {
                    file: current.file,
                    ancestors,
                    class: nested,
                });
            }
            Some(current)
        })
    }
}

impl<'a> ClassPath<'a> {
    /// Outer-to-inner simple names, self included.
    #[must_use]
    pub fn names(&self) -> Vec<Name> {
        self.ancestors
            .iter()
            .map(|ancestor| ancestor.name.clone())
            .chain(std::iter::once(self.class.name.clone()))
            .collect()
    }

    /// The fully qualified name of this declaration.
    #[must_use]
    pub fn qualified_name(&self) -> QualifiedName {
        let mut name = QualifiedName::from_segments(self.file.package.segments().to_vec());
        for segment in self.names() {
            name = name.child(&segment);
        }
        name
    }

    /// Outer-to-inner class names joined by `separator`, the base of every
    /// generated declaration name (`Outer_Inner` for `Outer.Inner`).
    #[must_use]
    pub fn generated_name_base(&self, separator: &str) -> String {
        self.names()
            .iter()
            .map(|name| name.as_str().to_string())
            .collect::<Vec<_>>()
            .join(separator)
    }

    /// Functions declared in the class body, optionally including members of
    /// its companion objects.
    #[must_use]
    pub fn functions(&self, include_companions: bool) -> Vec<MemberRef<'a, FunctionDecl>> {
        let mut out: Vec<MemberRef<'a, FunctionDecl>> = self
            .class
            .functions
            .iter()
            .map(|decl| MemberRef {
                decl,
                in_companion: false,
            })
            .collect();
        if include_companions {
            for companion in self.class.companions() {
                out.extend(companion.functions.iter().map(|decl| MemberRef {
                    decl,
                    in_companion: true,
                }));
            }
        }
        out
    }

    /// Properties declared in the class body, optionally including members of
    /// its companion objects.
    #[must_use]
    pub fn properties(&self, include_companions: bool) -> Vec<MemberRef<'a, PropertyDecl>> {
        let mut out: Vec<MemberRef<'a, PropertyDecl>> = self
            .class
            .properties
            .iter()
            .map(|decl| MemberRef {
                decl,
                in_companion: false,
            })
            .collect();
        if include_companions {
            for companion in self.class.companions() {
                out.extend(companion.properties.iter().map(|decl| MemberRef {
                    decl,
                    in_companion: true,
                }));
            }
        }
        out
    }

    /// Type parameters visible at this declaration, outermost scope first.
    pub fn type_params_in_scope(&self) -> impl Iterator<Item = &'a TypeParam> + '_ {
        self.ancestors
            .iter()
            .flat_map(|ancestor| ancestor.type_params.iter())
            .chain(self.class.type_params.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClassKind;
    use rivet_core::PackageName;

    fn forest_with_nesting() -> Forest {
        let mut outer = ClassDecl::new("Outer", ClassKind::Class);
        let mut middle = ClassDecl::new("Middle", ClassKind::Class);
        middle.nested.push(ClassDecl::new("Inner", ClassKind::Class));
        outer.nested.push(middle);

        let mut file = SourceFile::new("src/Outer.kt", PackageName::from_dotted("com.test"));
        file.classes.push(outer);
        file.classes.push(ClassDecl::new("Sibling", ClassKind::Object));
        Forest::new(vec![file])
    }

    #[test]
    fn walks_depth_first_parent_before_children() {
        let forest = forest_with_nesting();
        let names: Vec<String> = forest
            .classes_and_inner_classes()
            .map(|path| path.qualified_name().to_dotted())
            .collect();
        assert_eq!(
            names,
            [
                "com.test.Outer",
                "com.test.Outer.Middle",
                "com.test.Outer.Middle.Inner",
                "com.test.Sibling",
            ]
        );
    }

    #[test]
    fn walk_is_stable_across_invocations() {
        let forest = forest_with_nesting();
        let first: Vec<String> = forest
            .classes_and_inner_classes()
            .map(|path| path.generated_name_base("_"))
            .collect();
        let second: Vec<String> = forest
            .classes_and_inner_classes()
            .map(|path| path.generated_name_base("_"))
            .collect();
        assert_eq!(first, second);
        assert_eq!(first[2], "Outer_Middle_Inner");
    }

    #[test]
    fn companion_members_are_behind_the_inclusion_flag() {
        let mut class = ClassDecl::new("Holder", ClassKind::Class);
        class.functions.push(FunctionDecl::new("direct"));
        let mut companion = ClassDecl::new("Companion", ClassKind::CompanionObject);
        companion.functions.push(FunctionDecl::new("fromCompanion"));
        class.nested.push(companion);

        let mut file = SourceFile::new("src/Holder.kt", PackageName::from_dotted("com.test"));
        file.classes.push(class);
        let forest = Forest::new(vec![file]);

        let path = forest.classes_and_inner_classes().next().expect("class");
        assert_eq!(path.functions(false).len(), 1);

        let all = path.functions(true);
        assert_eq!(all.len(), 2);
        assert!(all.iter().any(|member| member.in_companion));
    }
}
