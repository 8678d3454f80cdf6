//! Resolved semantic types.
//!
//! A [`SemanticType`] is fully qualified: rendering one into any generated
//! file requires no further name resolution, so generated sources never need
//! import lists.

use crate::markers;
use rivet_core::{Name, QualifiedName};
use std::fmt;

/// How (and whether) the suppress-wildcards marker is emitted on a type.
///
/// The marker forces invariant generic emission in generated signatures. It
/// is one conceptual rule with two emission shapes, because annotating a
/// function type requires an explicit empty argument list while ordinary
/// types take the bare annotation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SuppressWildcards {
    #[default]
    No,
    /// `@kotlin.jvm.JvmSuppressWildcards T`
    Annotated,
    /// `@kotlin.jvm.JvmSuppressWildcards() (A) -> B`
    AnnotatedEmptyArgs,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemanticType {
    pub kind: SemanticTypeKind,
    pub nullable: bool,
    pub suppress_wildcards: SuppressWildcards,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SemanticTypeKind {
    /// A concrete class reference with resolved type arguments.
    Class {
        name: QualifiedName,
        args: Vec<TypeArgument>,
    },
    /// A type-variable placeholder for a generic parameter in scope.
    TypeVariable { name: Name },
    /// A function type reassembled from its resolved parts.
    Lambda {
        receiver: Option<Box<SemanticType>>,
        params: Vec<SemanticType>,
        ret: Box<SemanticType>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeArgument {
    Type(SemanticType),
    /// A star projection; never recursed into.
    Star,
}

impl SemanticType {
    #[must_use]
    pub fn class(name: QualifiedName, args: Vec<TypeArgument>) -> Self {
        Self {
            kind: SemanticTypeKind::Class { name, args },
            nullable: false,
            suppress_wildcards: SuppressWildcards::No,
        }
    }

    #[must_use]
    pub fn named(dotted: &str) -> Self {
        Self::class(QualifiedName::from_dotted(dotted), Vec::new())
    }

    #[must_use]
    pub fn type_variable(name: Name) -> Self {
        Self {
            kind: SemanticTypeKind::TypeVariable { name },
            nullable: false,
            suppress_wildcards: SuppressWildcards::No,
        }
    }

    #[must_use]
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    #[must_use]
    pub fn with_suppress_wildcards(mut self, mode: SuppressWildcards) -> Self {
        self.suppress_wildcards = mode;
        self
    }

    /// The qualified name for class references.
    #[must_use]
    pub fn class_name(&self) -> Option<&QualifiedName> {
        match &self.kind {
            SemanticTypeKind::Class { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Whether this is a class reference with at least one type argument.
    #[must_use]
    pub fn is_generic(&self) -> bool {
        matches!(&self.kind, SemanticTypeKind::Class { args, .. } if !args.is_empty())
    }

    /// `Provider<self>`, without wildcard suppression of its own.
    #[must_use]
    pub fn wrap_in_provider(&self) -> SemanticType {
        SemanticType::class(
            QualifiedName::from_dotted(markers::PROVIDER),
            vec![TypeArgument::Type(self.clone())],
        )
    }

    /// `Lazy<self>`.
    #[must_use]
    pub fn wrap_in_lazy(&self) -> SemanticType {
        SemanticType::class(
            QualifiedName::from_dotted(markers::DAGGER_LAZY),
            vec![TypeArgument::Type(self.clone())],
        )
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.suppress_wildcards {
            SuppressWildcards::No => {}
            SuppressWildcards::Annotated => {
                write!(f, "@{} ", markers::JVM_SUPPRESS_WILDCARDS)?;
            }
            SuppressWildcards::AnnotatedEmptyArgs => {
                write!(f, "@{}() ", markers::JVM_SUPPRESS_WILDCARDS)?;
            }
        }

        match &self.kind {
            SemanticTypeKind::Class { name, args } => {
                write!(f, "{}", name.to_dotted())?;
                if !args.is_empty() {
                    f.write_str("<")?;
                    for (index, arg) in args.iter().enumerate() {
                        if index > 0 {
                            f.write_str(", ")?;
                        }
                        match arg {
                            TypeArgument::Type(ty) => write!(f, "{ty}")?,
                            TypeArgument::Star => f.write_str("*")?,
                        }
                    }
                    f.write_str(">")?;
                }
                if self.nullable {
                    f.write_str("?")?;
                }
                Ok(())
            }
            SemanticTypeKind::TypeVariable { name } => {
                write!(f, "{name}")?;
                if self.nullable {
                    f.write_str("?")?;
                }
                Ok(())
            }
            SemanticTypeKind::Lambda {
                receiver,
                params,
                ret,
            } => {
                // Nullable function types need the whole shape parenthesized.
                if self.nullable {
                    f.write_str("(")?;
                }
                if let Some(receiver) = receiver {
                    write!(f, "{receiver}.")?;
                }
                f.write_str("(")?;
                for (index, param) in params.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{param}")?;
                }
                write!(f, ") -> {ret}")?;
                if self.nullable {
                    f.write_str(")?")?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_fully_qualified_generics() {
        let ty = SemanticType::class(
            QualifiedName::from_dotted("kotlin.collections.Map"),
            vec![
                TypeArgument::Type(SemanticType::named("kotlin.String")),
                TypeArgument::Star,
            ],
        );
        assert_eq!(ty.to_string(), "kotlin.collections.Map<kotlin.String, *>");
    }

    #[test]
    fn renders_nullability_and_suppression() {
        let ty = SemanticType::named("kotlin.String")
            .with_nullable(true)
            .with_suppress_wildcards(SuppressWildcards::Annotated);
        assert_eq!(
            ty.to_string(),
            "@kotlin.jvm.JvmSuppressWildcards kotlin.String?"
        );
    }

    #[test]
    fn renders_function_types_with_empty_argument_annotation() {
        let ty = SemanticType {
            kind: SemanticTypeKind::Lambda {
                receiver: None,
                params: vec![SemanticType::named("kotlin.Int")],
                ret: Box::new(SemanticType::named("kotlin.String")),
            },
            nullable: false,
            suppress_wildcards: SuppressWildcards::AnnotatedEmptyArgs,
        };
        assert_eq!(
            ty.to_string(),
            "@kotlin.jvm.JvmSuppressWildcards() (kotlin.Int) -> kotlin.String"
        );
    }

    #[test]
    fn provider_wrapping_reuses_the_inner_type() {
        let inner = SemanticType::named("com.test.Service");
        assert_eq!(
            inner.wrap_in_provider().to_string(),
            "javax.inject.Provider<com.test.Service>"
        );
        assert_eq!(
            inner.wrap_in_lazy().to_string(),
            "dagger.Lazy<com.test.Service>"
        );
    }
}
