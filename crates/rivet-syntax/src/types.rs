//! Syntactic type references.
//!
//! These mirror what the parser saw, unresolved: a dotted spelling with
//! optional type arguments, a function type, or a nullable wrapper. The
//! resolver in `rivet-resolve` turns them into fully qualified semantic
//! types.

/// A type reference as written, including type-use annotations
/// (`@JvmSuppressWildcards List<String>`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    /// Raw annotation tokens attached to the reference.
    pub annotations: Vec<String>,
    pub element: TypeElement,
}

impl TypeRef {
    #[must_use]
    pub fn new(element: TypeElement) -> Self {
        Self {
            annotations: Vec::new(),
            element,
        }
    }

    /// A plain named reference without type arguments.
    pub fn user(name: impl Into<String>) -> Self {
        Self::new(TypeElement::User {
            name: name.into(),
            args: Vec::new(),
        })
    }

    /// A named reference with type arguments.
    pub fn parameterized(name: impl Into<String>, args: Vec<TypeArg>) -> Self {
        Self::new(TypeElement::User {
            name: name.into(),
            args,
        })
    }

    /// Wraps `self` in nullable syntax (`T?`).
    #[must_use]
    pub fn nullable(self) -> Self {
        Self::new(TypeElement::Nullable(Box::new(self)))
    }

    /// A function type `(params) -> ret`, optionally with a receiver.
    #[must_use]
    pub fn function(receiver: Option<TypeRef>, params: Vec<TypeRef>, ret: TypeRef) -> Self {
        Self::new(TypeElement::Function {
            receiver: receiver.map(Box::new),
            params,
            ret: Box::new(ret),
        })
    }

    #[must_use]
    pub fn with_annotation(mut self, token: impl Into<String>) -> Self {
        self.annotations.push(token.into());
        self
    }

    #[must_use]
    pub fn is_nullable(&self) -> bool {
        matches!(self.element, TypeElement::Nullable(_))
    }

    #[must_use]
    pub fn is_function_type(&self) -> bool {
        matches!(self.element, TypeElement::Function { .. })
    }

    /// Whether the (outer) reference carries type arguments.
    #[must_use]
    pub fn is_generic(&self) -> bool {
        matches!(&self.element, TypeElement::User { args, .. } if !args.is_empty())
    }

    /// The dotted spelling for a named reference, ignoring nullability.
    #[must_use]
    pub fn user_name(&self) -> Option<&str> {
        match &self.element {
            TypeElement::User { name, .. } => Some(name),
            TypeElement::Nullable(inner) => inner.user_name(),
            TypeElement::Function { .. } => None,
        }
    }

    /// The sole type argument of a named reference, e.g. `T` in
    /// `Provider<T>`. `None` when there is no argument, more than one, or a
    /// star projection.
    #[must_use]
    pub fn single_type_argument(&self) -> Option<&TypeRef> {
        match &self.element {
            TypeElement::User { args, .. } => match args.as_slice() {
                [TypeArg::Type(inner)] => Some(inner),
                _ => None,
            },
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeElement {
    /// A dotted name with optional type arguments, as written
    /// (`File`, `Outer.Inner`, `Map<String, Int>`).
    User { name: String, args: Vec<TypeArg> },
    /// `(receiver.)(params) -> ret`
    Function {
        receiver: Option<Box<TypeRef>>,
        params: Vec<TypeRef>,
        ret: Box<TypeRef>,
    },
    /// `T?`
    Nullable(Box<TypeRef>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeArg {
    Type(TypeRef),
    /// `*`, resolved to a wildcard marker and never recursed into.
    Star,
}
