use crate::Location;
use thiserror::Error;

/// Fatal errors raised by the generation engine.
///
/// Every variant is non-recoverable for the pass that detects it: the driver
/// aborts the whole pass and surfaces the error verbatim to the caller. Each
/// carries the source [`Location`] of the offending construct.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodegenError {
    /// The type resolver exhausted every resolution rule.
    #[error("couldn't resolve type `{reference}` at {location}")]
    UnresolvedType {
        reference: String,
        location: Location,
    },

    /// A required annotation argument is syntactically absent.
    #[error("{message} at {location}")]
    MalformedAnnotationUsage { message: String, location: Location },

    /// Two provider members share a name, or two generated declarations
    /// collide on (package, name). Reports every colliding member.
    #[error("{message} at {location}")]
    DuplicateDeclaration { message: String, location: Location },

    /// Two assisted parameters share resolved-type + identifier label.
    #[error(
        "@AssistedInject constructor has duplicate @Assisted type: {parameter} at {location}"
    )]
    DuplicateAssistedParameter {
        parameter: String,
        location: Location,
    },

    /// A disallowed trigger pattern is present in the forest.
    #[error("{message} at {location}")]
    IncompatibleTrigger { message: String, location: Location },

    /// A provider-marked member is abstract outside the companion-object
    /// exemption.
    #[error("@Provides methods cannot be abstract at {location}")]
    AbstractProvider { location: Location },
}

impl CodegenError {
    /// The source anchor of the offending construct.
    #[must_use]
    pub fn location(&self) -> &Location {
        match self {
            CodegenError::UnresolvedType { location, .. }
            | CodegenError::MalformedAnnotationUsage { location, .. }
            | CodegenError::DuplicateDeclaration { location, .. }
            | CodegenError::DuplicateAssistedParameter { location, .. }
            | CodegenError::IncompatibleTrigger { location, .. }
            | CodegenError::AbstractProvider { location } => location,
        }
    }
}
