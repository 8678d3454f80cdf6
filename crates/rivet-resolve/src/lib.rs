//! Name resolution over a partial compilation.
//!
//! This crate answers the two questions the generators keep asking:
//! "is this declaration annotated with X" and "what fully qualified type does
//! this reference denote". Both run against an incomplete compilation, so
//! answers come from syntax (imports, enclosing declarations) combined with a
//! best-effort [`SymbolOracle`] over the compilation's dependencies.

mod annotations;
mod import_map;
mod oracle;
mod resolver;
mod types;

pub use annotations::{
    bool_argument, class_array_argument, find_annotation, has_annotation,
    require_class_array_argument, string_argument,
};
pub use import_map::ImportMap;
pub use oracle::{LayeredOracle, MemoryOracle, SymbolOracle};
pub use resolver::{resolve_type_ref, resolve_user_name, ResolveContext, ResolvedName};
pub use types::{SemanticType, SemanticTypeKind, SuppressWildcards, TypeArgument};

/// Fully qualified names of the trigger and wrapper markers the engine
/// recognizes.
pub mod markers {
    pub const INJECT: &str = "javax.inject.Inject";
    pub const PROVIDER: &str = "javax.inject.Provider";

    pub const DAGGER_MODULE: &str = "dagger.Module";
    pub const DAGGER_PROVIDES: &str = "dagger.Provides";
    pub const DAGGER_BINDS: &str = "dagger.Binds";
    pub const DAGGER_COMPONENT: &str = "dagger.Component";
    pub const DAGGER_SUBCOMPONENT: &str = "dagger.Subcomponent";
    pub const DAGGER_LAZY: &str = "dagger.Lazy";
    pub const DAGGER_MEMBERS_INJECTOR: &str = "dagger.MembersInjector";
    pub const DAGGER_FACTORY: &str = "dagger.internal.Factory";
    pub const DAGGER_PRECONDITIONS: &str = "dagger.internal.Preconditions";
    pub const DAGGER_DOUBLE_CHECK: &str = "dagger.internal.DoubleCheck";

    pub const ASSISTED: &str = "dagger.assisted.Assisted";
    pub const ASSISTED_INJECT: &str = "dagger.assisted.AssistedInject";

    pub const CONTRIBUTES_ANDROID_INJECTOR: &str = "dagger.android.ContributesAndroidInjector";
    pub const ANDROID_INJECTOR: &str = "dagger.android.AndroidInjector";
    pub const INTO_MAP: &str = "dagger.multibindings.IntoMap";
    pub const CLASS_KEY: &str = "dagger.multibindings.ClassKey";

    pub const JVM_SUPPRESS_WILDCARDS: &str = "kotlin.jvm.JvmSuppressWildcards";
    pub const PUBLISHED_API: &str = "kotlin.PublishedApi";

    /// Markers that are typically written unqualified and unimported, so
    /// import-based resolution does not apply to them.
    pub(crate) const INTRINSIC: &[&str] = &[JVM_SUPPRESS_WILDCARDS];
}
